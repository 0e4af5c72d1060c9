//! Aggregate Compliance Statistics
//!
//! Folds the normalized record set into dashboard-level numbers. The
//! constants below are literal contracts of the dashboard and are not derived
//! from input.

use crate::classifier::{classify, GapPriority};
use crate::maturity::MaturityLevel;
use crate::normalizer::NormalizedResults;
use crate::record::{clamp_unit, ComplianceStatus};
use serde::{Deserialize, Serialize};

/// Size of the Annex A control catalogue
pub const TOTAL_CONTROLS: u32 = 93;

/// Control score at or above which a control counts as compliant
pub const CONTROL_COMPLIANT_THRESHOLD: f64 = 0.7;

/// Placeholder statistics shown when no completed analysis exists
pub const DEFAULT_OVERALL_SCORE: u32 = 68;
/// Placeholder compliant-control count
pub const DEFAULT_CONTROLS_COMPLIANT: u32 = 42;
/// Placeholder critical gap count
pub const DEFAULT_CRITICAL_GAPS: u32 = 12;
/// Placeholder maturity tier
pub const DEFAULT_MATURITY: MaturityLevel = MaturityLevel::Repeatable;

/// Dashboard-level compliance statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStats {
    /// Mean compliance score, 0-100
    pub overall_score: u32,
    /// Estimated compliant controls out of `total_controls`
    pub controls_compliant: u32,
    /// Size of the control catalogue
    pub total_controls: u32,
    /// Number of high-priority gaps
    pub critical_gaps: u32,
    /// Maturity tier for `overall_score`
    pub maturity: MaturityLevel,
    /// Placeholder values, no completed analyses
    pub is_default: bool,
    /// Checklists with a completed analysis
    pub checklists_assessed: u32,
    /// Checklists per compliance verdict
    pub status_breakdown: StatusBreakdown,
}

impl ComplianceStats {
    /// Fixed sample bundle used when there is nothing to aggregate
    pub fn placeholder() -> Self {
        Self {
            overall_score: DEFAULT_OVERALL_SCORE,
            controls_compliant: DEFAULT_CONTROLS_COMPLIANT,
            total_controls: TOTAL_CONTROLS,
            critical_gaps: DEFAULT_CRITICAL_GAPS,
            maturity: DEFAULT_MATURITY,
            is_default: true,
            checklists_assessed: 0,
            status_breakdown: StatusBreakdown::default(),
        }
    }
}

/// Count of normalized records per compliance verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    /// Checklists judged compliant
    pub compliant: u32,
    /// Checklists judged partially compliant
    pub partial: u32,
    /// Checklists judged non-compliant
    pub non_compliant: u32,
    /// Checklists judged not applicable
    pub not_applicable: u32,
    /// Missing or unrecognised verdicts
    pub unknown: u32,
}

impl StatusBreakdown {
    fn record(&mut self, status: ComplianceStatus) {
        match status {
            ComplianceStatus::Compliant => self.compliant += 1,
            ComplianceStatus::Partial => self.partial += 1,
            ComplianceStatus::NonCompliant => self.non_compliant += 1,
            ComplianceStatus::NotApplicable => self.not_applicable += 1,
            ComplianceStatus::Unknown => self.unknown += 1,
        }
    }
}

/// Coarse band of a [0, 1] score, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// Score of 0.7 or more
    Good,
    /// Score of 0.4 or more
    Fair,
    /// Anything lower
    Poor,
}

impl ScoreBand {
    /// Band of a score, clamped first
    pub fn of(score: f64) -> Self {
        let score = clamp_unit(score);
        if score >= 0.7 {
            Self::Good
        } else if score >= 0.4 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Aggregate the normalized records
pub fn aggregate(results: &NormalizedResults) -> ComplianceStats {
    if results.is_empty() {
        return ComplianceStats::placeholder();
    }

    let overall_score = overall_score(results);

    ComplianceStats {
        overall_score,
        controls_compliant: estimate_compliant_controls(results),
        total_controls: TOTAL_CONTROLS,
        critical_gaps: count_critical_gaps(results),
        maturity: MaturityLevel::from_score(overall_score),
        is_default: false,
        checklists_assessed: results.len() as u32,
        status_breakdown: status_breakdown(results),
    }
}

/// Unweighted mean of checklist scores, as a rounded percentage
fn overall_score(results: &NormalizedResults) -> u32 {
    let total: f64 = results.records().map(|r| r.score()).sum();
    let mean = total / results.len() as f64;
    (mean * 100.0).round() as u32
}

/// Extrapolate the assessed control pass rate onto the full catalogue
fn estimate_compliant_controls(results: &NormalizedResults) -> u32 {
    let (compliant, assessed) = results
        .records()
        .flat_map(|r| r.control_scores.values())
        .fold((0u32, 0u32), |(compliant, assessed), score| {
            let passed = *score >= CONTROL_COMPLIANT_THRESHOLD;
            (compliant + passed as u32, assessed + 1)
        });

    if assessed == 0 {
        return 0;
    }
    (compliant as f64 / assessed as f64 * TOTAL_CONTROLS as f64).round() as u32
}

fn count_critical_gaps(results: &NormalizedResults) -> u32 {
    results
        .records()
        .flat_map(|r| r.gaps.iter())
        .filter(|gap| classify(gap) == GapPriority::High)
        .count() as u32
}

fn status_breakdown(results: &NormalizedResults) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for record in results.records() {
        breakdown.record(record.compliance_status);
    }
    breakdown
}
