//! Gap Ranking
//!
//! Flattens gaps across checklists, tags them with their priority and selects
//! the most urgent ones. Ordering is stable: equal priorities keep checklist
//! order first, then position within the checklist's gap list.

use crate::classifier::{classify, GapPriority};
use crate::normalizer::NormalizedResults;
use crate::record::{AnalysisResult, ChecklistId, ComplianceStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of gaps surfaced on the dashboard unless the caller asks otherwise
pub const DEFAULT_TOP_N: usize = 3;

/// Classified gap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapEntry {
    /// Gap statement as reported
    pub text: String,
    /// Classified priority
    pub priority: GapPriority,
    /// Owning checklist
    pub checklist_id: ChecklistId,
    /// Display title of the owning checklist
    pub checklist_title: String,
}

/// Gaps of one checklist, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistGaps {
    /// Display title
    pub title: String,
    /// Classified gaps
    pub gaps: Vec<GapEntry>,
    /// Clamped score
    pub compliance_score: f64,
    /// Reported verdict
    pub compliance_status: ComplianceStatus,
}

/// Classify every gap of one record
pub fn classify_gaps(record: &AnalysisResult, title: &str) -> Vec<GapEntry> {
    record
        .gaps
        .iter()
        .map(|text| GapEntry {
            text: text.clone(),
            priority: classify(text),
            checklist_id: record.checklist_id,
            checklist_title: title.to_string(),
        })
        .collect()
}

/// All gaps across checklists, most urgent first
pub fn rank_gaps<F>(results: &NormalizedResults, title_of: F) -> Vec<GapEntry>
where
    F: Fn(&AnalysisResult) -> String,
{
    let mut entries: Vec<GapEntry> = results
        .records()
        .flat_map(|record| classify_gaps(record, &title_of(record)))
        .collect();
    // sort_by_key is stable
    entries.sort_by_key(|entry| entry.priority.rank());
    entries
}

/// The first `n` gaps of the ranking
pub fn top_gaps<F>(results: &NormalizedResults, n: usize, title_of: F) -> Vec<GapEntry>
where
    F: Fn(&AnalysisResult) -> String,
{
    let mut ranked = rank_gaps(results, title_of);
    ranked.truncate(n);
    ranked
}

/// Per-checklist gap listing
pub fn gaps_by_checklist<F>(results: &NormalizedResults, title_of: F) -> BTreeMap<ChecklistId, ChecklistGaps>
where
    F: Fn(&AnalysisResult) -> String,
{
    results
        .records()
        .map(|record| {
            let title = title_of(record);
            let gaps = classify_gaps(record, &title);
            (
                record.checklist_id,
                ChecklistGaps {
                    title,
                    gaps,
                    compliance_score: record.score(),
                    compliance_status: record.compliance_status,
                },
            )
        })
        .collect()
}
