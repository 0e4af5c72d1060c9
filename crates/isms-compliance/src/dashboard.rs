//! Dashboard View Model
//!
//! Pure assembly of everything the dashboard and gap-analysis views render,
//! from one snapshot of analysis records.

use crate::aggregate::{aggregate, StatusBreakdown};
use crate::catalogue::ChecklistCatalogue;
use crate::config::EngineConfig;
use crate::normalizer::NormalizedResults;
use crate::ranking::{gaps_by_checklist, top_gaps, ChecklistGaps, GapEntry, DEFAULT_TOP_N};
use crate::record::{AnalysisResult, ChecklistId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViewModel {
    /// Mean compliance score, 0-100
    pub overall_score: u32,
    /// Estimated compliant controls
    pub controls_compliant: u32,
    /// Size of the control catalogue
    pub total_controls: u32,
    /// Number of high-priority gaps
    pub critical_gaps: u32,
    /// Maturity tier, 0-5
    pub maturity_level: u8,
    /// Display label for `maturity_level`
    pub maturity_label: String,
    /// Placeholder values, no completed analyses
    pub is_default: bool,
    /// Checklists with a completed analysis
    pub checklists_assessed: u32,
    /// Checklists per compliance verdict
    pub status_breakdown: StatusBreakdown,
    /// Most urgent gaps across all checklists
    pub top_gaps: Vec<GapEntry>,
    /// Gaps by checklist
    pub gaps_by_checklist: BTreeMap<ChecklistId, ChecklistGaps>,
}

/// Build the dashboard from completed results, surfacing `top_n` gaps
pub fn build_dashboard(results: &[AnalysisResult], top_n: usize) -> DashboardViewModel {
    let config = EngineConfig { top_n, ..EngineConfig::default() };
    DashboardEngine::new(config).build(results)
}

/// Dashboard builder bound to a configuration and catalogue
#[derive(Debug, Clone)]
pub struct DashboardEngine {
    config: EngineConfig,
    catalogue: ChecklistCatalogue,
}

impl DashboardEngine {
    /// Engine over the built-in catalogue
    pub fn new(config: EngineConfig) -> Self {
        Self::with_catalogue(config, ChecklistCatalogue::default())
    }

    /// Engine over a custom catalogue
    pub fn with_catalogue(config: EngineConfig, catalogue: ChecklistCatalogue) -> Self {
        Self { config, catalogue }
    }

    /// Active engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Catalogue used for title fallback
    pub fn catalogue(&self) -> &ChecklistCatalogue {
        &self.catalogue
    }

    /// Build the view model for a snapshot
    pub fn build(&self, results: &[AnalysisResult]) -> DashboardViewModel {
        self.build_normalized(&NormalizedResults::from_slice(results))
    }

    /// Build the view model from already normalized records
    pub fn build_normalized(&self, normalized: &NormalizedResults) -> DashboardViewModel {
        let stats = aggregate(normalized);
        let title_of = |record: &AnalysisResult| self.display_title(record);

        let view = DashboardViewModel {
            overall_score: stats.overall_score,
            controls_compliant: stats.controls_compliant,
            total_controls: stats.total_controls,
            critical_gaps: stats.critical_gaps,
            maturity_level: stats.maturity.level(),
            maturity_label: stats.maturity.label().to_string(),
            is_default: stats.is_default,
            checklists_assessed: stats.checklists_assessed,
            status_breakdown: stats.status_breakdown,
            top_gaps: top_gaps(normalized, self.config.top_n, title_of),
            gaps_by_checklist: gaps_by_checklist(normalized, title_of),
        };

        tracing::debug!(
            checklists = view.checklists_assessed,
            overall_score = view.overall_score,
            critical_gaps = view.critical_gaps,
            is_default = view.is_default,
            "Built dashboard"
        );
        view
    }

    /// Record title, falling back to the catalogue when empty
    pub fn display_title(&self, record: &AnalysisResult) -> String {
        if !record.checklist_title.trim().is_empty() || !self.config.fallback_to_catalogue_titles {
            return record.checklist_title.clone();
        }
        self.catalogue
            .title(record.checklist_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Checklist {}", record.checklist_id))
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Build with the default number of surfaced gaps
pub fn build_default_dashboard(results: &[AnalysisResult]) -> DashboardViewModel {
    build_dashboard(results, DEFAULT_TOP_N)
}
