//! Record Normalization
//!
//! Reduces a raw snapshot of analysis records to at most one completed record
//! per checklist: the one with the latest `created_at`. On equal timestamps the
//! record seen last in input order wins.

use crate::record::{AnalysisResult, ChecklistId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Latest completed record per checklist, iterated in ascending checklist id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedResults {
    by_checklist: BTreeMap<ChecklistId, AnalysisResult>,
}

impl NormalizedResults {
    /// Normalize owned records
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AnalysisResult>,
    {
        let mut by_checklist: BTreeMap<ChecklistId, AnalysisResult> = BTreeMap::new();

        for record in records.into_iter().filter(AnalysisResult::is_completed) {
            let superseded = by_checklist
                .get(&record.checklist_id)
                .map_or(false, |current| record.created_at < current.created_at);
            if !superseded {
                by_checklist.insert(record.checklist_id, record);
            }
        }

        Self { by_checklist }
    }

    /// Normalize borrowed records
    pub fn from_slice(records: &[AnalysisResult]) -> Self {
        Self::from_records(records.iter().cloned())
    }

    /// Record kept for a checklist
    pub fn get(&self, checklist_id: ChecklistId) -> Option<&AnalysisResult> {
        self.by_checklist.get(&checklist_id)
    }

    /// Number of checklists
    pub fn len(&self) -> usize {
        self.by_checklist.len()
    }

    /// Whether no checklist has a completed record
    pub fn is_empty(&self) -> bool {
        self.by_checklist.is_empty()
    }

    /// Records in ascending checklist id order
    pub fn records(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.by_checklist.values()
    }

    /// Checklist ids in ascending order
    pub fn checklist_ids(&self) -> impl Iterator<Item = ChecklistId> + '_ {
        self.by_checklist.keys().copied()
    }

    /// Kept records in ascending checklist id order
    pub fn into_records(self) -> Vec<AnalysisResult> {
        self.by_checklist.into_values().collect()
    }
}

/// Normalize a snapshot of records
pub fn normalize(records: &[AnalysisResult]) -> NormalizedResults {
    NormalizedResults::from_slice(records)
}
