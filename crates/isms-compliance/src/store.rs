//! Analysis Result Store and Analysis Service seams
//!
//! The engine never fetches data itself. Callers fetch a snapshot through a
//! [`ResultStore`], and a failed fetch is rendered as "no data".

use crate::dashboard::{DashboardEngine, DashboardViewModel};
use crate::record::{AnalysisResult, ChecklistId, RecordStatus};
use crate::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Source of completed analysis records
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// All records with status `completed`
    async fn list_completed(&self) -> Result<Vec<AnalysisResult>>;
}

/// Request to analyze one checklist against uploaded documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Checklist to analyze
    pub checklist_id: ChecklistId,
    /// Checklist title passed to the service
    pub title: String,
    /// Free-text context supplied by the user
    #[serde(default)]
    pub context: String,
    /// References to the uploaded documents
    #[serde(default)]
    pub uploaded_file_refs: Vec<String>,
}

impl SubmissionRequest {
    /// Request with no context and no files
    pub fn new(checklist_id: ChecklistId, title: &str) -> Self {
        Self {
            checklist_id,
            title: title.to_string(),
            context: String::new(),
            uploaded_file_refs: Vec::new(),
        }
    }

    /// Attach free-text context
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    /// Attach uploaded document references
    pub fn with_files(mut self, refs: Vec<String>) -> Self {
        self.uploaded_file_refs = refs;
        self
    }
}

/// External analysis service producing one record per submission
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyze one checklist
    async fn submit(&self, request: &SubmissionRequest) -> Result<AnalysisResult>;
}

/// In-memory, append-only result store
#[derive(Clone, Default)]
pub struct InMemoryResultStore {
    records: Arc<RwLock<Vec<AnalysisResult>>>,
}

impl InMemoryResultStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from existing records
    pub fn with_records(records: Vec<AnalysisResult>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load a JSON array of records, skipping entries that cannot be decoded
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::with_records(AnalysisResult::decode_snapshot(&content)?))
    }

    /// Append a record
    pub fn add(&self, record: AnalysisResult) {
        self.records.write().push(record);
    }

    /// Number of stored records, any status
    pub fn count(&self) -> usize {
        self.records.read().len()
    }

    /// Records for one checklist, in insertion order
    pub fn for_checklist(&self, checklist_id: ChecklistId) -> Vec<AnalysisResult> {
        self.records
            .read()
            .iter()
            .filter(|r| r.checklist_id == checklist_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn list_completed(&self) -> Result<Vec<AnalysisResult>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.status == RecordStatus::Completed)
            .cloned()
            .collect())
    }
}

impl DashboardEngine {
    /// Fetch completed results and build the dashboard.
    ///
    /// A failed fetch is indistinguishable from an empty store: both yield the
    /// placeholder statistics.
    pub async fn refresh(&self, store: &dyn ResultStore) -> DashboardViewModel {
        let results = match store.list_completed().await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch completed analyses, showing placeholder");
                Vec::new()
            }
        };
        self.build(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComplianceError;

    struct BrokenStore;

    #[async_trait]
    impl ResultStore for BrokenStore {
        async fn list_completed(&self) -> Result<Vec<AnalysisResult>> {
            Err(ComplianceError::Store("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_placeholder() {
        let view = DashboardEngine::default().refresh(&BrokenStore).await;
        assert!(view.is_default);
        assert_eq!(view.overall_score, 68);
    }

    #[tokio::test]
    async fn test_refresh_from_memory_store() {
        let store = InMemoryResultStore::new();
        let mut record = AnalysisResult::new(1, "A.5 Information Security Policies");
        record.compliance_score = 0.62;
        store.add(record);

        let mut failed = AnalysisResult::new(2, "A.6");
        failed.status = RecordStatus::Failed;
        store.add(failed);

        let view = DashboardEngine::default().refresh(&store).await;

        assert!(!view.is_default);
        assert_eq!(view.overall_score, 62);
        assert_eq!(view.checklists_assessed, 1);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_list_completed_filters() {
        let mut pending = AnalysisResult::new(3, "A.7");
        pending.status = RecordStatus::Pending;
        let store = InMemoryResultStore::with_records(vec![AnalysisResult::new(3, "A.7"), pending]);

        let completed = tokio_test::block_on(store.list_completed()).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(store.for_checklist(3).len(), 2);
    }

    #[test]
    fn test_submission_request_builder() {
        let request = SubmissionRequest::new(4, "A.8 Asset Management")
            .with_context("Asset register v3")
            .with_files(vec!["doc-1".into()]);

        assert_eq!(request.checklist_id, 4);
        assert_eq!(request.context, "Asset register v3");
        assert_eq!(request.uploaded_file_refs, vec!["doc-1".to_string()]);
    }
}
