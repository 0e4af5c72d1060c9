//! "Analyze all" Batch Submission
//!
//! Requests are queued explicitly and drained by a [`BatchRunner`] under a
//! [`DispatchPolicy`]. The default policy is sequential: the analysis service
//! sees one request at a time. A failed submission never stops the batch;
//! every request produces exactly one [`SubmissionOutcome`], in queue order.

use crate::catalogue::ChecklistCatalogue;
use crate::config::{BatchConfig, DispatchPolicy};
use crate::record::{AnalysisResult, ChecklistId};
use crate::store::{AnalysisService, InMemoryResultStore, SubmissionRequest};
use crate::ComplianceError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Ordered queue of pending submissions
#[derive(Debug, Clone, Default)]
pub struct SubmissionQueue {
    pending: VecDeque<SubmissionRequest>,
}

impl SubmissionQueue {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// One request per catalogue checklist, sharing context and files
    pub fn from_catalogue(catalogue: &ChecklistCatalogue, context: &str, file_refs: &[String]) -> Self {
        catalogue
            .all()
            .iter()
            .map(|c| {
                SubmissionRequest::new(c.id, c.title)
                    .with_context(context)
                    .with_files(file_refs.to_vec())
            })
            .collect()
    }

    /// Enqueue at the back
    pub fn push(&mut self, request: SubmissionRequest) {
        self.pending.push_back(request);
    }

    /// Dequeue from the front
    pub fn pop(&mut self) -> Option<SubmissionRequest> {
        self.pending.pop_front()
    }

    /// Requests still queued
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is drained
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FromIterator<SubmissionRequest> for SubmissionQueue {
    fn from_iter<T: IntoIterator<Item = SubmissionRequest>>(iter: T) -> Self {
        Self { pending: iter.into_iter().collect() }
    }
}

impl IntoIterator for SubmissionQueue {
    type Item = SubmissionRequest;
    type IntoIter = std::collections::vec_deque::IntoIter<SubmissionRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.pending.into_iter()
    }
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    /// Checklist that was submitted
    pub checklist_id: ChecklistId,
    /// Whether the service returned a record
    pub success: bool,
    /// Failure reason, set when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Record produced by a successful submission
    #[serde(skip)]
    pub result: Option<AnalysisResult>,
}

impl SubmissionOutcome {
    fn succeeded(checklist_id: ChecklistId, result: AnalysisResult) -> Self {
        Self { checklist_id, success: true, error: None, result: Some(result) }
    }

    fn failed(checklist_id: ChecklistId, error: String) -> Self {
        Self { checklist_id, success: false, error: Some(error), result: None }
    }
}

/// Drains a [`SubmissionQueue`] against an [`AnalysisService`]
pub struct BatchRunner {
    service: Arc<dyn AnalysisService>,
    config: BatchConfig,
}

impl BatchRunner {
    /// Runner with an explicit batch configuration
    pub fn new(service: Arc<dyn AnalysisService>, config: BatchConfig) -> Self {
        Self { service, config }
    }

    /// Sequential runner with no timeout
    pub fn sequential(service: Arc<dyn AnalysisService>) -> Self {
        Self::new(service, BatchConfig::default())
    }

    /// Active batch configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Submit every queued request; outcomes follow queue order
    pub async fn run(&self, queue: SubmissionQueue) -> Vec<SubmissionOutcome> {
        let total = queue.len();
        let outcomes = match self.config.policy {
            DispatchPolicy::Sequential => self.run_sequential(queue).await,
            DispatchPolicy::Concurrent { max_in_flight } => {
                self.run_concurrent(queue, max_in_flight.max(1)).await
            }
        };

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        tracing::info!(
            total,
            succeeded,
            failed = total - succeeded,
            policy = ?self.config.policy,
            "Batch analysis finished"
        );
        outcomes
    }

    /// Run the batch and append successful results to `store`
    pub async fn run_into(&self, queue: SubmissionQueue, store: &InMemoryResultStore) -> Vec<SubmissionOutcome> {
        let outcomes = self.run(queue).await;
        for result in outcomes.iter().filter_map(|o| o.result.clone()) {
            store.add(result);
        }
        outcomes
    }

    async fn run_sequential(&self, mut queue: SubmissionQueue) -> Vec<SubmissionOutcome> {
        let mut outcomes = Vec::with_capacity(queue.len());
        while let Some(request) = queue.pop() {
            outcomes.push(submit_one(self.service.as_ref(), &request, self.config.submission_timeout).await);
        }
        outcomes
    }

    async fn run_concurrent(&self, queue: SubmissionQueue, max_in_flight: usize) -> Vec<SubmissionOutcome> {
        let requests: Vec<SubmissionRequest> = queue.into_iter().collect();
        let mut slots: Vec<Option<SubmissionOutcome>> = vec![None; requests.len()];
        let semaphore = Arc::new(Semaphore::new(max_in_flight));
        let mut tasks = JoinSet::new();

        for (index, request) in requests.iter().cloned().enumerate() {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let service = Arc::clone(&self.service);
            let timeout = self.config.submission_timeout;
            tasks.spawn(async move {
                let outcome = submit_one(service.as_ref(), &request, timeout).await;
                drop(permit);
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::warn!(error = %e, "Submission task aborted"),
            }
        }

        requests
            .iter()
            .zip(slots)
            .map(|(request, slot)| {
                slot.unwrap_or_else(|| {
                    SubmissionOutcome::failed(request.checklist_id, "submission was not completed".into())
                })
            })
            .collect()
    }
}

async fn submit_one(
    service: &dyn AnalysisService,
    request: &SubmissionRequest,
    timeout: Option<Duration>,
) -> SubmissionOutcome {
    let checklist_id = request.checklist_id;
    tracing::debug!(checklist_id, title = %request.title, "Submitting checklist for analysis");

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, service.submit(request)).await {
            Ok(result) => result,
            Err(_) => Err(ComplianceError::Timeout { checklist_id, seconds: limit.as_secs() }),
        },
        None => service.submit(request).await,
    };

    match result {
        Ok(record) => SubmissionOutcome::succeeded(checklist_id, record),
        Err(e) => {
            tracing::warn!(checklist_id, error = %e, "Checklist analysis failed");
            SubmissionOutcome::failed(checklist_id, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake service that records call order and peak concurrency
    #[derive(Default)]
    struct FakeService {
        fail_on: Vec<ChecklistId>,
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<Vec<ChecklistId>>,
    }

    impl FakeService {
        fn new(fail_on: Vec<ChecklistId>, delay: Duration) -> Self {
            Self { fail_on, delay, ..Self::default() }
        }
    }

    #[async_trait]
    impl AnalysisService for FakeService {
        async fn submit(&self, request: &SubmissionRequest) -> Result<AnalysisResult> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().push(request.checklist_id);

            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on.contains(&request.checklist_id) {
                return Err(ComplianceError::Submission(format!("model rejected checklist {}", request.checklist_id)));
            }
            let mut record = AnalysisResult::new(request.checklist_id, &request.title);
            record.compliance_score = 0.5;
            Ok(record)
        }
    }

    fn queue(ids: &[ChecklistId]) -> SubmissionQueue {
        ids.iter().map(|id| SubmissionRequest::new(*id, &format!("Checklist {id}"))).collect()
    }

    #[tokio::test]
    async fn test_sequential_one_at_a_time() {
        let service = Arc::new(FakeService::new(vec![], Duration::from_millis(2)));
        let runner = BatchRunner::sequential(service.clone());

        let outcomes = runner.run(queue(&[1, 2, 3, 4])).await;

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.success));
        assert_eq!(service.peak.load(Ordering::SeqCst), 1);
        assert_eq!(*service.calls.lock(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let service = Arc::new(FakeService::new(vec![2], Duration::from_millis(1)));
        let runner = BatchRunner::sequential(service.clone());

        let outcomes = runner.run(queue(&[1, 2, 3])).await;
        let ids: Vec<_> = outcomes.iter().map(|o| o.checklist_id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert!(outcomes[1].error.as_deref().unwrap().contains("checklist 2"));
        assert!(outcomes[1].result.is_none());
        assert!(outcomes[2].success);
    }

    #[tokio::test]
    async fn test_concurrent_keeps_queue_order() {
        let service = Arc::new(FakeService::new(vec![3], Duration::from_millis(5)));
        let config = BatchConfig {
            policy: DispatchPolicy::Concurrent { max_in_flight: 3 },
            submission_timeout: None,
        };
        let runner = BatchRunner::new(service.clone(), config);

        let outcomes = runner.run(queue(&[5, 4, 3, 2, 1])).await;
        let ids: Vec<_> = outcomes.iter().map(|o| o.checklist_id).collect();

        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        assert!(!outcomes[2].success);
        let peak = service.peak.load(Ordering::SeqCst);
        assert!(peak >= 2 && peak <= 3, "peak {peak}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reported_as_failure() {
        let service = Arc::new(FakeService::new(vec![], Duration::from_secs(120)));
        let config = BatchConfig {
            policy: DispatchPolicy::Sequential,
            submission_timeout: Some(Duration::from_secs(30)),
        };
        let runner = BatchRunner::new(service, config);

        let outcomes = runner.run(queue(&[7])).await;

        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_run_into_store() {
        let service = Arc::new(FakeService::new(vec![1], Duration::ZERO));
        let store = InMemoryResultStore::new();

        let outcomes = BatchRunner::sequential(service).run_into(queue(&[1, 2]), &store).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(store.count(), 1);
        assert_eq!(store.for_checklist(2).len(), 1);
    }

    #[test]
    fn test_queue_from_catalogue() {
        let catalogue = ChecklistCatalogue::iso27001();
        let mut q = SubmissionQueue::from_catalogue(&catalogue, "ISMS manual", &["doc-7".to_string()]);

        assert_eq!(q.len(), 10);
        let first = q.pop().unwrap();
        assert_eq!(first.checklist_id, 1);
        assert_eq!(first.uploaded_file_refs, vec!["doc-7".to_string()]);
        assert_eq!(q.len(), 9);
    }

    #[test]
    fn test_outcome_json() {
        let outcome = SubmissionOutcome::failed(4, "boom".into());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["checklistId"], 4);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
