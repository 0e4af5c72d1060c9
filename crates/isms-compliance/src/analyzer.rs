//! Keyword Coverage Analysis
//!
//! Offline [`AnalysisService`] that scores a checklist by how many of its
//! catalogue keywords appear in the submitted documents. Used when no external
//! analysis backend is configured.

use crate::catalogue::{Checklist, ChecklistCatalogue};
use crate::record::{AnalysisResult, ComplianceStatus};
use crate::store::{AnalysisService, SubmissionRequest};
use crate::{ComplianceError, Result};
use async_trait::async_trait;

/// Coverage ratio at or above which a checklist is compliant
pub const COMPLIANT_COVERAGE: f64 = 0.7;
/// Coverage ratio at or above which a checklist is partially compliant
pub const PARTIAL_COVERAGE: f64 = 0.4;

const MAX_LISTED_TOPICS: usize = 5;
const MAX_RECOMMENDED: usize = 3;
const CONTROLS_CHECKED: usize = 3;
const MAX_ENTRIES: usize = 5;

/// Scores checklists against a fixed body of document text
pub struct KeywordAnalysisService {
    catalogue: ChecklistCatalogue,
    documents: String,
}

impl KeywordAnalysisService {
    /// Analyze against the built-in ISO 27001 catalogue
    pub fn new(documents: impl Into<String>) -> Self {
        Self::with_catalogue(ChecklistCatalogue::iso27001(), documents)
    }

    /// Analyze against a custom catalogue
    pub fn with_catalogue(catalogue: ChecklistCatalogue, documents: impl Into<String>) -> Self {
        Self {
            catalogue,
            documents: documents.into(),
        }
    }

    /// Assess one checklist against `content`
    pub fn analyze(&self, checklist: &Checklist, content: &str) -> AnalysisResult {
        let content = content.to_lowercase();
        let (matched, missing): (Vec<&str>, Vec<&str>) = checklist
            .keywords
            .iter()
            .copied()
            .partition(|kw| content.contains(&kw.to_lowercase()));

        let ratio = if checklist.keywords.is_empty() {
            0.0
        } else {
            matched.len() as f64 / checklist.keywords.len() as f64
        };
        let (status, score) = coverage_verdict(ratio);

        let mut findings = Vec::new();
        if !matched.is_empty() {
            findings.push(format!(
                "Document addresses the following topics: {}",
                list(&matched, MAX_LISTED_TOPICS)
            ));
        }

        let mut gaps = Vec::new();
        let mut recommendations = Vec::new();
        if !missing.is_empty() {
            gaps.push(format!("Missing coverage for: {}", list(&missing, MAX_LISTED_TOPICS)));
            recommendations.push(format!(
                "Consider adding documentation for: {}",
                list(&missing, MAX_RECOMMENDED)
            ));
        }

        for control in checklist.controls.iter().take(CONTROLS_CHECKED) {
            let control_lower = control.to_lowercase();
            let mentioned = control_lower
                .split_whitespace()
                .take(3)
                .any(|word| content.contains(word));
            if !mentioned {
                gaps.push(format!("Control '{control}' may not be adequately addressed"));
                recommendations.push(format!("Review and document compliance with '{control}'"));
            }
        }

        gaps.truncate(MAX_ENTRIES);
        recommendations.truncate(MAX_ENTRIES);

        let mut record = AnalysisResult::new(checklist.id, checklist.title);
        record.compliance_status = status;
        record.compliance_score = (score * 100.0).round() / 100.0;
        record.summary = format!(
            "Analysis of '{}' based on document review. Found {} of {} expected topics covered. Overall compliance score: {:.1}%.",
            checklist.title,
            matched.len(),
            checklist.keywords.len(),
            score * 100.0
        );
        record.findings = findings;
        record.gaps = gaps;
        record.recommendations = recommendations;
        record
    }
}

#[async_trait]
impl AnalysisService for KeywordAnalysisService {
    async fn submit(&self, request: &SubmissionRequest) -> Result<AnalysisResult> {
        let checklist = self.catalogue.get(request.checklist_id).ok_or_else(|| {
            ComplianceError::Submission(format!("unknown checklist {}", request.checklist_id))
        })?;

        let content = format!("{}\n{}", self.documents, request.context);
        let record = self.analyze(checklist, &content);
        tracing::debug!(
            checklist_id = checklist.id,
            score = record.compliance_score,
            status = %record.compliance_status,
            "Keyword analysis complete"
        );
        Ok(record)
    }
}

/// Status and unrounded score for a keyword coverage ratio
pub fn coverage_verdict(ratio: f64) -> (ComplianceStatus, f64) {
    if ratio >= COMPLIANT_COVERAGE {
        (ComplianceStatus::Compliant, 0.7 + ratio * 0.3)
    } else if ratio >= PARTIAL_COVERAGE {
        (ComplianceStatus::Partial, 0.4 + ratio * 0.3)
    } else if ratio > 0.0 {
        (ComplianceStatus::NonCompliant, ratio * 0.4)
    } else {
        (ComplianceStatus::NotApplicable, 0.0)
    }
}

fn list(items: &[&str], limit: usize) -> String {
    items.iter().take(limit).copied().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, GapPriority};

    fn policies() -> &'static Checklist {
        ChecklistCatalogue::iso27001().get(1).unwrap()
    }

    #[test]
    fn test_coverage_bands() {
        let (status, score) = coverage_verdict(1.0);
        assert_eq!(status, ComplianceStatus::Compliant);
        assert!((score - 1.0).abs() < 1e-9);

        assert_eq!(coverage_verdict(0.7).0, ComplianceStatus::Compliant);
        assert_eq!(coverage_verdict(0.5).0, ComplianceStatus::Partial);
        assert_eq!(coverage_verdict(0.4).0, ComplianceStatus::Partial);

        let (status, score) = coverage_verdict(0.25);
        assert_eq!(status, ComplianceStatus::NonCompliant);
        assert!((score - 0.1).abs() < 1e-9);

        assert_eq!(coverage_verdict(0.0), (ComplianceStatus::NotApplicable, 0.0));
    }

    #[test]
    fn test_full_coverage_is_compliant() {
        let service = KeywordAnalysisService::new("");
        let text = "Our Information Security Policy covers policy review, policy approval, \
                    policy communication and management commitment.";
        let record = service.analyze(policies(), text);

        assert_eq!(record.compliance_status, ComplianceStatus::Compliant);
        assert_eq!(record.compliance_score, 1.0);
        assert!(record.summary.contains("Found 6 of 6 expected topics"));
        assert!(record.gaps.iter().all(|g| !g.starts_with("Missing coverage")));
    }

    #[test]
    fn test_half_coverage_is_partial() {
        let service = KeywordAnalysisService::new("");
        let record = service.analyze(policies(), "security policy, policy review, policy approval");

        assert_eq!(record.compliance_status, ComplianceStatus::Partial);
        assert_eq!(record.compliance_score, 0.55);
        assert_eq!(
            record.gaps[0],
            "Missing coverage for: information security policy, management commitment, policy communication"
        );
    }

    #[test]
    fn test_sparse_coverage_is_non_compliant() {
        let service = KeywordAnalysisService::new("");
        let record = service.analyze(policies(), "a security policy exists");

        assert_eq!(record.compliance_status, ComplianceStatus::NonCompliant);
        assert_eq!(record.compliance_score, 0.07);
    }

    #[test]
    fn test_no_coverage_flags_controls() {
        let service = KeywordAnalysisService::new("");
        let record = service.analyze(policies(), "");

        assert_eq!(record.compliance_status, ComplianceStatus::NotApplicable);
        assert_eq!(record.compliance_score, 0.0);
        assert!(record.findings.is_empty());
        assert_eq!(record.gaps.len(), 4);
        assert_eq!(
            record.gaps[1],
            "Control 'A.5.1 Management direction for information security' may not be adequately addressed"
        );
        assert_eq!(classify(&record.gaps[0]), GapPriority::High);
        assert_eq!(record.recommendations.len(), 4);
    }

    #[tokio::test]
    async fn test_submit_uses_documents_and_context() {
        let service = KeywordAnalysisService::new("Access control and password rules.");
        let request = SubmissionRequest::new(5, "A.9 Access Control").with_context("authentication via SSO");

        let record = service.submit(&request).await.unwrap();

        assert_eq!(record.checklist_id, 5);
        assert!(record.is_completed());
        assert!(record.summary.contains("Found 3 of 9 expected topics"));
    }

    #[tokio::test]
    async fn test_unknown_checklist_is_rejected() {
        let service = KeywordAnalysisService::new("anything");
        let result = service.submit(&SubmissionRequest::new(99, "Unknown")).await;

        assert!(matches!(result, Err(ComplianceError::Submission(_))));
    }
}
