//! Analysis Records
//!
//! Per-checklist analysis output as produced by the document-analysis backend.
//! Decoding is total: every field except `checklist_id` falls back to a
//! neutral default when missing, `null` or mistyped, and unknown enum strings
//! decode to a catch-all variant.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Externally assigned checklist identifier
pub type ChecklistId = i64;

/// Analysis record for one checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Record id; nil when the payload carries none
    #[serde(default, deserialize_with = "lenient")]
    pub id: Uuid,
    /// Checklist the analysis was run against
    pub checklist_id: ChecklistId,
    /// Title as stored with the record, may be blank
    #[serde(default, deserialize_with = "lenient")]
    pub checklist_title: String,
    /// Lifecycle marker
    #[serde(default, deserialize_with = "lenient")]
    pub status: RecordStatus,
    /// Verdict reported by the analysis service
    #[serde(default, deserialize_with = "lenient")]
    pub compliance_status: ComplianceStatus,
    /// Raw score, nominally in [0, 1]; see [`AnalysisResult::score`]
    #[serde(default, deserialize_with = "lenient")]
    pub compliance_score: f64,
    /// Per-control scores keyed by control name
    #[serde(default, deserialize_with = "lenient_scores")]
    pub control_scores: BTreeMap<String, f64>,
    /// Free-text summary
    #[serde(default, deserialize_with = "lenient")]
    pub summary: String,
    /// Gap statements, classified by [`crate::classify`]
    #[serde(default, deserialize_with = "lenient_strings")]
    pub gaps: Vec<String>,
    /// Findings reported by the analysis
    #[serde(default, deserialize_with = "lenient_strings")]
    pub findings: Vec<String>,
    /// Suggested remediation steps
    #[serde(default, deserialize_with = "lenient_strings")]
    pub recommendations: Vec<String>,
    /// Reviewer comments
    #[serde(default, deserialize_with = "lenient_strings")]
    pub comments: Vec<String>,
    /// Creation time; the Unix epoch when missing or malformed
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: DateTime<Utc>,
    /// Completion time, if any
    #[serde(default, deserialize_with = "lenient")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure reason for failed records
    #[serde(default, deserialize_with = "lenient")]
    pub error_message: Option<String>,
}

impl AnalysisResult {
    /// Create an empty completed record for a checklist
    pub fn new(checklist_id: ChecklistId, checklist_title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            checklist_id,
            checklist_title: checklist_title.to_string(),
            status: RecordStatus::Completed,
            compliance_status: ComplianceStatus::Unknown,
            compliance_score: 0.0,
            control_scores: BTreeMap::new(),
            summary: String::new(),
            gaps: Vec::new(),
            findings: Vec::new(),
            recommendations: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            completed_at: Some(now),
            error_message: None,
        }
    }

    /// Compliance score clamped to [0, 1]; non-finite values read as 0
    pub fn score(&self) -> f64 {
        clamp_unit(self.compliance_score)
    }

    /// Whether this record takes part in aggregation
    pub fn is_completed(&self) -> bool {
        self.status == RecordStatus::Completed
    }

    /// Decode a JSON array of records.
    ///
    /// Entries that are not objects or lack a usable `checklist_id` are
    /// skipped with a warning; the rest of the snapshot survives.
    pub fn decode_snapshot(json: &str) -> crate::Result<Vec<AnalysisResult>> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<AnalysisResult>(entry) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(index, error = %e, "Skipping undecodable analysis record"),
            }
        }
        Ok(records)
    }
}

/// Clamp a score into [0, 1], mapping NaN and infinities to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Record lifecycle marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Queued, not yet picked up
    Pending,
    /// Analysis in progress
    Processing,
    /// Analysis finished; the only status that is aggregated
    #[default]
    Completed,
    /// Analysis failed
    Failed,
    /// Any status string this crate does not know
    #[serde(other)]
    Unrecognized,
}

/// Compliance verdict for a checklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Fully compliant
    Compliant,
    /// Partially compliant
    Partial,
    /// Not compliant
    NonCompliant,
    /// Checklist does not apply to the documents
    NotApplicable,
    /// Missing or unrecognised verdict
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "Compliant"),
            Self::Partial => write!(f, "Partially Compliant"),
            Self::NonCompliant => write!(f, "Non-Compliant"),
            Self::NotApplicable => write!(f, "Not Applicable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Decode a field, falling back to its default on `null` or a mistyped value.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Control score map; non-numeric scores read as 0.
fn lenient_scores<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(control, score)| (control, score.as_f64().unwrap_or(0.0)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// String list; scalars are stringified, nulls and nested values dropped.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_decodes_with_defaults() {
        let record: AnalysisResult = serde_json::from_str(r#"{"checklist_id": 4}"#).unwrap();

        assert_eq!(record.checklist_id, 4);
        assert_eq!(record.compliance_score, 0.0);
        assert!(record.control_scores.is_empty());
        assert!(record.gaps.is_empty());
        assert_eq!(record.compliance_status, ComplianceStatus::Unknown);
    }

    #[test]
    fn test_null_fields_decode_as_neutral() {
        let json = r#"{
            "checklist_id": 2,
            "compliance_status": null,
            "compliance_score": null,
            "control_scores": null,
            "gaps": null
        }"#;
        let record: AnalysisResult = serde_json::from_str(json).unwrap();

        assert_eq!(record.score(), 0.0);
        assert_eq!(record.compliance_status, ComplianceStatus::Unknown);
        assert!(record.gaps.is_empty());
    }

    #[test]
    fn test_unrecognized_enums() {
        let json = r#"{"checklist_id": 1, "status": "archived", "compliance_status": "mostly"}"#;
        let record: AnalysisResult = serde_json::from_str(json).unwrap();

        assert_eq!(record.status, RecordStatus::Unrecognized);
        assert!(!record.is_completed());
        assert_eq!(record.compliance_status, ComplianceStatus::Unknown);
    }

    #[test]
    fn test_score_clamped() {
        let mut record = AnalysisResult::new(1, "A.5");
        record.compliance_score = 1.7;
        assert_eq!(record.score(), 1.0);
        record.compliance_score = -0.2;
        assert_eq!(record.score(), 0.0);
        record.compliance_score = f64::NAN;
        assert_eq!(record.score(), 0.0);
    }

    #[test]
    fn test_backend_payload() {
        let json = r#"{
            "id": "6f1c2a4e-8a57-4f0e-9d0b-3f2d7e0c9a11",
            "checklist_id": 5,
            "checklist_title": "A.9 Access Control",
            "status": "completed",
            "compliance_status": "partial",
            "compliance_score": 0.55,
            "control_scores": {"A.9.1.1 Access control policy": 0.8},
            "gaps": ["No evidence of access reviews"],
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let record: AnalysisResult = serde_json::from_str(json).unwrap();

        assert!(record.is_completed());
        assert_eq!(record.compliance_status, ComplianceStatus::Partial);
        assert_eq!(record.control_scores.len(), 1);
        assert_eq!(record.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_mistyped_fields_decode_as_neutral() {
        let json = r#"{
            "checklist_id": 1,
            "compliance_score": "0.8",
            "compliance_status": 3,
            "control_scores": {"A.5.1.1": "high", "A.5.1.2": 0.9},
            "gaps": ["Policy not approved", 5, null, {"nested": true}],
            "findings": "not a list",
            "created_at": "yesterday"
        }"#;
        let record: AnalysisResult = serde_json::from_str(json).unwrap();

        assert_eq!(record.compliance_score, 0.0);
        assert_eq!(record.compliance_status, ComplianceStatus::Unknown);
        assert_eq!(record.control_scores["A.5.1.1"], 0.0);
        assert_eq!(record.control_scores["A.5.1.2"], 0.9);
        assert_eq!(record.gaps, vec!["Policy not approved".to_string(), "5".to_string()]);
        assert!(record.findings.is_empty());
        assert_eq!(record.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_snapshot_keeps_valid_siblings() {
        let json = r#"[
            {"checklist_id": 1, "compliance_score": "0.8", "gaps": ["ok", 5]},
            {"checklist_id": 2, "compliance_score": 0.5},
            {"checklist_id": "three"},
            42
        ]"#;
        let records = AnalysisResult::decode_snapshot(json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gaps, vec!["ok".to_string(), "5".to_string()]);
        assert_eq!(records[1].score(), 0.5);
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let json = r#"{"checklist_id": 1}"#;
        let first: AnalysisResult = serde_json::from_str(json).unwrap();
        let second: AnalysisResult = serde_json::from_str(json).unwrap();

        assert_eq!(first, second);
        assert!(first.id.is_nil());
    }
}
