//! ISMS Compliance Engine
//!
//! Aggregation and gap classification for ISO 27001 document analysis.
//!
//! # Pipeline
//!
//! - **Normalize**: latest completed analysis per checklist
//! - **Aggregate**: overall score, compliant-control estimate, critical gaps
//! - **Maturity**: score to a 0-5 maturity tier
//! - **Rank**: classified gaps, most urgent first
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     COMPLIANCE DASHBOARD ENGINE                         │
//! │                                                                         │
//! │   ResultStore ──► snapshot ──► ┌──────────────┐                         │
//! │                                │  Normalizer  │                         │
//! │                                └──────┬───────┘                         │
//! │                      ┌────────────────┴────────────────┐                │
//! │               ┌──────▼───────┐                 ┌───────▼──────┐         │
//! │               │  Aggregate   │                 │ Gap Classify │         │
//! │               └──────┬───────┘                 └───────┬──────┘         │
//! │               ┌──────▼───────┐                 ┌───────▼──────┐         │
//! │               │   Maturity   │                 │  Rank/Top-N  │         │
//! │               └──────┬───────┘                 └───────┬──────┘         │
//! │                      └───────────► ViewModel ◄─────────┘                │
//! │                                                                         │
//! │   SubmissionQueue ──► BatchRunner (sequential) ──► AnalysisService      │
//! │                                                   (KeywordAnalysis)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod record;
pub mod normalizer;
pub mod classifier;
pub mod aggregate;
pub mod maturity;
pub mod ranking;
pub mod dashboard;
pub mod catalogue;
pub mod config;
pub mod store;
pub mod batch;
pub mod analyzer;

use thiserror::Error;

pub use record::{AnalysisResult, ChecklistId, ComplianceStatus, RecordStatus};
pub use normalizer::{normalize, NormalizedResults};
pub use classifier::{classify, GapPriority, PriorityRule, PRIORITY_RULES};
pub use aggregate::{aggregate, ComplianceStats, ScoreBand, StatusBreakdown, TOTAL_CONTROLS};
pub use maturity::MaturityLevel;
pub use ranking::{ChecklistGaps, GapEntry, DEFAULT_TOP_N};
pub use dashboard::{build_dashboard, build_default_dashboard, DashboardEngine, DashboardViewModel};
pub use catalogue::{Checklist, ChecklistCatalogue};
pub use config::{BatchConfig, DispatchPolicy, EngineConfig};
pub use store::{AnalysisService, InMemoryResultStore, ResultStore, SubmissionRequest};
pub use batch::{BatchRunner, SubmissionOutcome, SubmissionQueue};
pub use analyzer::KeywordAnalysisService;

/// Compliance error types
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// Analysis service rejected or failed a submission
    #[error("submission failed: {0}")]
    Submission(String),
    /// Result store could not be read
    #[error("result store error: {0}")]
    Store(String),
    /// Submission exceeded the configured budget
    #[error("analysis of checklist {checklist_id} timed out after {seconds}s")]
    Timeout {
        /// Checklist that was being analyzed
        checklist_id: ChecklistId,
        /// Budget in whole seconds
        seconds: u64,
    },
    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the compliance engine
pub type Result<T> = std::result::Result<T, ComplianceError>;
