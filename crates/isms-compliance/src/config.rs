//! Engine and batch configuration

use crate::ranking::DEFAULT_TOP_N;
use crate::{ComplianceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Dashboard engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of gaps surfaced in `top_gaps`
    pub top_n: usize,
    /// Use catalogue titles when a record carries an empty title
    pub fallback_to_catalogue_titles: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            fallback_to_catalogue_titles: true,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// How queued submissions are dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// One submission at a time, each awaited before the next
    #[default]
    Sequential,
    /// Up to `max_in_flight` submissions at once
    Concurrent {
        /// Maximum submissions in flight
        max_in_flight: usize,
    },
}

/// Batch submission configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Dispatch policy, sequential unless configured
    pub policy: DispatchPolicy,
    /// Per-submission time budget in seconds
    #[serde(with = "secs_opt")]
    pub submission_timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            policy: DispatchPolicy::Sequential,
            submission_timeout: None,
        }
    }
}

impl BatchConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a concurrent policy with no slots
    pub fn validate(&self) -> Result<()> {
        if let DispatchPolicy::Concurrent { max_in_flight: 0 } = self.policy {
            return Err(ComplianceError::Config("max_in_flight must be at least 1".into()));
        }
        Ok(())
    }
}

mod secs_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where D: Deserializer<'de> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
