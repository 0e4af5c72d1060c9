//! Maturity Level Mapping

use serde::{Deserialize, Serialize};

/// ISMS maturity tier derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaturityLevel {
    /// Score of 0
    NotAssessed = 0,
    /// 1-39
    Initial = 1,
    /// 40-59
    Repeatable = 2,
    /// 60-74
    Defined = 3,
    /// 75-89
    Managed = 4,
    /// 90 and above
    Optimized = 5,
}

impl MaturityLevel {
    /// Map an overall score (0-100) to its tier. Lower bounds are inclusive.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::Optimized,
            75..=89 => Self::Managed,
            60..=74 => Self::Defined,
            40..=59 => Self::Repeatable,
            1..=39 => Self::Initial,
            0 => Self::NotAssessed,
        }
    }

    /// Numeric tier
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Display label, e.g. "Managed"
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotAssessed => "Not Assessed",
            Self::Initial => "Initial",
            Self::Repeatable => "Repeatable",
            Self::Defined => "Defined",
            Self::Managed => "Managed",
            Self::Optimized => "Optimized",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level {} - {}", self.level(), self.label())
    }
}
