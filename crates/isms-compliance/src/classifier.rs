//! Gap Priority Classification
//!
//! Deterministic substring rules over gap text. Rules are evaluated in table
//! order and the first matching rule decides the tier; text matching no rule
//! is [`GapPriority::Medium`].

use serde::{Deserialize, Serialize};

/// Remediation priority of a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    /// Remediate within 30 days
    High,
    /// Remediate within 90 days
    Medium,
    /// Remediate within 180 days
    Low,
}

impl GapPriority {
    /// Sort rank, lower is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Remediation window in days
    pub fn remediation_days(&self) -> i64 {
        match self {
            Self::High => 30,
            Self::Medium => 90,
            Self::Low => 180,
        }
    }

    /// Lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for GapPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One classification rule: any phrase match assigns the priority
#[derive(Debug, Clone, Copy)]
pub struct PriorityRule {
    /// Priority assigned on a match
    pub priority: GapPriority,
    /// Lowercase phrases matched as substrings
    pub phrases: &'static [&'static str],
}

/// Ordered rule table. High is checked before low.
pub const PRIORITY_RULES: &[PriorityRule] = &[
    PriorityRule {
        priority: GapPriority::High,
        phrases: &[
            "not satisfied",
            "missing",
            "no evidence",
            "not implemented",
            "not documented",
            "not established",
            "not defined",
        ],
    },
    PriorityRule {
        priority: GapPriority::Low,
        phrases: &[
            "may not be",
            "adequately addressed",
            "consider",
            "could be improved",
            "enhancement",
        ],
    },
];

/// Tier for text matched by no rule
pub const DEFAULT_PRIORITY: GapPriority = GapPriority::Medium;

/// Classify gap text with the built-in rule table
pub fn classify(text: &str) -> GapPriority {
    classify_with(PRIORITY_RULES, text)
}

/// Classify gap text against a caller-supplied rule table
pub fn classify_with(rules: &[PriorityRule], text: &str) -> GapPriority {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.phrases.iter().any(|p| lowered.contains(p)))
        .map(|rule| rule.priority)
        .unwrap_or(DEFAULT_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_high_priority() {
        assert_eq!(classify("Policy is missing"), GapPriority::High);
        assert_eq!(classify("NO EVIDENCE of annual review"), GapPriority::High);
        assert_eq!(classify("Requirement not satisfied"), GapPriority::High);
        assert_eq!(classify("Asset owners not defined"), GapPriority::High);
    }

    #[test]
    fn test_low_priority() {
        assert_eq!(classify("Consider enhancing training frequency"), GapPriority::Low);
        assert_eq!(
            classify("Control 'A.5.1.2' may not be adequately addressed"),
            GapPriority::Low
        );
        assert_eq!(classify("Logging could be improved"), GapPriority::Low);
    }

    #[test]
    fn test_default_medium() {
        assert_eq!(classify("Needs periodic review"), GapPriority::Medium);
        assert_eq!(classify(""), GapPriority::Medium);
    }

    #[test]
    fn test_high_wins_over_low() {
        assert_eq!(
            classify("Consider adding the missing screening procedure"),
            GapPriority::High
        );
        assert_eq!(
            classify("Missing coverage for: training; consider enhancement"),
            GapPriority::High
        );
    }

    #[test]
    fn test_custom_rules() {
        let rules = [PriorityRule { priority: GapPriority::Low, phrases: &["cosmetic"] }];
        assert_eq!(classify_with(&rules, "Cosmetic wording issue"), GapPriority::Low);
        assert_eq!(classify_with(&rules, "Policy is missing"), GapPriority::Medium);
    }

    #[test]
    fn test_rank_order() {
        assert!(GapPriority::High.rank() < GapPriority::Medium.rank());
        assert!(GapPriority::Medium.rank() < GapPriority::Low.rank());
        assert_eq!(serde_json::to_string(&GapPriority::High).unwrap(), "\"high\"");
    }

    proptest! {
        #[test]
        fn prop_classify_is_total_and_stable(text in ".*") {
            let first = classify(&text);
            prop_assert_eq!(first, classify(&text));
            prop_assert_eq!(first, classify(&text.to_ascii_uppercase()));
        }

        #[test]
        fn prop_high_phrase_always_high(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let text = format!("{prefix}not implemented{suffix} consider");
            prop_assert_eq!(classify(&text), GapPriority::High);
        }
    }
}
