use serde::{Deserialize, Serialize};

pub const DEFAULT_HIGH_RISK_SCORE: u32 = 4;
pub const DEFAULT_FEVER_THRESHOLD: f64 = 99.6;

/// Highest total a patient can reach (3 + 2 + 2).
pub const MAX_RISK_SCORE: u32 = 7;

/// Scoring thresholds.
///
/// The bracket tables are fixed; only the flag cut-offs are tunable.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   high_risk_score: 4
///   fever_threshold: 99.6
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Total score at or above which a patient is flagged high risk (default: 4)
    #[serde(default)]
    pub high_risk_score: Option<u32>,

    /// Temperature at or above which a patient is flagged with fever (default: 99.6)
    #[serde(default)]
    pub fever_threshold: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_risk_score: Some(DEFAULT_HIGH_RISK_SCORE),
            fever_threshold: Some(DEFAULT_FEVER_THRESHOLD),
        }
    }
}

impl ScoringConfig {
    pub fn high_risk_score(&self) -> u32 {
        self.high_risk_score.unwrap_or(DEFAULT_HIGH_RISK_SCORE)
    }

    pub fn fever_threshold(&self) -> f64 {
        self.fever_threshold.unwrap_or(DEFAULT_FEVER_THRESHOLD)
    }
}
