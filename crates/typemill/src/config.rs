//! Configuration for sampling and inference.

use serde::{Deserialize, Serialize};

/// How rows are selected from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Take the first `max_rows` data rows. Cheapest, fully deterministic.
    FirstN,
    /// Take every `step`-th data row, starting from the first. Better coverage
    /// of large files without reading every row into the accumulators.
    Stride { step: usize },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::FirstN
    }
}

/// Configuration for one inference run.
///
/// All tunables have documented defaults; none are hard-coded in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum number of data rows to sample.
    pub sample_size: usize,
    /// Row selection strategy.
    pub strategy: SamplingStrategy,
    /// Minimum match ratio for a candidate to be selectable (0.0-1.0).
    pub acceptance_threshold: f64,
    /// Maximum distinct non-missing values for Category eligibility.
    /// Once exceeded the distinct set stops growing and Category is
    /// permanently ineligible for that column.
    pub category_cap: usize,
    /// Number of preview values captured per column.
    pub preview_len: usize,
    /// Rows between cancellation/heartbeat checkpoints.
    pub batch_size: usize,
    /// Values recognized as booleans, lowercase.
    pub boolean_vocabulary: Vec<String>,
    /// Delimiter override (None = auto-detect).
    pub delimiter: Option<u8>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            strategy: SamplingStrategy::default(),
            acceptance_threshold: 0.95,
            category_cap: 50,
            preview_len: 5,
            batch_size: 256,
            boolean_vocabulary: default_boolean_vocabulary(),
            delimiter: None,
        }
    }
}

impl InferenceConfig {
    /// Returns true if the value belongs to the boolean vocabulary.
    pub fn is_boolean(&self, value: &str) -> bool {
        let lower = value.trim().to_lowercase();
        self.boolean_vocabulary.iter().any(|v| v == &lower)
    }
}

/// Default boolean vocabulary.
pub fn default_boolean_vocabulary() -> Vec<String> {
    ["true", "false", "yes", "no", "y", "n", "t", "f", "1", "0"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InferenceConfig::default();
        assert_eq!(config.sample_size, 1000);
        assert_eq!(config.strategy, SamplingStrategy::FirstN);
        assert!((config.acceptance_threshold - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.category_cap, 50);
        assert_eq!(config.preview_len, 5);
    }

    #[test]
    fn test_boolean_vocabulary_case_insensitive() {
        let config = InferenceConfig::default();
        assert!(config.is_boolean("TRUE"));
        assert!(config.is_boolean(" Yes "));
        assert!(config.is_boolean("0"));
        assert!(!config.is_boolean("maybe"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = InferenceConfig {
            strategy: SamplingStrategy::Stride { step: 10 },
            ..InferenceConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: InferenceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
