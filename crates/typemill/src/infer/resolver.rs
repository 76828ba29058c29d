//! Deterministic best-fit type resolution over accumulated evidence.

use crate::config::InferenceConfig;
use crate::schema::TypeCandidate;

use super::accumulator::ColumnEvidence;

/// Typed candidates checked against the acceptance threshold, narrowest
/// first. Category and String are fallbacks handled separately.
const TYPED_CANDIDATES: [TypeCandidate; 6] = [
    TypeCandidate::Boolean,
    TypeCandidate::Integer,
    TypeCandidate::Float,
    TypeCandidate::Datetime,
    TypeCandidate::TimeDelta,
    TypeCandidate::Complex,
];

/// Resolves a column's evidence to a single type and confidence.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    acceptance_threshold: f64,
    category_cap: usize,
}

impl TypeResolver {
    /// Build a resolver from a run configuration.
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            acceptance_threshold: config.acceptance_threshold,
            category_cap: config.category_cap,
        }
    }

    /// Decide the single best-fit type.
    ///
    /// A fully missing column resolves to String with confidence 0 (an
    /// explicit policy, not an error). Otherwise the narrowest typed candidate
    /// whose match ratio reaches the acceptance threshold wins; Category is a
    /// fallback above String only, and String always applies with ratio 1.0.
    pub fn resolve(&self, evidence: &ColumnEvidence) -> (TypeCandidate, f64) {
        let non_missing = evidence.non_missing();
        if non_missing == 0 {
            return (TypeCandidate::String, 0.0);
        }

        for candidate in TYPED_CANDIDATES {
            let ratio = evidence.match_ratio(candidate);
            if ratio >= self.acceptance_threshold {
                return (candidate, ratio);
            }
        }

        // A column of numbers with few distinct values is still better
        // reported as Integer than Category, so Category is only reached when
        // no typed candidate qualified.
        if self.category_qualifies(evidence) {
            return (TypeCandidate::Category, 1.0);
        }

        (TypeCandidate::String, 1.0)
    }

    // Categorical means the values form a vocabulary smaller than the data:
    // at most `category_cap` distinct values, and strictly fewer distinct
    // values than non-missing cells (at least one value repeats).
    fn category_qualifies(&self, evidence: &ColumnEvidence) -> bool {
        evidence.category_eligible
            && evidence.distinct_count <= self.category_cap
            && evidence.distinct_count < evidence.non_missing()
    }
}

#[cfg(test)]
mod tests {
    use crate::infer::accumulator::ColumnAccumulator;
    use crate::infer::recognize::RecognizerSet;

    use super::*;

    fn resolve(cells: &[&str], config: &InferenceConfig) -> (TypeCandidate, f64) {
        let recognizers = RecognizerSet::new(config);
        let mut acc = ColumnAccumulator::new(config.category_cap, config.preview_len);
        for cell in cells {
            acc.observe(cell, &recognizers);
        }
        TypeResolver::new(config).resolve(&acc.finalize())
    }

    fn resolve_default(cells: &[&str]) -> (TypeCandidate, f64) {
        resolve(cells, &InferenceConfig::default())
    }

    #[test]
    fn test_fully_missing_resolves_string_confidence_zero() {
        let (ty, confidence) = resolve_default(&["", "NA", "null"]);
        assert_eq!(ty, TypeCandidate::String);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_all_integers_resolve_integer_not_float() {
        let (ty, confidence) = resolve_default(&["5", "-3", "42", "+7"]);
        assert_eq!(ty, TypeCandidate::Integer);
        assert!((confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mixed_numbers_resolve_float() {
        let (ty, _) = resolve_default(&["1.5", "2", "3.25", "-4"]);
        assert_eq!(ty, TypeCandidate::Float);
    }

    #[test]
    fn test_boolean_precedes_integer() {
        // "1" and "0" match Boolean, Integer, and Float; Boolean is narrower.
        let (ty, _) = resolve_default(&["1", "0", "1", "0"]);
        assert_eq!(ty, TypeCandidate::Boolean);
    }

    #[test]
    fn test_boolean_words() {
        let (ty, confidence) = resolve_default(&["true", "false", "yes"]);
        assert_eq!(ty, TypeCandidate::Boolean);
        assert!((confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_datetime_column() {
        let (ty, _) = resolve_default(&["2024-01-01", "2024-02-15", "2023-12-31"]);
        assert_eq!(ty, TypeCandidate::Datetime);
    }

    #[test]
    fn test_timedelta_column() {
        let (ty, _) = resolve_default(&["5 days", "-2 days", "12:30:00"]);
        assert_eq!(ty, TypeCandidate::TimeDelta);
    }

    #[test]
    fn test_complex_column() {
        let (ty, _) = resolve_default(&["1+2j", "-3.5+0.5i", "2-4j"]);
        assert_eq!(ty, TypeCandidate::Complex);
    }

    #[test]
    fn test_low_cardinality_strings_resolve_category() {
        let config = InferenceConfig {
            category_cap: 10,
            ..InferenceConfig::default()
        };
        let (ty, confidence) = resolve(&["red", "blue", "red", "green", "red"], &config);
        assert_eq!(ty, TypeCandidate::Category);
        assert!((confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repeated_colors_resolve_category_under_defaults() {
        // Three distinct values among five cells qualifies without any
        // config tuning.
        let (ty, confidence) = resolve_default(&["red", "blue", "red", "green", "red"]);
        assert_eq!(ty, TypeCandidate::Category);
        assert!((confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_unique_strings_resolve_string_not_category() {
        // No repetition: the values are not a vocabulary, even under the cap.
        let (ty, _) = resolve_default(&["alice", "bob", "carol"]);
        assert_eq!(ty, TypeCandidate::String);
    }

    #[test]
    fn test_high_cardinality_strings_resolve_string() {
        let cells: Vec<String> = (0..40).map(|i| format!("value_{i}")).collect();
        let refs: Vec<&str> = cells.iter().map(|s| s.as_str()).collect();
        let config = InferenceConfig {
            category_cap: 10,
            ..InferenceConfig::default()
        };
        let (ty, confidence) = resolve(&refs, &config);
        assert_eq!(ty, TypeCandidate::String);
        assert!((confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_never_beats_typed_candidates() {
        // Few distinct values, but every value is an integer.
        let (ty, _) = resolve_default(&["1", "2", "1", "2", "1", "2", "2", "2"]);
        assert_ne!(ty, TypeCandidate::Category);
    }

    #[test]
    fn test_below_threshold_falls_back_to_string() {
        // Half integers, half words: nothing typed reaches 0.95.
        let cells: Vec<String> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    i.to_string()
                } else {
                    format!("word_{i}_{}", "x".repeat(i))
                }
            })
            .collect();
        let refs: Vec<&str> = cells.iter().map(|s| s.as_str()).collect();
        let config = InferenceConfig {
            category_cap: 5,
            ..InferenceConfig::default()
        };
        let (ty, confidence) = resolve(&refs, &config);
        assert_eq!(ty, TypeCandidate::String);
        assert!((confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_tolerates_sparse_noise() {
        // 19 integers and one word: ratio 0.95 meets the default threshold.
        let mut cells: Vec<String> = (0..19).map(|i| i.to_string()).collect();
        cells.push("oops".to_string());
        let refs: Vec<&str> = cells.iter().map(|s| s.as_str()).collect();
        let (ty, confidence) = resolve_default(&refs);
        assert_eq!(ty, TypeCandidate::Integer);
        assert!((confidence - 0.95).abs() < 1e-9);
    }
}
