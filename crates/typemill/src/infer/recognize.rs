//! Per-candidate value recognizers.
//!
//! Each member of the type vocabulary gets one pure recognizer over a trimmed
//! cell value. Adding a type means adding a variant, a recognizer arm, and a
//! precedence slot; the resolution algorithm itself never changes shape.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::InferenceConfig;
use crate::schema::TypeCandidate;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Compiled once on first use.

static INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

/// Ranked datetime patterns; the first match wins, no further checking.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+$", // ISO with fraction
        r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$",      // ISO datetime
        r"^\d{2}-\d{2}-\d{4} \d{2}:\d{2}:\d{2}$",      // European datetime
        r"^\d{2}/\d{2}/\d{4}$",                        // US date
        r"^\d{1,2}[-/]\d{1,2}[-/]\d{2,4}$",            // loose numeric date
        r"^\d{4}-\d{2}-\d{2}$",                        // ISO date
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Duration grammar: "N days", clock forms, unit shorthands, and the combined
/// "[-]D days [+-]HH:MM:SS[.f]" form.
static TIMEDELTA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^[-]?\d+\s*days?$",
        r"^[-]?\d+\s*d$",
        r"^\d+:\d{2}(:\d{2})?(\.\d+)?$",
        r"^[-]?\d+\s*hours?$",
        r"^[-]?\d+\s*h$",
        r"^[-]?\d+\s*minutes?$",
        r"^[-]?\d+\s*m$",
        r"^[-]?\d+\s*seconds?$",
        r"^[-]?\d+\s*s$",
        r"^[-]?\d+\s*days?\s*[+-]?\s*\d{2}:\d{2}(:\d{2})?(\.\d+)?$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// `<real><sign><imag>i` numeric form, optional parentheses, `i` or `j`
/// imaginary suffix.
static COMPLEX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?[+-]?\d+(\.\d+)?[+-]\d+(\.\d+)?[ij]\)?$").unwrap());

/// Check if a value represents a missing/null value.
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed.eq_ignore_ascii_case("not available")
        || trimmed == "."
        || trimmed == "-"
}

/// Recognizers for one inference run.
///
/// Holds the run-fixed boolean vocabulary; everything else is pattern state
/// shared across runs.
#[derive(Debug, Clone)]
pub struct RecognizerSet {
    boolean_vocabulary: Vec<String>,
}

impl RecognizerSet {
    /// Build recognizers from a run configuration.
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            boolean_vocabulary: config.boolean_vocabulary.clone(),
        }
    }

    /// Test a non-missing cell against one candidate's recognizer.
    ///
    /// Category is column-level (see the accumulator) and String always
    /// matches; both return false here because their evidence is not counted
    /// per cell.
    pub fn matches(&self, candidate: TypeCandidate, value: &str) -> bool {
        let trimmed = value.trim();
        match candidate {
            TypeCandidate::Boolean => self.matches_boolean(trimmed),
            TypeCandidate::Integer => INTEGER_PATTERN.is_match(trimmed),
            TypeCandidate::Float => matches_float(trimmed),
            TypeCandidate::Datetime => matches_datetime(trimmed),
            TypeCandidate::TimeDelta => matches_timedelta(trimmed),
            TypeCandidate::Complex => COMPLEX_PATTERN.is_match(trimmed),
            TypeCandidate::Category | TypeCandidate::String => false,
        }
    }

    fn matches_boolean(&self, trimmed: &str) -> bool {
        let lower = trimmed.to_lowercase();
        self.boolean_vocabulary.iter().any(|v| v == &lower)
    }
}

/// Float accepts everything Integer accepts (superset) plus decimal and
/// exponent forms. Word forms of non-finite floats ("inf", "nan") are
/// excluded; "nan" is part of the missing lexicon anyway.
fn matches_float(trimmed: &str) -> bool {
    if trimmed.is_empty() {
        return false;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return false;
    }
    trimmed.parse::<f64>().is_ok()
}

fn matches_datetime(trimmed: &str) -> bool {
    DATE_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

fn matches_timedelta(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    TIMEDELTA_PATTERNS.iter().any(|p| p.is_match(&lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizers() -> RecognizerSet {
        RecognizerSet::new(&InferenceConfig::default())
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NA"));
        assert!(is_missing("n/a"));
        assert!(is_missing("NaN"));
        assert!(is_missing("null"));
        assert!(is_missing("None"));
        assert!(is_missing("Not Available"));
        assert!(is_missing("."));
        assert!(!is_missing("0"));
        assert!(!is_missing("value"));
    }

    #[test]
    fn test_integer_recognizer() {
        let r = recognizers();
        assert!(r.matches(TypeCandidate::Integer, "5"));
        assert!(r.matches(TypeCandidate::Integer, "-42"));
        assert!(r.matches(TypeCandidate::Integer, "+7"));
        assert!(r.matches(TypeCandidate::Integer, " 10 "));
        assert!(!r.matches(TypeCandidate::Integer, "1.5"));
        assert!(!r.matches(TypeCandidate::Integer, "1e5"));
        assert!(!r.matches(TypeCandidate::Integer, "abc"));
    }

    #[test]
    fn test_float_is_superset_of_integer() {
        let r = recognizers();
        for v in ["5", "-42", "+7", "1.5", "-0.25", "1e5", "2.5E-3"] {
            assert!(r.matches(TypeCandidate::Float, v), "expected float match: {v}");
        }
        assert!(!r.matches(TypeCandidate::Float, "inf"));
        assert!(!r.matches(TypeCandidate::Float, "1.2.3"));
        assert!(!r.matches(TypeCandidate::Float, "abc"));
    }

    #[test]
    fn test_boolean_recognizer() {
        let r = recognizers();
        for v in ["true", "FALSE", "Yes", "no", "1", "0", "t", "F", "y", "N"] {
            assert!(r.matches(TypeCandidate::Boolean, v), "expected bool match: {v}");
        }
        assert!(!r.matches(TypeCandidate::Boolean, "2"));
        assert!(!r.matches(TypeCandidate::Boolean, "maybe"));
    }

    #[test]
    fn test_datetime_recognizer() {
        let r = recognizers();
        for v in [
            "2024-01-15",
            "2024-01-15 10:30:00",
            "2024-01-15 10:30:00.123",
            "15-01-2024 10:30:00",
            "01/15/2024",
            "5/1/24",
        ] {
            assert!(r.matches(TypeCandidate::Datetime, v), "expected date match: {v}");
        }
        assert!(!r.matches(TypeCandidate::Datetime, "5"));
        assert!(!r.matches(TypeCandidate::Datetime, "hello"));
    }

    #[test]
    fn test_timedelta_recognizer() {
        let r = recognizers();
        for v in [
            "5 days",
            "-3 day",
            "2d",
            "10:30",
            "10:30:45",
            "10:30:45.5",
            "4 hours",
            "90 minutes",
            "30 s",
            "-428 days +19:23:03.487674",
        ] {
            assert!(r.matches(TypeCandidate::TimeDelta, v), "expected timedelta match: {v}");
        }
        assert!(!r.matches(TypeCandidate::TimeDelta, "5"));
        assert!(!r.matches(TypeCandidate::TimeDelta, "days"));
    }

    #[test]
    fn test_complex_recognizer() {
        let r = recognizers();
        for v in ["1+2i", "1+2j", "-1.5-3.25j", "(2+3j)", "+1-1i"] {
            assert!(r.matches(TypeCandidate::Complex, v), "expected complex match: {v}");
        }
        assert!(!r.matches(TypeCandidate::Complex, "1.5"));
        assert!(!r.matches(TypeCandidate::Complex, "i"));
        assert!(!r.matches(TypeCandidate::Complex, "1+i"));
    }

    #[test]
    fn test_category_and_string_not_cell_recognized() {
        let r = recognizers();
        assert!(!r.matches(TypeCandidate::Category, "red"));
        assert!(!r.matches(TypeCandidate::String, "red"));
    }
}
