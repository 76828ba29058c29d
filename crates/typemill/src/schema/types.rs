//! The closed vocabulary of inferable column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One member of the closed set of inferable data types.
///
/// The vocabulary is closed: no other type is ever reported. Variants are
/// declared in specificity order, most constrained first; `precedence()`
/// exposes that order for the resolver's tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCandidate {
    /// True/False values.
    Boolean,
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating point numbers.
    Float,
    /// Date and time data.
    Datetime,
    /// Time intervals.
    TimeDelta,
    /// Complex numbers.
    Complex,
    /// Low-cardinality categorical data.
    Category,
    /// Text data; universal fallback.
    String,
}

/// All candidates, in precedence order.
pub const ALL_CANDIDATES: [TypeCandidate; 8] = [
    TypeCandidate::Boolean,
    TypeCandidate::Integer,
    TypeCandidate::Float,
    TypeCandidate::Datetime,
    TypeCandidate::TimeDelta,
    TypeCandidate::Complex,
    TypeCandidate::Category,
    TypeCandidate::String,
];

impl TypeCandidate {
    /// Specificity rank; lower wins when several candidates reach the
    /// acceptance threshold.
    pub fn precedence(&self) -> usize {
        match self {
            TypeCandidate::Boolean => 0,
            TypeCandidate::Integer => 1,
            TypeCandidate::Float => 2,
            TypeCandidate::Datetime => 3,
            TypeCandidate::TimeDelta => 4,
            TypeCandidate::Complex => 5,
            TypeCandidate::Category => 6,
            TypeCandidate::String => 7,
        }
    }

    /// Candidates whose evidence is counted per cell. Category is a
    /// column-level eligibility decided at finalize time, and String matches
    /// everything by definition.
    pub fn is_cell_recognized(&self) -> bool {
        !matches!(self, TypeCandidate::Category | TypeCandidate::String)
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TypeCandidate::Boolean => "Boolean",
            TypeCandidate::Integer => "Integer",
            TypeCandidate::Float => "Float",
            TypeCandidate::Datetime => "Date/Time",
            TypeCandidate::TimeDelta => "Time Interval",
            TypeCandidate::Complex => "Complex Number",
            TypeCandidate::Category => "Category",
            TypeCandidate::String => "Text",
        }
    }

    /// Short description of the data the type covers.
    pub fn description(&self) -> &'static str {
        match self {
            TypeCandidate::Boolean => "True/False values",
            TypeCandidate::Integer => "Whole numbers",
            TypeCandidate::Float => "Floating point numbers",
            TypeCandidate::Datetime => "Date and time data",
            TypeCandidate::TimeDelta => "Time intervals",
            TypeCandidate::Complex => "Complex numbers",
            TypeCandidate::Category => "Categorical data",
            TypeCandidate::String => "Text data",
        }
    }

    /// Parse a type name as serialized (snake_case) or displayed.
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        ALL_CANDIDATES.into_iter().find(|c| {
            c.snake_name() == lower || c.display_name().to_lowercase() == lower
        })
    }

    /// The snake_case serialization name.
    pub fn snake_name(&self) -> &'static str {
        match self {
            TypeCandidate::Boolean => "boolean",
            TypeCandidate::Integer => "integer",
            TypeCandidate::Float => "float",
            TypeCandidate::Datetime => "datetime",
            TypeCandidate::TimeDelta => "time_delta",
            TypeCandidate::Complex => "complex",
            TypeCandidate::Category => "category",
            TypeCandidate::String => "string",
        }
    }
}

impl fmt::Display for TypeCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snake_name())
    }
}
