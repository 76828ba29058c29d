//! Type vocabulary and inference reports.

mod report;
mod types;

pub use report::{ColumnReport, FileReport};
pub use types::{TypeCandidate, ALL_CANDIDATES};
