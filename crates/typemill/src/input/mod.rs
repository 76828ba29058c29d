//! Streaming row access to tabular files.

mod sampler;

pub use sampler::{detect_delimiter, RowSampler};
