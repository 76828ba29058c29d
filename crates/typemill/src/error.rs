//! Error types for the typemill library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for typemill operations.
#[derive(Debug, Error)]
pub enum TypemillError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File could not be parsed as tabular data.
    #[error("File format error: {0}")]
    FileFormat(String),

    /// File contains a header but zero data rows.
    #[error("Empty file: {0}")]
    EmptyFile(String),

    /// Missing, empty, or duplicate column names in the header.
    #[error("Header error: {0}")]
    Header(String),

    /// Override targeted a column that does not exist in the report.
    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    /// Override attempted before the job reached COMPLETED.
    #[error("Job is not ready: {0}")]
    JobNotReady(String),

    /// No job exists for the given identifier.
    #[error("Job not found: {0}")]
    JobNotFound(uuid::Uuid),

    /// Job was cancelled before or during processing.
    #[error("Job cancelled: {0}")]
    Cancelled(String),

    /// Unexpected worker fault.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for typemill operations.
pub type Result<T> = std::result::Result<T, TypemillError>;

/// Serializable error category recorded on a failed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileFormat,
    EmptyFile,
    Header,
    ColumnNotFound,
    JobNotReady,
    JobNotFound,
    Cancelled,
    Io,
    Internal,
}

/// Structured error carried by a job in the FAILED state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl JobError {
    /// Create a job error from a kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&TypemillError> for JobError {
    fn from(err: &TypemillError) -> Self {
        let kind = match err {
            TypemillError::Io { .. } => ErrorKind::Io,
            TypemillError::FileFormat(_) | TypemillError::Csv(_) => ErrorKind::FileFormat,
            TypemillError::EmptyFile(_) => ErrorKind::EmptyFile,
            TypemillError::Header(_) => ErrorKind::Header,
            TypemillError::ColumnNotFound(_) => ErrorKind::ColumnNotFound,
            TypemillError::JobNotReady(_) => ErrorKind::JobNotReady,
            TypemillError::JobNotFound(_) => ErrorKind::JobNotFound,
            TypemillError::Cancelled(_) => ErrorKind::Cancelled,
            TypemillError::Internal(_) | TypemillError::Json(_) => ErrorKind::Internal,
        };
        Self::new(kind, err.to_string())
    }
}
