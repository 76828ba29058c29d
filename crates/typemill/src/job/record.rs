//! The job record and its lifecycle states.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::InferenceConfig;
use crate::error::JobError;
use crate::schema::FileReport;

/// Identifier for one inference job.
pub type JobId = Uuid;

/// Lifecycle state of an inference job.
///
/// Queued and Processing are non-terminal; Completed and Failed are terminal
/// and immutable apart from the override path, which never changes status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the job can no longer transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Proof of a successful claim.
///
/// Every claim bumps the job's epoch; completion, failure, and heartbeats are
/// accepted only from the ticket holding the current epoch. A worker whose
/// stale claim was reclaimed keeps a dead ticket and cannot corrupt the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTicket {
    pub(crate) job_id: JobId,
    pub(crate) epoch: u64,
}

impl ClaimTicket {
    /// The claimed job.
    pub fn job_id(&self) -> JobId {
        self.job_id
    }
}

/// One inference job: a file reference plus lifecycle state and outcome.
#[derive(Debug, Clone)]
pub struct InferenceJob {
    pub id: JobId,
    pub path: PathBuf,
    pub config: InferenceConfig,
    pub status: JobStatus,
    /// Present exactly when status is Completed.
    pub report: Option<FileReport>,
    /// Present exactly when status is Failed.
    pub error: Option<JobError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Refreshed by the owning worker at each checkpoint while Processing.
    pub heartbeat_at: Option<DateTime<Utc>>,
    /// Set by cancel() against a Processing job; honored at the next
    /// row-batch checkpoint.
    pub cancel_requested: bool,
    pub(crate) epoch: u64,
}

impl InferenceJob {
    /// Create a freshly queued job.
    pub fn new(path: PathBuf, config: InferenceConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            path,
            config,
            status: JobStatus::Queued,
            report: None,
            error: None,
            created_at: now,
            updated_at: now,
            heartbeat_at: None,
            cancel_requested: false,
            epoch: 0,
        }
    }

    /// Read-only view for status pollers.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            file: self.path.clone(),
            status: self.status,
            report: self.report.clone(),
            error: self.error.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Consistent point-in-time view of a job, safe to poll at any frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub file: PathBuf,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<FileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
