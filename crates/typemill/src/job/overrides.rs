//! User-declared type overrides against completed jobs.

use chrono::Utc;
use tracing::info;

use crate::error::{Result, TypemillError};
use crate::schema::{ColumnReport, FileReport, TypeCandidate};

use super::record::{JobId, JobStatus};
use super::store::JobStore;

impl JobStore {
    /// Record a type override for one column of a completed job.
    ///
    /// The override is a user declaration and is accepted for any member of
    /// the type vocabulary without re-validation against evidence. Only the
    /// `override` field changes; `inferred` stays untouched for audit. The
    /// job's `updated_at` is bumped. Concurrent overrides on the same column
    /// serialize under the job lock, last committed wins.
    pub fn apply_override(
        &self,
        id: JobId,
        column: &str,
        requested: TypeCandidate,
    ) -> Result<ColumnReport> {
        self.with_job_mut(id, |job| {
            if job.status != JobStatus::Completed {
                return Err(TypemillError::JobNotReady(format!(
                    "job {id} is {:?}, overrides require a completed job",
                    job.status
                )));
            }

            let report = job
                .report
                .as_mut()
                .ok_or_else(|| TypemillError::Internal("completed job without report".into()))?;

            let updated = override_column(report, column, requested)?;
            job.updated_at = Utc::now();
            info!(job = %id, column, requested = %requested, "column type overridden");
            Ok(updated)
        })
    }
}

/// Apply an override directly to a report, returning the updated column.
///
/// Shared by the job store and by offline report editing.
pub fn override_column(
    report: &mut FileReport,
    column: &str,
    requested: TypeCandidate,
) -> Result<ColumnReport> {
    let col = report
        .column_mut(column)
        .ok_or_else(|| TypemillError::ColumnNotFound(column.to_string()))?;
    col.r#override = Some(requested);
    Ok(col.clone())
}
