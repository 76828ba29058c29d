//! Keyed job registry with atomic state transitions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::InferenceConfig;
use crate::error::{ErrorKind, JobError, Result, TypemillError};
use crate::input::RowSampler;
use crate::schema::FileReport;

use super::record::{ClaimTicket, InferenceJob, JobId, JobSnapshot, JobStatus};

/// In-memory store of one job record per submitted file.
///
/// All mutation funnels through the transition methods below; the job map is
/// the only shared mutable resource and is held under a single lock for the
/// short duration of each transition. Engine work always runs outside the
/// lock, so status polling never blocks on a worker.
pub struct JobStore {
    jobs: Mutex<HashMap<JobId, InferenceJob>>,
    work_available: Condvar,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            work_available: Condvar::new(),
        }
    }

    /// Submit a file for inference; returns immediately with the new job id,
    /// normally in the Queued state.
    ///
    /// The header is preflighted synchronously: a file with a malformed
    /// header (empty or duplicate column names) fails at submission and the
    /// job lands directly in Failed without ever reaching Processing. All
    /// other problems are discovered by the worker.
    pub fn submit(&self, path: PathBuf, config: InferenceConfig) -> JobId {
        let mut job = InferenceJob::new(path, config);
        let id = job.id;

        if let Err(err @ TypemillError::Header(_)) =
            RowSampler::open(&job.path, &job.config).map(|_| ())
        {
            warn!(job = %id, "rejected at submission: {err}");
            job.status = JobStatus::Failed;
            job.error = Some(JobError::from(&err));
        } else {
            info!(job = %id, file = %job.path.display(), "job submitted");
        }

        let mut jobs = self.jobs.lock().unwrap();
        jobs.insert(id, job);
        self.work_available.notify_one();
        id
    }

    /// Read-only snapshot of a job; safe to call at arbitrary frequency.
    pub fn snapshot(&self, id: JobId) -> Result<JobSnapshot> {
        let jobs = self.jobs.lock().unwrap();
        jobs.get(&id)
            .map(InferenceJob::snapshot)
            .ok_or(TypemillError::JobNotFound(id))
    }

    /// Atomically claim a specific queued job.
    ///
    /// Exactly one of any number of racing claimants wins; the losers get
    /// `None` and must perform no work on the job.
    pub fn claim(&self, id: JobId) -> Result<Option<ClaimTicket>> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&id).ok_or(TypemillError::JobNotFound(id))?;
        Ok(Self::claim_job(job))
    }

    /// Claim the oldest queued job, if any.
    pub fn claim_next(&self) -> Option<(ClaimTicket, PathBuf, InferenceConfig)> {
        let mut jobs = self.jobs.lock().unwrap();
        let id = jobs
            .values()
            .filter(|j| j.status == JobStatus::Queued)
            .min_by_key(|j| j.created_at)
            .map(|j| j.id)?;

        let job = jobs.get_mut(&id).expect("job disappeared under lock");
        let ticket = Self::claim_job(job)?;
        Some((ticket, job.path.clone(), job.config.clone()))
    }

    fn claim_job(job: &mut InferenceJob) -> Option<ClaimTicket> {
        if job.status != JobStatus::Queued {
            return None;
        }
        let now = Utc::now();
        job.status = JobStatus::Processing;
        job.epoch += 1;
        job.heartbeat_at = Some(now);
        job.updated_at = now;
        info!(job = %job.id, "job claimed");
        Some(ClaimTicket {
            job_id: job.id,
            epoch: job.epoch,
        })
    }

    /// Record a successful run. Accepted only from the current claim holder
    /// while the job is Processing.
    pub fn complete(&self, ticket: ClaimTicket, report: FileReport) -> Result<()> {
        self.finish(ticket, Ok(report))
    }

    /// Record a failed run. Accepted only from the current claim holder
    /// while the job is Processing.
    pub fn fail(&self, ticket: ClaimTicket, error: JobError) -> Result<()> {
        self.finish(ticket, Err(error))
    }

    fn finish(
        &self,
        ticket: ClaimTicket,
        outcome: std::result::Result<FileReport, JobError>,
    ) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(&ticket.job_id)
            .ok_or(TypemillError::JobNotFound(ticket.job_id))?;

        if job.status != JobStatus::Processing || job.epoch != ticket.epoch {
            return Err(TypemillError::Internal(format!(
                "claim on job {} is no longer current",
                ticket.job_id
            )));
        }

        match outcome {
            Ok(report) => {
                info!(job = %job.id, columns = report.column_count, "job completed");
                job.status = JobStatus::Completed;
                job.report = Some(report);
            }
            Err(error) => {
                warn!(job = %job.id, kind = ?error.kind, "job failed: {}", error.message);
                job.status = JobStatus::Failed;
                job.error = Some(error);
            }
        }
        job.heartbeat_at = None;
        job.updated_at = Utc::now();
        Ok(())
    }

    /// Refresh the claim's heartbeat. Returns false when the claim is no
    /// longer current; the worker must then abandon the job.
    pub fn heartbeat(&self, ticket: ClaimTicket) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.get_mut(&ticket.job_id) {
            Some(job) if job.status == JobStatus::Processing && job.epoch == ticket.epoch => {
                job.heartbeat_at = Some(Utc::now());
                true
            }
            _ => false,
        }
    }

    /// Whether cancellation was requested for a claimed job.
    pub fn cancel_requested(&self, ticket: ClaimTicket) -> bool {
        let jobs = self.jobs.lock().unwrap();
        jobs.get(&ticket.job_id)
            .map(|j| j.cancel_requested && j.epoch == ticket.epoch)
            .unwrap_or(false)
    }

    /// Cancel a job.
    ///
    /// A Queued job fails immediately with kind Cancelled, never having
    /// started. A Processing job is not preempted: the request is recorded
    /// and applied at the worker's next row-batch checkpoint. Terminal jobs
    /// are left untouched. Returns the status after the call.
    pub fn cancel(&self, id: JobId) -> Result<JobStatus> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&id).ok_or(TypemillError::JobNotFound(id))?;

        match job.status {
            JobStatus::Queued => {
                job.status = JobStatus::Failed;
                job.error = Some(JobError::new(
                    ErrorKind::Cancelled,
                    "cancelled before processing started",
                ));
                job.updated_at = Utc::now();
                info!(job = %id, "queued job cancelled");
            }
            JobStatus::Processing => {
                job.cancel_requested = true;
                job.updated_at = Utc::now();
                info!(job = %id, "cancellation requested; will apply at next checkpoint");
            }
            JobStatus::Completed | JobStatus::Failed => {}
        }
        Ok(job.status)
    }

    /// Return Processing jobs whose heartbeat is older than `staleness` to
    /// the queue so another worker can claim them.
    ///
    /// Only provably stale claims are reclaimed; a job with a fresh heartbeat
    /// is left alone indefinitely. Reclaiming bumps the epoch, so the
    /// original worker's ticket dies even if it later wakes up.
    pub fn reclaim_stale(&self, staleness: Duration) -> Vec<JobId> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(staleness).unwrap_or(chrono::Duration::zero());

        let mut jobs = self.jobs.lock().unwrap();
        let mut reclaimed = Vec::new();
        for job in jobs.values_mut() {
            let stale = job.status == JobStatus::Processing
                && job.heartbeat_at.map(|h| h < cutoff).unwrap_or(true);
            if stale {
                warn!(job = %job.id, "reclaiming stale processing job");
                job.status = JobStatus::Queued;
                job.epoch += 1;
                job.heartbeat_at = None;
                job.updated_at = Utc::now();
                reclaimed.push(job.id);
            }
        }

        if !reclaimed.is_empty() {
            self.work_available.notify_all();
        }
        reclaimed
    }

    /// Block until work may be available or the timeout elapses.
    pub fn wait_for_work(&self, timeout: Duration) {
        let jobs = self.jobs.lock().unwrap();
        if jobs.values().any(|j| j.status == JobStatus::Queued) {
            return;
        }
        let _unused = self.work_available.wait_timeout(jobs, timeout).unwrap();
    }

    /// Wake all waiters (used during shutdown).
    pub fn notify_all(&self) {
        self.work_available.notify_all();
    }

    /// Snapshots of every job, newest first.
    pub fn snapshots(&self) -> Vec<JobSnapshot> {
        let jobs = self.jobs.lock().unwrap();
        let mut all: Vec<JobSnapshot> = jobs.values().map(InferenceJob::snapshot).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Run a closure against a job record under the store lock.
    pub(crate) fn with_job_mut<T>(
        &self,
        id: JobId,
        f: impl FnOnce(&mut InferenceJob) -> Result<T>,
    ) -> Result<T> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&id).ok_or(TypemillError::JobNotFound(id))?;
        f(job)
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
