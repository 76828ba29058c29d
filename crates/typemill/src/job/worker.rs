//! Background workers that pull claimable jobs and run the engine.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{ErrorKind, JobError, TypemillError};
use crate::infer::{Checkpoint, InferenceEngine};

use super::record::ClaimTicket;
use super::store::JobStore;

/// How long an idle worker blocks before re-checking the queue and shutdown
/// flag.
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// Checkpoint wired to the store: refreshes the claim heartbeat and observes
/// cancellation requests once per row batch.
struct JobCheckpoint {
    store: Arc<JobStore>,
    ticket: ClaimTicket,
}

impl Checkpoint for JobCheckpoint {
    fn observe(&self, _rows_seen: usize) -> bool {
        if !self.store.heartbeat(self.ticket) {
            // Claim was reclaimed as stale; stop touching this job.
            return false;
        }
        !self.store.cancel_requested(self.ticket)
    }
}

/// A pool of worker threads draining a shared job store.
///
/// Delivery may be at-least-once: duplicate execution attempts are harmless
/// because the store's atomic claim is the dedup point.
pub struct WorkerPool {
    store: Arc<JobStore>,
    shutdown: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads against the store.
    pub fn start(store: Arc<JobStore>, workers: usize) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let handles = (0..workers.max(1))
            .map(|index| {
                let store = Arc::clone(&store);
                let shutdown = Arc::clone(&shutdown);
                std::thread::Builder::new()
                    .name(format!("typemill-worker-{index}"))
                    .spawn(move || worker_loop(store, shutdown))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            store,
            shutdown,
            handles,
        }
    }

    /// The shared store.
    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Signal shutdown and join all workers. In-flight jobs run to their
    /// terminal state before the worker exits.
    pub fn shutdown(mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.store.notify_all();
        for handle in self.handles.drain(..) {
            let _unused = handle.join();
        }
    }
}

fn worker_loop(store: Arc<JobStore>, shutdown: Arc<AtomicBool>) {
    while !shutdown.load(Ordering::SeqCst) {
        match store.claim_next() {
            Some((ticket, path, config)) => process_job(&store, ticket, path, config),
            None => store.wait_for_work(IDLE_WAIT),
        }
    }
}

fn process_job(
    store: &Arc<JobStore>,
    ticket: ClaimTicket,
    path: std::path::PathBuf,
    config: crate::config::InferenceConfig,
) {
    info!(job = %ticket.job_id(), file = %path.display(), "worker picked up job");

    let checkpoint = JobCheckpoint {
        store: Arc::clone(store),
        ticket,
    };
    let engine = InferenceEngine::with_config(config);

    // The worker boundary converts every failure mode, panics included, into
    // a terminal job state; a job is never left stuck in Processing by a
    // worker that is still alive to report.
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        engine.run_with_checkpoint(&path, &checkpoint)
    }));

    let result = match outcome {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker panicked".to_string());
            Err(TypemillError::Internal(message))
        }
    };

    let finished = match result {
        Ok(report) => store.complete(ticket, report),
        Err(TypemillError::Cancelled(detail)) => {
            if store.cancel_requested(ticket) {
                store.fail(ticket, JobError::new(ErrorKind::Cancelled, detail))
            } else {
                // The checkpoint failed because the claim was reclaimed, not
                // because of a user cancellation. Another worker owns the job
                // now; drop the result silently.
                warn!(job = %ticket.job_id(), "claim lost mid-run; abandoning result");
                Ok(())
            }
        }
        Err(err) => store.fail(ticket, JobError::from(&err)),
    };

    if let Err(err) = finished {
        // Losing the claim between the checkpoint and the final transition is
        // the only way to land here.
        warn!(job = %ticket.job_id(), "could not record outcome: {err}");
    }
}
