//! Asynchronous job lifecycle around the inference engine.
//!
//! One `InferenceJob` record per submitted file, held in a keyed `JobStore`;
//! workers claim queued jobs with an atomic compare-and-set and drive them to
//! a terminal state. Status pollers and override requesters operate
//! concurrently against store snapshots.

mod overrides;
mod record;
mod store;
mod worker;

pub use overrides::override_column;
pub use record::{ClaimTicket, InferenceJob, JobId, JobSnapshot, JobStatus};
pub use store::JobStore;
pub use worker::WorkerPool;
