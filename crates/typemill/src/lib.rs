//! Typemill: streaming column type inference for tabular files.
//!
//! Typemill reads delimited files of arbitrary size, samples rows without
//! materializing the file, and infers per column the most specific type from
//! a closed vocabulary while tolerating missing values. Inference runs as an
//! observable background job: submit a file, poll the job snapshot, and once
//! it completes, optionally override the inferred type of any column.
//!
//! # Core Principles
//!
//! - **Bounded memory**: one pass over sampled rows, O(1) state per column
//! - **Deterministic**: identical file and config produce identical reports
//! - **Auditable**: user overrides are recorded next to, never instead of,
//!   the engine's inference
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use typemill::{InferenceConfig, JobStore, WorkerPool};
//!
//! let store = Arc::new(JobStore::new());
//! let pool = WorkerPool::start(Arc::clone(&store), 2);
//!
//! let id = store.submit("data.csv".into(), InferenceConfig::default());
//! let snapshot = store.snapshot(id).unwrap();
//! println!("status: {:?}", snapshot.status);
//! # pool.shutdown();
//! ```

pub mod config;
pub mod error;
pub mod infer;
pub mod input;
pub mod job;
pub mod schema;

pub use config::{InferenceConfig, SamplingStrategy};
pub use error::{ErrorKind, JobError, Result, TypemillError};
pub use infer::{ColumnAccumulator, ColumnEvidence, InferenceEngine, TypeResolver};
pub use input::RowSampler;
pub use job::{JobId, JobSnapshot, JobStatus, JobStore, WorkerPool};
pub use schema::{ColumnReport, FileReport, TypeCandidate};
