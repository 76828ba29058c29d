//! The type inference core: recognizers, per-column evidence accumulation,
//! resolution, and the engine that drives one file end to end.

mod accumulator;
mod engine;
mod recognize;
mod resolver;

pub use accumulator::{ColumnAccumulator, ColumnEvidence};
pub use engine::{Checkpoint, InferenceEngine, NoCheckpoint};
pub use recognize::{is_missing, RecognizerSet};
pub use resolver::TypeResolver;
