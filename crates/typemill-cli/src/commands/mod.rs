//! Command implementations.

pub mod infer;
pub mod overrides;
pub mod types;
