//! Execution engine module
//!
//! Provides the executor for running IR programs.

pub mod executor;
mod operators;

// Re-export for convenience
pub use executor::{Execution, Executor};
