//! ruletree Runtime - IR program execution
//!
//! This crate runs the IR programs produced by `ruletree-compiler` on a small
//! stack machine. Integer arithmetic is checked, `&&`/`||` and ternaries
//! short-circuit, and the cost of a run is the number of instructions
//! executed.

pub mod context;
pub mod engine;
pub mod error;

// Re-export main types
pub use context::ExecutionContext;
pub use engine::{Execution, Executor};
pub use error::{Result, RuntimeError};
