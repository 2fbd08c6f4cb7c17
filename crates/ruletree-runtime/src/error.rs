//! Runtime error types

use ruletree_core::CoreError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Stack underflow
    #[error("Stack underflow")]
    StackUnderflow,

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// Variable missing from the input data
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// Field not found
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Map key not found
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// List index out of range
    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Integer or duration arithmetic overflowed
    #[error("Overflow in {0}")]
    Overflow(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Regular expression failed to compile
    #[error("Invalid regex: {0}")]
    InvalidRegex(String),

    /// Malformed duration, timestamp or number text
    #[error("Invalid value: {0}")]
    InvalidValue(#[from] CoreError),

    /// Call to a function the runtime does not provide
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Program counter out of bounds
    #[error("Program counter out of bounds: {0}")]
    PCOutOfBounds(isize),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
