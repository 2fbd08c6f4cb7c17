//! Compiler error types

use ruletree_parser::ParseError;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug)]
pub enum CompileError {
    /// Expression text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Expression references names the declarations do not contain
    #[error("Undeclared reference(s): {}", .0.join(", "))]
    UndeclaredReference(Vec<String>),

    /// Field selection on a message type that has no such field
    #[error("Undefined field '{field}' on type {type_name}")]
    UndefinedField { type_name: String, field: String },

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// Call to a function that does not exist
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Call with the wrong number of arguments
    #[error("Function {function} expects {expected} argument(s), found {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    /// A schema element whose type cannot be declared
    #[error("Invalid schema element '{element}' at {path}: {message}")]
    InvalidSchema {
        element: String,
        path: String,
        message: String,
    },

    /// Two incompatible definitions for the same name
    #[error("Declaration conflict: {0}")]
    DeclarationConflict(String),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
