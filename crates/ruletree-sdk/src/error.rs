//! SDK error types

use ruletree_parser::ParseError;
use std::fmt;
use thiserror::Error;

/// Compilation stage at which an expression was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStage {
    Parse,
    Check,
    Program,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileStage::Parse => write!(f, "parse"),
            CompileStage::Check => write!(f, "check"),
            CompileStage::Program => write!(f, "program"),
        }
    }
}

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rule failed validation (e.g. blank id)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No usable schema, or a schema type that cannot be declared
    #[error("Schema error: {0}")]
    Schema(String),

    /// Expression rejected by the evaluator backend
    #[error("Compile error in rule '{rule_id}' ({stage}): {message}")]
    Compile {
        rule_id: String,
        stage: CompileStage,
        message: String,
    },

    /// Program execution failed
    #[error("Evaluation error in rule '{rule_id}': {message}")]
    Evaluation { rule_id: String, message: String },

    /// Unknown rule id
    #[error("Rule not found: {0}")]
    NotFound(String),

    /// Calculation result is not numeric
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend refused the declaration set
    #[error("Environment error: {0}")]
    Environment(String),

    /// Rule or data document could not be loaded
    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, EngineError>;
