//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error while reading a document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid expression syntax
    #[error("Invalid expression syntax at offset {position}: {message}")]
    InvalidExpression { position: usize, message: String },

    /// Unexpected token
    #[error("Unexpected {found} at offset {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },

    /// Input ended in the middle of an expression
    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    /// Malformed literal
    #[error("Invalid literal at offset {position}: {literal}")]
    InvalidLiteral { position: usize, literal: String },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
