//! ruletree Core - Core types and definitions for the ruletree engine
//!
//! This crate provides the fundamental types used across the workspace:
//! - Value types for runtime data
//! - The schema type system (`Type`, `DataElement`, `Schema`)
//! - Rule trees, evaluation options and result trees
//! - Expression AST and IR (Intermediate Representation) definitions
//! - Error types

pub mod ast;
pub mod error;
pub mod ir;
pub mod rules;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use rules::{EvalOption, EvalOptions, Rule, RuleResult, DEFAULT_DEPTH, SELF_KEY};
pub use types::{DataElement, MapKey, MessageDescriptor, Schema, Type, Value};
