//! ruletree SDK
//!
//! High-level API for registering and evaluating rule trees. Rules are
//! compiled once, when added, through an [`ExpressionEvaluator`] backend;
//! [`Engine::evaluate`] then walks a tree and returns a [`RuleResult`].

pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod rule_engine;

// Re-export main types
pub use backend::{
    BackendError, DataMap, Environment, EvalCost, ExpressionEvaluator, Issues, NativeEvaluator,
    Program,
};
pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub use error::{CompileStage, EngineError, Result};
pub use rule_engine::{Engine, RuleStore};

// Re-export commonly used types from dependencies
pub use ruletree_core::{
    DataElement, EvalOption, EvalOptions, MessageDescriptor, Rule, RuleResult, Schema, Type,
    Value, DEFAULT_DEPTH, SELF_KEY,
};
