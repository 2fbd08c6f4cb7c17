//! Code generation module
//!
//! Lowers checked expressions into IR instructions.

pub mod expression_codegen;

pub use expression_codegen::ExpressionCompiler;
