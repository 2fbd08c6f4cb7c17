//! ruletree Compiler - schema and expression compiler
//!
//! This crate turns schemas into typed declarations and expressions into
//! executable IR programs:
//! - [`SchemaCompiler`] maps schema types onto declaration types
//! - [`TypeChecker`] validates expressions against declarations
//! - [`ExpressionCompiler`] generates stack-machine instructions
//! - [`Compiler`] runs parse, check and generate for one expression

pub mod codegen;
pub mod compiler;
pub mod declarations;
pub mod error;
pub mod schema_compiler;
pub mod semantic;

// Re-export main types
pub use codegen::ExpressionCompiler;
pub use compiler::{CheckedExpression, Compiler, ParsedExpression};
pub use declarations::{Decl, DeclType, Declarations, TypeRegistry};
pub use error::{CompileError, Result};
pub use schema_compiler::SchemaCompiler;
pub use semantic::TypeChecker;
