//! Expression evaluator contract
//!
//! The engine compiles and runs expressions through these traits. An
//! evaluator builds an [`Environment`] from a declaration set; the
//! environment parses, checks and turns expressions into [`Program`]s; a
//! program runs against one data map.
//!
//! [`native`] provides the default implementation on top of
//! `ruletree-compiler` and `ruletree-runtime`.

pub mod native;

use ruletree_compiler::{CompileError, Declarations};
use ruletree_core::Value;
use ruletree_parser::ParseError;
use ruletree_runtime::RuntimeError;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub use native::{NativeEnvironment, NativeEvaluator, NativeProgram};

/// Input data for an evaluation, keyed by declared name
pub type DataMap = HashMap<String, Value>;

/// Work done by one program run
pub type EvalCost = u64;

/// Program type produced by an evaluator
pub type ProgramOf<E> = <<E as ExpressionEvaluator>::Environment as Environment>::Program;

/// Error raised by an evaluator backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Errors from backends other than the native one
    #[error("{0}")]
    Other(String),
}

/// Problems reported by the parse and check stages
#[derive(Debug, Default)]
pub struct Issues(pub Vec<BackendError>);

impl Issues {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for Issues {}

impl From<BackendError> for Issues {
    fn from(error: BackendError) -> Self {
        Issues(vec![error])
    }
}

impl From<ParseError> for Issues {
    fn from(error: ParseError) -> Self {
        Issues(vec![error.into()])
    }
}

impl From<CompileError> for Issues {
    fn from(error: CompileError) -> Self {
        Issues(vec![error.into()])
    }
}

/// Builds evaluation environments from declarations
pub trait ExpressionEvaluator {
    type Environment: Environment;

    /// Create an environment in which exactly the declared names are visible
    fn new_environment(&self, declarations: &Declarations)
        -> Result<Self::Environment, BackendError>;
}

/// Compiles expressions against one declaration set
pub trait Environment {
    type Ast;
    type CheckedAst;
    type Program: Program;

    fn parse(&self, expr: &str) -> Result<Self::Ast, Issues>;

    fn check(&self, ast: Self::Ast) -> Result<Self::CheckedAst, Issues>;

    fn program(&self, checked: Self::CheckedAst) -> Result<Self::Program, BackendError>;
}

/// An executable, reusable compiled expression
pub trait Program {
    fn eval(&self, data: &DataMap) -> Result<(Value, EvalCost), BackendError>;
}
