//! Semantic analysis module
//!
//! Type checking of expressions against declarations, and the builtin
//! function signatures it relies on.

pub mod functions;
pub mod type_checker;

pub use functions::CallStyle;
pub use type_checker::TypeChecker;
