//! Rule trees, evaluation options and result trees

pub mod options;
pub mod result;
pub mod rule;

pub use options::{EvalOption, EvalOptions, DEFAULT_DEPTH};
pub use result::RuleResult;
pub use rule::{Rule, SELF_KEY};
