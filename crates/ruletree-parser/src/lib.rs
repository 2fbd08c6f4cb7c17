//! ruletree Parser - expression and rule-document parser
//!
//! This crate turns text into the structures defined in `ruletree-core`:
//! - [`ExpressionParser`] parses expression strings into `Expression` ASTs
//! - [`RuleParser`] loads rule trees and data documents from YAML or JSON

pub mod error;
pub mod expression_parser;
pub mod lexer;
pub mod rule_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::ExpressionParser;
pub use rule_parser::{DataDocument, DocumentFormat, RuleParser};
