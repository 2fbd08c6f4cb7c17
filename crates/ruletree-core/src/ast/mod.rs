//! Abstract Syntax Tree (AST) definitions for ruletree expressions

pub mod expression;
pub mod operator;

pub use expression::Expression;
pub use operator::{Operator, UnaryOperator};
