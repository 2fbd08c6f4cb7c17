//! Expression AST nodes

use super::operator::{Operator, UnaryOperator};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// Reference to a declared variable (e.g., `age`)
    Ident(String),

    /// Field selection (e.g., `order.total`)
    Select {
        operand: Box<Expression>,
        field: String,
    },

    /// Index access (e.g., `items[0]`, `prices["apple"]`)
    Index {
        operand: Box<Expression>,
        index: Box<Expression>,
    },

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Function call, either global (`size(x)`) or method style (`s.contains(t)`)
    Call {
        /// Receiver for method-style calls
        target: Option<Box<Expression>>,
        function: String,
        args: Vec<Expression>,
    },

    /// Ternary conditional (condition ? true_expr : false_expr)
    Ternary {
        condition: Box<Expression>,
        true_expr: Box<Expression>,
        false_expr: Box<Expression>,
    },

    /// List construction (`[a, b]`)
    List(Vec<Expression>),

    /// Map construction (`{"a": 1}`)
    Map(Vec<(Expression, Expression)>),
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create an identifier expression
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Ident(name.into())
    }

    /// Create a field selection expression
    pub fn select(operand: Expression, field: impl Into<String>) -> Self {
        Expression::Select {
            operand: Box::new(operand),
            field: field.into(),
        }
    }

    /// Create an index expression
    pub fn index(operand: Expression, index: Expression) -> Self {
        Expression::Index {
            operand: Box::new(operand),
            index: Box::new(index),
        }
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: Operator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a global function call expression
    pub fn call(function: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call {
            target: None,
            function: function.into(),
            args,
        }
    }

    /// Create a method call expression
    pub fn method(target: Expression, function: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call {
            target: Some(Box::new(target)),
            function: function.into(),
            args,
        }
    }

    /// Create a ternary expression
    pub fn ternary(condition: Expression, true_expr: Expression, false_expr: Expression) -> Self {
        Expression::Ternary {
            condition: Box::new(condition),
            true_expr: Box::new(true_expr),
            false_expr: Box::new(false_expr),
        }
    }

    /// Names of all variables the expression references, sorted
    pub fn identifiers(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Ident(name) => {
                names.insert(name.as_str());
            }
            Expression::Select { operand, .. } | Expression::Unary { operand, .. } => {
                operand.collect_identifiers(names)
            }
            Expression::Index { operand, index } => {
                operand.collect_identifiers(names);
                index.collect_identifiers(names);
            }
            Expression::Binary { left, right, .. } => {
                left.collect_identifiers(names);
                right.collect_identifiers(names);
            }
            Expression::Call { target, args, .. } => {
                if let Some(target) = target {
                    target.collect_identifiers(names);
                }
                for arg in args {
                    arg.collect_identifiers(names);
                }
            }
            Expression::Ternary {
                condition,
                true_expr,
                false_expr,
            } => {
                condition.collect_identifiers(names);
                true_expr.collect_identifiers(names);
                false_expr.collect_identifiers(names);
            }
            Expression::List(items) => {
                for item in items {
                    item.collect_identifiers(names);
                }
            }
            Expression::Map(entries) => {
                for (k, v) in entries {
                    k.collect_identifiers(names);
                    v.collect_identifiers(names);
                }
            }
        }
    }
}
