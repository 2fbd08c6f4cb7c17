//! Type checker
//!
//! Infers and validates the type of an expression against a declaration set.

use super::functions::{self, CallStyle};
use crate::declarations::{DeclType, Declarations};
use crate::error::{CompileError, Result};
use ruletree_core::ast::{Expression, Operator, UnaryOperator};
use ruletree_core::Value;

/// Type checker
pub struct TypeChecker<'a> {
    declarations: &'a Declarations,
}

impl<'a> TypeChecker<'a> {
    /// Create a type checker for a declaration set
    pub fn new(declarations: &'a Declarations) -> Self {
        Self { declarations }
    }

    /// Check an expression and return its static type
    ///
    /// All undeclared identifiers are reported together before any type
    /// checking takes place.
    pub fn check(&self, expr: &Expression) -> Result<DeclType> {
        let undeclared: Vec<String> = expr
            .identifiers()
            .into_iter()
            .filter(|name| !self.declarations.contains(name))
            .map(str::to_string)
            .collect();
        if !undeclared.is_empty() {
            return Err(CompileError::UndeclaredReference(undeclared));
        }

        self.check_expression(expr)
    }

    fn check_expression(&self, expr: &Expression) -> Result<DeclType> {
        match expr {
            Expression::Literal(value) => Ok(Self::infer_literal_type(value)),

            Expression::Ident(name) => self
                .declarations
                .lookup(name)
                .cloned()
                .ok_or_else(|| CompileError::UndeclaredReference(vec![name.clone()])),

            Expression::Select { operand, field } => {
                let operand_type = self.check_expression(operand)?;
                self.check_select(&operand_type, field)
            }

            Expression::Index { operand, index } => {
                let operand_type = self.check_expression(operand)?;
                let index_type = self.check_expression(index)?;
                Self::check_index(&operand_type, &index_type)
            }

            Expression::Binary { left, op, right } => {
                let left_type = self.check_expression(left)?;
                let right_type = self.check_expression(right)?;
                Self::check_binary_operation(&left_type, op, &right_type)
            }

            Expression::Unary { op, operand } => {
                let operand_type = self.check_expression(operand)?;
                Self::check_unary_operation(op, &operand_type)
            }

            Expression::Call {
                target,
                function,
                args,
            } => {
                let mut arg_types = Vec::with_capacity(args.len() + 1);
                let style = match target {
                    Some(receiver) => {
                        arg_types.push(self.check_expression(receiver)?);
                        CallStyle::Method
                    }
                    None => CallStyle::Global,
                };
                for arg in args {
                    arg_types.push(self.check_expression(arg)?);
                }
                functions::resolve(function, style, &arg_types)
            }

            Expression::Ternary {
                condition,
                true_expr,
                false_expr,
            } => {
                let condition_type = self.check_expression(condition)?;
                if !condition_type.is_boolean() {
                    return Err(CompileError::TypeError(format!(
                        "Ternary condition must be bool, found {}",
                        condition_type
                    )));
                }
                let true_type = self.check_expression(true_expr)?;
                let false_type = self.check_expression(false_expr)?;
                Ok(true_type.unify(&false_type))
            }

            Expression::List(items) => {
                let mut element = None::<DeclType>;
                for item in items {
                    let item_type = self.check_expression(item)?;
                    element = Some(match element {
                        Some(current) => current.unify(&item_type),
                        None => item_type,
                    });
                }
                Ok(DeclType::list(element.unwrap_or(DeclType::Dyn)))
            }

            Expression::Map(entries) => {
                let mut key = None::<DeclType>;
                let mut value = None::<DeclType>;
                for (k, v) in entries {
                    let key_type = self.check_expression(k)?;
                    if !key_type.is_valid_map_key() {
                        return Err(CompileError::TypeError(format!(
                            "{} cannot be used as a map key",
                            key_type
                        )));
                    }
                    let value_type = self.check_expression(v)?;
                    key = Some(key.map_or(key_type.clone(), |k| k.unify(&key_type)));
                    value = Some(value.map_or(value_type.clone(), |v| v.unify(&value_type)));
                }
                Ok(DeclType::map(
                    key.unwrap_or(DeclType::Dyn),
                    value.unwrap_or(DeclType::Dyn),
                ))
            }
        }
    }

    /// Infer the type of a literal value
    fn infer_literal_type(value: &Value) -> DeclType {
        match value {
            Value::Null => DeclType::Null,
            Value::Bool(_) => DeclType::Bool,
            Value::Int(_) => DeclType::Int,
            Value::Float(_) => DeclType::Double,
            Value::String(_) => DeclType::String,
            Value::Duration(_) => DeclType::Duration,
            Value::Timestamp(_) => DeclType::Timestamp,
            Value::List(_) => DeclType::list(DeclType::Dyn),
            Value::Map(_) => DeclType::map(DeclType::Dyn, DeclType::Dyn),
        }
    }

    fn check_select(&self, operand: &DeclType, field: &str) -> Result<DeclType> {
        match operand {
            DeclType::Dyn => Ok(DeclType::Dyn),
            DeclType::Map(key, value) if matches!(**key, DeclType::String | DeclType::Dyn) => {
                Ok((**value).clone())
            }
            DeclType::Object(name) => self
                .declarations
                .messages()
                .field_type(name, field)
                .cloned()
                .ok_or_else(|| CompileError::UndefinedField {
                    type_name: name.clone(),
                    field: field.to_string(),
                }),
            other => Err(CompileError::TypeError(format!(
                "Cannot select field '{}' on {}",
                field, other
            ))),
        }
    }

    fn check_index(operand: &DeclType, index: &DeclType) -> Result<DeclType> {
        match operand {
            DeclType::Dyn => Ok(DeclType::Dyn),
            DeclType::List(element) => {
                if matches!(index, DeclType::Int | DeclType::Dyn) {
                    Ok((**element).clone())
                } else {
                    Err(CompileError::TypeError(format!(
                        "List index must be int, found {}",
                        index
                    )))
                }
            }
            DeclType::Map(key, value) => {
                if index.is_compatible_with(key) {
                    Ok((**value).clone())
                } else {
                    Err(CompileError::TypeError(format!(
                        "Map key must be {}, found {}",
                        key, index
                    )))
                }
            }
            other => Err(CompileError::TypeError(format!("Cannot index into {}", other))),
        }
    }

    /// Check if a binary operation is valid for the given types
    fn check_binary_operation(left: &DeclType, op: &Operator, right: &DeclType) -> Result<DeclType> {
        use DeclType::*;

        let mismatch = || {
            CompileError::TypeError(format!(
                "Operator '{}' cannot be applied to {} and {}",
                op, left, right
            ))
        };

        match op {
            Operator::And | Operator::Or => {
                if left.is_boolean() && right.is_boolean() {
                    Ok(Bool)
                } else {
                    Err(mismatch())
                }
            }

            Operator::Eq | Operator::Ne => {
                if left.is_compatible_with(right) {
                    Ok(Bool)
                } else {
                    Err(mismatch())
                }
            }

            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
                if left.is_orderable() && right.is_orderable() && left.is_compatible_with(right) {
                    Ok(Bool)
                } else {
                    Err(mismatch())
                }
            }

            Operator::In => match right {
                Dyn => Ok(Bool),
                List(element) if left.is_compatible_with(element) => Ok(Bool),
                Map(key, _) if left.is_compatible_with(key) => Ok(Bool),
                _ => Err(mismatch()),
            },

            Operator::Add => match (left, right) {
                (Dyn, _) | (_, Dyn) => Ok(Dyn),
                (Int, Int) => Ok(Int),
                (Int | Double, Int | Double) => Ok(Double),
                (String, String) => Ok(String),
                (List(a), List(b)) => Ok(DeclType::list(a.unify(b))),
                (Duration, Duration) => Ok(Duration),
                (Timestamp, Duration) | (Duration, Timestamp) => Ok(Timestamp),
                _ => Err(mismatch()),
            },

            Operator::Sub => match (left, right) {
                (Dyn, _) | (_, Dyn) => Ok(Dyn),
                (Int, Int) => Ok(Int),
                (Int | Double, Int | Double) => Ok(Double),
                (Duration, Duration) => Ok(Duration),
                (Timestamp, Duration) => Ok(Timestamp),
                (Timestamp, Timestamp) => Ok(Duration),
                _ => Err(mismatch()),
            },

            Operator::Mul | Operator::Div | Operator::Mod => match (left, right) {
                (Dyn, _) | (_, Dyn) => Ok(Dyn),
                (Int, Int) => Ok(Int),
                (Int | Double, Int | Double) => Ok(Double),
                _ => Err(mismatch()),
            },
        }
    }

    /// Check if a unary operation is valid for the given type
    fn check_unary_operation(op: &UnaryOperator, operand: &DeclType) -> Result<DeclType> {
        match op {
            UnaryOperator::Not if operand.is_boolean() => Ok(DeclType::Bool),
            UnaryOperator::Negate
                if operand.is_numeric() || matches!(operand, DeclType::Duration) =>
            {
                Ok(operand.clone())
            }
            _ => Err(CompileError::TypeError(format!(
                "Operator '{}' cannot be applied to {}",
                op, operand
            ))),
        }
    }
}
