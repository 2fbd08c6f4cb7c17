//! Comparison operator execution

use crate::error::{Result, RuntimeError};
use ruletree_core::ast::Operator;
use ruletree_core::Value;
use std::cmp::Ordering;

/// Equality with numeric widening; values of unrelated types are unequal
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(l), Value::Float(r)) => (*l as f64) == *r,
        (Value::Float(l), Value::Int(r)) => *l == (*r as f64),
        (Value::List(l), Value::List(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        _ => left == right,
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
        (Value::Int(l), Value::Float(r)) => (*l as f64).partial_cmp(r),
        (Value::Float(l), Value::Int(r)) => l.partial_cmp(&(*r as f64)),
        (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        (Value::Duration(l), Value::Duration(r)) => Some(l.cmp(r)),
        (Value::Timestamp(l), Value::Timestamp(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Execute a comparison operation
pub(crate) fn execute_compare(left: &Value, op: &Operator, right: &Value) -> Result<bool> {
    match op {
        Operator::Eq => Ok(values_equal(left, right)),
        Operator::Ne => Ok(!values_equal(left, right)),
        Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
            let Some(order) = ordering(left, right) else {
                // NaN compares false against everything
                if matches!(left, Value::Float(f) if f.is_nan())
                    || matches!(right, Value::Float(f) if f.is_nan())
                {
                    return Ok(false);
                }
                return Err(RuntimeError::TypeError(format!(
                    "Cannot compare {} and {} with {}",
                    left.type_name(),
                    right.type_name(),
                    op
                )));
            };
            Ok(match op {
                Operator::Lt => order == Ordering::Less,
                Operator::Le => order != Ordering::Greater,
                Operator::Gt => order == Ordering::Greater,
                _ => order != Ordering::Less,
            })
        }
        other => Err(RuntimeError::TypeError(format!(
            "{} is not a comparison operator",
            other
        ))),
    }
}
