//! Binary operator execution

use super::comparison::values_equal;
use crate::error::{Result, RuntimeError};
use ruletree_core::ast::Operator;
use ruletree_core::{MapKey, Value};

/// Execute an arithmetic or membership operation
pub(crate) fn execute_binary_op(left: &Value, op: &Operator, right: &Value) -> Result<Value> {
    let mismatch = || {
        RuntimeError::TypeError(format!(
            "Cannot apply {} to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))
    };
    let overflow = || RuntimeError::Overflow(format!("{} {} {}", left, op, right));

    match (left, op, right) {
        // Integer arithmetic is checked
        (Value::Int(l), Operator::Add, Value::Int(r)) => {
            l.checked_add(*r).map(Value::Int).ok_or_else(overflow)
        }
        (Value::Int(l), Operator::Sub, Value::Int(r)) => {
            l.checked_sub(*r).map(Value::Int).ok_or_else(overflow)
        }
        (Value::Int(l), Operator::Mul, Value::Int(r)) => {
            l.checked_mul(*r).map(Value::Int).ok_or_else(overflow)
        }
        (Value::Int(_), Operator::Div | Operator::Mod, Value::Int(0)) => {
            Err(RuntimeError::DivisionByZero)
        }
        (Value::Int(l), Operator::Div, Value::Int(r)) => {
            l.checked_div(*r).map(Value::Int).ok_or_else(overflow)
        }
        (Value::Int(l), Operator::Mod, Value::Int(r)) => {
            l.checked_rem(*r).map(Value::Int).ok_or_else(overflow)
        }

        // Mixed or float arithmetic
        (Value::Int(_) | Value::Float(_), _, Value::Int(_) | Value::Float(_))
            if op.is_arithmetic() =>
        {
            let (l, r) = match (left.as_f64(), right.as_f64()) {
                (Some(l), Some(r)) => (l, r),
                _ => return Err(mismatch()),
            };
            match op {
                Operator::Add => Ok(Value::Float(l + r)),
                Operator::Sub => Ok(Value::Float(l - r)),
                Operator::Mul => Ok(Value::Float(l * r)),
                Operator::Div if r == 0.0 => Err(RuntimeError::DivisionByZero),
                Operator::Div => Ok(Value::Float(l / r)),
                Operator::Mod if r == 0.0 => Err(RuntimeError::DivisionByZero),
                _ => Ok(Value::Float(l % r)),
            }
        }

        // Concatenation
        (Value::String(l), Operator::Add, Value::String(r)) => {
            Ok(Value::String(format!("{}{}", l, r)))
        }
        (Value::List(l), Operator::Add, Value::List(r)) => {
            Ok(Value::List(l.iter().chain(r).cloned().collect()))
        }

        // Time arithmetic
        (Value::Duration(l), Operator::Add, Value::Duration(r)) => {
            l.checked_add(r).map(Value::Duration).ok_or_else(overflow)
        }
        (Value::Duration(l), Operator::Sub, Value::Duration(r)) => {
            l.checked_sub(r).map(Value::Duration).ok_or_else(overflow)
        }
        (Value::Timestamp(t), Operator::Add, Value::Duration(d))
        | (Value::Duration(d), Operator::Add, Value::Timestamp(t)) => t
            .checked_add_signed(*d)
            .map(Value::Timestamp)
            .ok_or_else(overflow),
        (Value::Timestamp(t), Operator::Sub, Value::Duration(d)) => t
            .checked_sub_signed(*d)
            .map(Value::Timestamp)
            .ok_or_else(overflow),
        (Value::Timestamp(l), Operator::Sub, Value::Timestamp(r)) => {
            Ok(Value::Duration(l.signed_duration_since(*r)))
        }

        // Membership
        (_, Operator::In, Value::List(items)) => {
            Ok(Value::Bool(items.iter().any(|item| values_equal(left, item))))
        }
        (_, Operator::In, Value::Map(entries)) => {
            let found = MapKey::try_from(left.clone())
                .map(|key| entries.contains_key(&key))
                .unwrap_or(false);
            Ok(Value::Bool(found))
        }

        _ => Err(mismatch()),
    }
}
