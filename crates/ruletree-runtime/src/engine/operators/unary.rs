//! Unary operator execution

use crate::error::{Result, RuntimeError};
use ruletree_core::ast::UnaryOperator;
use ruletree_core::Value;

/// Execute a unary operation
pub(crate) fn execute_unary_op(operand: &Value, op: &UnaryOperator) -> Result<Value> {
    match (op, operand) {
        (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOperator::Negate, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Overflow("negation".to_string())),
        (UnaryOperator::Negate, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOperator::Negate, Value::Duration(d)) => Ok(Value::Duration(-*d)),
        _ => Err(RuntimeError::TypeError(format!(
            "Cannot apply {} to {}",
            op,
            operand.type_name()
        ))),
    }
}
