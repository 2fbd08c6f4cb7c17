//! Execution context
//!
//! Holds the value stack and the input data while a program runs.

use crate::error::{Result, RuntimeError};
use ruletree_core::Value;
use std::collections::HashMap;

/// Execution context for running IR programs
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    /// Value stack for intermediate calculations
    stack: Vec<Value>,

    /// Input data, keyed by variable name
    data: &'a HashMap<String, Value>,
}

impl<'a> ExecutionContext<'a> {
    /// Create a new execution context over the input data
    pub fn new(data: &'a HashMap<String, Value>) -> Self {
        Self {
            stack: Vec::new(),
            data,
        }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> Result<Value> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop `n` values, returned in push order
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>> {
        if self.stack.len() < n {
            return Err(RuntimeError::StackUnderflow);
        }
        Ok(self.stack.split_off(self.stack.len() - n))
    }

    /// Peek at the top value without popping
    pub fn peek(&self) -> Result<&Value> {
        self.stack.last().ok_or(RuntimeError::StackUnderflow)
    }

    /// Duplicate the top stack value
    pub fn dup(&mut self) -> Result<()> {
        let value = self.peek()?.clone();
        self.push(value);
        Ok(())
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Load a variable from the input data
    pub fn load_ident(&self, name: &str) -> Result<Value> {
        self.data
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::VariableNotFound(name.to_string()))
    }
}
