//! IR Instructions
//!
//! Low-level instructions for the ruletree stack machine.

use crate::ast::{Operator, UnaryOperator};
use crate::Value;
use serde::{Deserialize, Serialize};

/// A single IR instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    // ===== Data Loading =====
    /// Load a variable from the input data onto the stack
    LoadIdent {
        /// Variable name
        name: String,
    },

    /// Load a constant value onto the stack
    LoadConst {
        /// The constant value
        value: Value,
    },

    /// Replace the top of stack with one of its fields
    Select {
        /// Field name
        field: String,
    },

    /// Pop an index and a container, push the element
    Index,

    // ===== Operations =====
    /// Perform a binary operation (+ - * / % in)
    BinaryOp {
        /// The operator to apply
        op: Operator,
    },

    /// Perform a comparison operation (== != < > etc.)
    Compare {
        /// The comparison operator
        op: Operator,
    },

    /// Perform a unary operation (! -)
    UnaryOp {
        /// The unary operator
        op: UnaryOperator,
    },

    /// Call a builtin function; method receivers are passed as the first argument
    Call {
        /// Function name
        function: String,
        /// Number of arguments on the stack
        argc: usize,
    },

    // ===== Construction =====
    /// Pop `len` values and push them as a list
    MakeList {
        len: usize,
    },

    /// Pop `len` key/value pairs and push them as a map
    MakeMap {
        len: usize,
    },

    // ===== Control Flow =====
    /// Unconditional jump to offset
    Jump {
        /// Offset to jump, relative to this instruction
        offset: isize,
    },

    /// Pop the top of stack and jump if it is true
    JumpIfTrue {
        /// Offset to jump
        offset: isize,
    },

    /// Pop the top of stack and jump if it is false
    JumpIfFalse {
        /// Offset to jump
        offset: isize,
    },

    /// Return from execution
    Return,

    // ===== Stack Operations =====
    /// Duplicate the top stack value
    Dup,

    /// Pop and discard the top stack value
    Pop,
}

impl Instruction {
    /// Whether this instruction transfers control
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Instruction::Jump { .. } | Instruction::JumpIfTrue { .. } | Instruction::JumpIfFalse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_jump() {
        assert!(Instruction::Jump { offset: 1 }.is_jump());
        assert!(Instruction::JumpIfFalse { offset: 2 }.is_jump());
        assert!(!Instruction::Return.is_jump());
        assert!(!Instruction::Index.is_jump());
    }

    #[test]
    fn test_instruction_serde() {
        let instr = Instruction::Call {
            function: "size".to_string(),
            argc: 1,
        };
        let json = serde_json::to_string(&instr).unwrap();
        let back: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, instr);
    }
}
