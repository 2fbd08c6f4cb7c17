//! IR Program
//!
//! A program is a sequence of IR instructions with associated metadata.

use crate::ir::Instruction;
use serde::{Deserialize, Serialize};

/// An IR program ready for execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The sequence of instructions
    pub instructions: Vec<Instruction>,

    /// Program metadata
    pub metadata: ProgramMetadata,
}

/// Metadata associated with a program
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgramMetadata {
    /// Source expression text
    pub source: String,

    /// Declared result type, as reported by the type checker
    pub result_type: String,

    /// Version of the compiler that generated this
    pub compiler_version: String,
}

impl Program {
    /// Create a new program
    pub fn new(instructions: Vec<Instruction>, metadata: ProgramMetadata) -> Self {
        Self {
            instructions,
            metadata,
        }
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Check if program is empty
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Get instruction at index
    pub fn get_instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }
}

impl ProgramMetadata {
    /// Create metadata for a compiled expression
    pub fn for_expression(source: impl Into<String>, result_type: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            result_type: result_type.into(),
            compiler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
