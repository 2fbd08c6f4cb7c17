//! Intermediate Representation (IR) definitions

pub mod instruction;
pub mod program;

pub use instruction::Instruction;
pub use program::{Program, ProgramMetadata};
