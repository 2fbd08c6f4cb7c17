//! IR program executor
//!
//! Runs a compiled [`Program`] on a value stack against one data map.

use super::operators::{call_function, execute_binary_op, execute_compare, execute_unary_op};
use crate::context::ExecutionContext;
use crate::error::{Result, RuntimeError};
use ruletree_core::ir::{Instruction, Program};
use ruletree_core::{MapKey, Value};
use std::collections::{BTreeMap, HashMap};

/// Outcome of a program run
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Value the program produced
    pub value: Value,
    /// Number of instructions executed
    pub cost: u64,
}

/// Executor for IR programs
pub struct Executor;

impl Executor {
    /// Execute a program against the input data
    pub fn execute(program: &Program, data: &HashMap<String, Value>) -> Result<Execution> {
        let mut ctx = ExecutionContext::new(data);
        let mut pc: usize = 0; // Program Counter
        let mut cost: u64 = 0;

        while let Some(instruction) = program.get_instruction(pc) {
            cost += 1;

            match instruction {
                Instruction::LoadIdent { name } => {
                    let value = ctx.load_ident(name)?;
                    ctx.push(value);
                }

                Instruction::LoadConst { value } => ctx.push(value.clone()),

                Instruction::Select { field } => {
                    let operand = ctx.pop()?;
                    ctx.push(Self::select(operand, field)?);
                }

                Instruction::Index => {
                    let index = ctx.pop()?;
                    let operand = ctx.pop()?;
                    ctx.push(Self::index(operand, index)?);
                }

                Instruction::BinaryOp { op } => {
                    let right = ctx.pop()?;
                    let left = ctx.pop()?;
                    ctx.push(execute_binary_op(&left, op, &right)?);
                }

                Instruction::Compare { op } => {
                    let right = ctx.pop()?;
                    let left = ctx.pop()?;
                    ctx.push(Value::Bool(execute_compare(&left, op, &right)?));
                }

                Instruction::UnaryOp { op } => {
                    let operand = ctx.pop()?;
                    ctx.push(execute_unary_op(&operand, op)?);
                }

                Instruction::Call { function, argc } => {
                    let args = ctx.pop_n(*argc)?;
                    ctx.push(call_function(function, args)?);
                }

                Instruction::MakeList { len } => {
                    let items = ctx.pop_n(*len)?;
                    ctx.push(Value::List(items));
                }

                Instruction::MakeMap { len } => {
                    let flat = ctx.pop_n(len * 2)?;
                    let mut entries = BTreeMap::new();
                    let mut iter = flat.into_iter();
                    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                        entries.insert(MapKey::try_from(key)?, value);
                    }
                    ctx.push(Value::Map(entries));
                }

                Instruction::Jump { offset } => {
                    pc = Self::jump_target(program, pc, *offset)?;
                    continue;
                }

                Instruction::JumpIfTrue { offset } => {
                    if Self::pop_condition(&mut ctx)? {
                        pc = Self::jump_target(program, pc, *offset)?;
                        continue;
                    }
                }

                Instruction::JumpIfFalse { offset } => {
                    if !Self::pop_condition(&mut ctx)? {
                        pc = Self::jump_target(program, pc, *offset)?;
                        continue;
                    }
                }

                Instruction::Dup => ctx.dup()?,

                Instruction::Pop => {
                    ctx.pop()?;
                }

                Instruction::Return => break,
            }

            pc += 1;
        }

        let value = ctx.pop()?;
        tracing::trace!(
            "executed '{}' in {} step(s)",
            program.metadata.source,
            cost
        );
        Ok(Execution { value, cost })
    }

    fn jump_target(program: &Program, pc: usize, offset: isize) -> Result<usize> {
        let target = pc as isize + offset;
        if target < 0 || target as usize > program.instruction_count() {
            return Err(RuntimeError::PCOutOfBounds(target));
        }
        Ok(target as usize)
    }

    fn pop_condition(ctx: &mut ExecutionContext<'_>) -> Result<bool> {
        match ctx.pop()? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeError(format!(
                "Expected bool condition, found {}",
                other.type_name()
            ))),
        }
    }

    fn select(operand: Value, field: &str) -> Result<Value> {
        match operand {
            Value::Map(mut entries) => entries
                .remove(&MapKey::String(field.to_string()))
                .ok_or_else(|| RuntimeError::FieldNotFound(field.to_string())),
            other => Err(RuntimeError::TypeError(format!(
                "Cannot select field '{}' on {}",
                field,
                other.type_name()
            ))),
        }
    }

    fn index(operand: Value, index: Value) -> Result<Value> {
        match (operand, index) {
            (Value::List(mut items), Value::Int(i)) => {
                let len = items.len();
                usize::try_from(i)
                    .ok()
                    .filter(|&idx| idx < len)
                    .map(|idx| items.swap_remove(idx))
                    .ok_or(RuntimeError::IndexOutOfBounds { index: i, len })
            }
            (Value::Map(mut entries), key) => {
                let label = key.to_string();
                let key = MapKey::try_from(key)?;
                entries
                    .remove(&key)
                    .ok_or(RuntimeError::KeyNotFound(label))
            }
            (operand, index) => Err(RuntimeError::TypeError(format!(
                "Cannot index {} with {}",
                operand.type_name(),
                index.type_name()
            ))),
        }
    }
}
