//! Expression compiler
//!
//! Compiles Expression AST nodes into IR instructions.
//!
//! Jump offsets are relative to the jump instruction itself; conditional
//! jumps pop their condition.

use crate::declarations::{DeclType, Declarations};
use ruletree_core::ast::{Expression, Operator};
use ruletree_core::ir::Instruction;

/// Expression compiler
pub struct ExpressionCompiler<'a> {
    declarations: &'a Declarations,
}

impl<'a> ExpressionCompiler<'a> {
    /// Create an expression compiler for a declaration set
    pub fn new(declarations: &'a Declarations) -> Self {
        Self { declarations }
    }

    /// Compile an expression into IR instructions, terminated by `Return`
    pub fn compile(&self, expr: &Expression) -> Vec<Instruction> {
        let mut instructions = self.compile_expression(expr);
        instructions.push(Instruction::Return);
        instructions
    }

    fn compile_expression(&self, expr: &Expression) -> Vec<Instruction> {
        match expr {
            Expression::Literal(value) => vec![Instruction::LoadConst {
                value: value.clone(),
            }],

            Expression::Ident(name) => {
                let mut instructions = vec![Instruction::LoadIdent { name: name.clone() }];
                // Data documents carry durations and timestamps as strings
                match self.declarations.lookup(name) {
                    Some(DeclType::Duration) => instructions.push(Instruction::Call {
                        function: "duration".to_string(),
                        argc: 1,
                    }),
                    Some(DeclType::Timestamp) => instructions.push(Instruction::Call {
                        function: "timestamp".to_string(),
                        argc: 1,
                    }),
                    _ => {}
                }
                instructions
            }

            Expression::Select { operand, field } => {
                let mut instructions = self.compile_expression(operand);
                instructions.push(Instruction::Select {
                    field: field.clone(),
                });
                instructions
            }

            Expression::Index { operand, index } => {
                let mut instructions = self.compile_expression(operand);
                instructions.extend(self.compile_expression(index));
                instructions.push(Instruction::Index);
                instructions
            }

            Expression::Binary {
                left,
                op: Operator::And,
                right,
            } => self.compile_short_circuit(left, right, false),

            Expression::Binary {
                left,
                op: Operator::Or,
                right,
            } => self.compile_short_circuit(left, right, true),

            Expression::Binary { left, op, right } => {
                let mut instructions = self.compile_expression(left);
                instructions.extend(self.compile_expression(right));
                if op.is_comparison() {
                    instructions.push(Instruction::Compare { op: *op });
                } else {
                    instructions.push(Instruction::BinaryOp { op: *op });
                }
                instructions
            }

            Expression::Unary { op, operand } => {
                let mut instructions = self.compile_expression(operand);
                instructions.push(Instruction::UnaryOp { op: *op });
                instructions
            }

            Expression::Call {
                target,
                function,
                args,
            } => {
                let mut instructions = Vec::new();
                if let Some(receiver) = target {
                    instructions.extend(self.compile_expression(receiver));
                }
                for arg in args {
                    instructions.extend(self.compile_expression(arg));
                }
                instructions.push(Instruction::Call {
                    function: function.clone(),
                    argc: args.len() + usize::from(target.is_some()),
                });
                instructions
            }

            Expression::Ternary {
                condition,
                true_expr,
                false_expr,
            } => {
                let mut instructions = self.compile_expression(condition);
                let true_instructions = self.compile_expression(true_expr);
                let false_instructions = self.compile_expression(false_expr);

                // Skip the true branch and the trailing jump
                instructions.push(Instruction::JumpIfFalse {
                    offset: (true_instructions.len() + 2) as isize,
                });
                instructions.extend(true_instructions);
                // Skip the false branch
                instructions.push(Instruction::Jump {
                    offset: (false_instructions.len() + 1) as isize,
                });
                instructions.extend(false_instructions);
                instructions
            }

            Expression::List(items) => {
                let mut instructions = Vec::new();
                for item in items {
                    instructions.extend(self.compile_expression(item));
                }
                instructions.push(Instruction::MakeList { len: items.len() });
                instructions
            }

            Expression::Map(entries) => {
                let mut instructions = Vec::new();
                for (key, value) in entries {
                    instructions.extend(self.compile_expression(key));
                    instructions.extend(self.compile_expression(value));
                }
                instructions.push(Instruction::MakeMap { len: entries.len() });
                instructions
            }
        }
    }

    /// `left && right` or `left || right`, skipping `right` when `left` decides
    ///
    /// Layout: left, Dup, JumpIf{True|False} -> end, Pop, right, end
    fn compile_short_circuit(
        &self,
        left: &Expression,
        right: &Expression,
        jump_when: bool,
    ) -> Vec<Instruction> {
        let mut instructions = self.compile_expression(left);
        let right_instructions = self.compile_expression(right);
        let offset = (right_instructions.len() + 2) as isize;

        instructions.push(Instruction::Dup);
        instructions.push(if jump_when {
            Instruction::JumpIfTrue { offset }
        } else {
            Instruction::JumpIfFalse { offset }
        });
        instructions.push(Instruction::Pop);
        instructions.extend(right_instructions);
        instructions
    }
}
