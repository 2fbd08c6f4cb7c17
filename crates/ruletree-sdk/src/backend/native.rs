//! Native expression backend
//!
//! Compiles expressions with `ruletree-compiler` and runs them on the
//! `ruletree-runtime` stack machine.

use super::{BackendError, DataMap, Environment, EvalCost, ExpressionEvaluator, Issues, Program};
use ruletree_compiler::{
    CheckedExpression, CompileError, Compiler, DeclType, Declarations, ParsedExpression,
};
use ruletree_core::ir::Program as IrProgram;
use ruletree_core::{Value, SELF_KEY};
use ruletree_runtime::Executor;
use std::collections::HashSet;

/// Default evaluator backend
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEvaluator;

impl NativeEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEvaluator for NativeEvaluator {
    type Environment = NativeEnvironment;

    fn new_environment(&self, declarations: &Declarations) -> Result<NativeEnvironment, BackendError> {
        let mut seen = HashSet::new();
        for decl in declarations.idents() {
            if !seen.insert(decl.name.as_str()) {
                return Err(CompileError::DeclarationConflict(format!(
                    "identifier '{}' is declared more than once",
                    decl.name
                ))
                .into());
            }
        }

        // `self` is always visible; its shape is only known at runtime
        let mut declarations = declarations.clone();
        if !declarations.contains(SELF_KEY) {
            declarations = declarations.with_ident(SELF_KEY, DeclType::Dyn);
        }

        Ok(NativeEnvironment {
            compiler: Compiler::new(declarations),
        })
    }
}

/// Compilation environment for one declaration set
#[derive(Debug, Clone)]
pub struct NativeEnvironment {
    compiler: Compiler,
}

impl NativeEnvironment {
    pub fn declarations(&self) -> &Declarations {
        self.compiler.declarations()
    }
}

impl Environment for NativeEnvironment {
    type Ast = ParsedExpression;
    type CheckedAst = CheckedExpression;
    type Program = NativeProgram;

    fn parse(&self, expr: &str) -> Result<ParsedExpression, Issues> {
        self.compiler.parse(expr).map_err(Issues::from)
    }

    fn check(&self, ast: ParsedExpression) -> Result<CheckedExpression, Issues> {
        self.compiler.check(ast).map_err(Issues::from)
    }

    fn program(&self, checked: CheckedExpression) -> Result<NativeProgram, BackendError> {
        Ok(NativeProgram {
            program: self.compiler.generate(&checked),
        })
    }
}

/// Compiled IR program
#[derive(Debug, Clone)]
pub struct NativeProgram {
    program: IrProgram,
}

impl NativeProgram {
    /// Declared result type of the expression
    pub fn result_type(&self) -> &str {
        &self.program.metadata.result_type
    }

    pub fn source(&self) -> &str {
        &self.program.metadata.source
    }
}

impl Program for NativeProgram {
    fn eval(&self, data: &DataMap) -> Result<(Value, EvalCost), BackendError> {
        let execution = Executor::execute(&self.program, data)?;
        Ok((execution.value, execution.cost))
    }
}
