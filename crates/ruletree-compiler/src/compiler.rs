//! Main compiler
//!
//! Runs the three compilation stages (parse, check, generate) for one
//! expression against one declaration set.

use crate::codegen::ExpressionCompiler;
use crate::declarations::{DeclType, Declarations};
use crate::error::Result;
use crate::semantic::TypeChecker;
use ruletree_core::ast::Expression;
use ruletree_core::ir::{Program, ProgramMetadata};
use ruletree_parser::ExpressionParser;

/// A parsed expression, not yet type checked
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpression {
    pub source: String,
    pub expr: Expression,
}

/// An expression that passed type checking
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedExpression {
    pub source: String,
    pub expr: Expression,
    pub result_type: DeclType,
}

/// Expression compiler bound to a declaration set
#[derive(Debug, Clone)]
pub struct Compiler {
    declarations: Declarations,
}

impl Compiler {
    /// Create a compiler for a declaration set
    pub fn new(declarations: Declarations) -> Self {
        Self { declarations }
    }

    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    /// Parse expression text
    pub fn parse(&self, source: &str) -> Result<ParsedExpression> {
        let expr = ExpressionParser::parse(source)?;
        Ok(ParsedExpression {
            source: source.to_string(),
            expr,
        })
    }

    /// Type check a parsed expression
    pub fn check(&self, parsed: ParsedExpression) -> Result<CheckedExpression> {
        let result_type = TypeChecker::new(&self.declarations).check(&parsed.expr)?;
        Ok(CheckedExpression {
            source: parsed.source,
            expr: parsed.expr,
            result_type,
        })
    }

    /// Generate an IR program from a checked expression
    pub fn generate(&self, checked: &CheckedExpression) -> Program {
        let instructions = ExpressionCompiler::new(&self.declarations).compile(&checked.expr);
        Program::new(
            instructions,
            ProgramMetadata::for_expression(&checked.source, checked.result_type.to_string()),
        )
    }

    /// Parse, check and generate in one step
    pub fn compile(&self, source: &str) -> Result<Program> {
        let parsed = self.parse(source)?;
        let checked = self.check(parsed)?;
        Ok(self.generate(&checked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;

    #[test]
    fn test_compile_expression() {
        let compiler = Compiler::new(Declarations::new().with_ident("x", DeclType::Int));
        let program = compiler.compile("x > 5").unwrap();
        assert_eq!(program.metadata.source, "x > 5");
        assert_eq!(program.metadata.result_type, "bool");
        assert_eq!(program.instruction_count(), 4);
    }

    #[test]
    fn test_stage_errors() {
        let compiler = Compiler::new(Declarations::new().with_ident("x", DeclType::Int));
        assert!(matches!(compiler.parse("x >"), Err(CompileError::Parse(_))));

        let parsed = compiler.parse("y > 5").unwrap();
        assert!(matches!(
            compiler.check(parsed),
            Err(CompileError::UndeclaredReference(_))
        ));
    }
}
