//! Expression parser
//!
//! Parses string expressions into Expression AST nodes.
//!
//! Supported syntax (lowest to highest precedence):
//! - Ternary: `cond ? a : b`
//! - Logical: `||`, `&&`
//! - Relations: `==`, `!=`, `<`, `<=`, `>`, `>=`, `in`
//! - Arithmetic: `+`, `-`, then `*`, `/`, `%`
//! - Unary: `!`, `-`
//! - Member access: `a.b`, `a[i]`, method calls `s.startsWith("x")`
//! - Primary: literals, identifiers, function calls `size(x)`, lists `[1, 2]`,
//!   maps `{"k": v}`, parentheses

use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use ruletree_core::ast::{Expression, Operator, UnaryOperator};
use ruletree_core::Value;

/// Expression parser
pub struct ExpressionParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Expression> {
        if input.trim().is_empty() {
            return Err(ParseError::InvalidExpression {
                position: 0,
                message: "empty expression".to_string(),
            });
        }

        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Self { tokens, pos: 0 };
        let expr = parser.parse_ternary()?;

        if let Some(token) = parser.peek() {
            return Err(ParseError::UnexpectedToken {
                position: token.position,
                found: token.kind.to_string(),
                expected: "end of expression".to_string(),
            });
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken {
                position: token.position,
                found: token.kind.to_string(),
                expected: kind.to_string(),
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: kind.to_string(),
            }),
        }
    }

    fn parse_ternary(&mut self) -> Result<Expression> {
        let condition = self.parse_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let true_expr = self.parse_or()?;
        self.expect(TokenKind::Colon)?;
        // right-associative: a ? b : c ? d : e
        let false_expr = self.parse_ternary()?;
        Ok(Expression::ternary(condition, true_expr, false_expr))
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = Expression::binary(left, Operator::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_relation()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.parse_relation()?;
            left = Expression::binary(left, Operator::And, right);
        }
        Ok(left)
    }

    fn parse_relation(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::EqEq) => Operator::Eq,
                Some(TokenKind::NotEq) => Operator::Ne,
                Some(TokenKind::Lt) => Operator::Lt,
                Some(TokenKind::Le) => Operator::Le,
                Some(TokenKind::Gt) => Operator::Gt,
                Some(TokenKind::Ge) => Operator::Ge,
                Some(TokenKind::In) => Operator::In,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_additive()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => Operator::Add,
                Some(TokenKind::Minus) => Operator::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => Operator::Mul,
                Some(TokenKind::Slash) => Operator::Div,
                Some(TokenKind::Percent) => Operator::Mod,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.eat(&TokenKind::Bang) {
            let operand = self.parse_unary()?;
            return Ok(Expression::unary(UnaryOperator::Not, operand));
        }
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            // Fold negative numeric literals into constants
            return Ok(match operand {
                Expression::Literal(Value::Int(i)) => Expression::Literal(Value::Int(-i)),
                Expression::Literal(Value::Float(f)) => Expression::Literal(Value::Float(-f)),
                other => Expression::unary(UnaryOperator::Negate, other),
            });
        }
        self.parse_member()
    }

    fn parse_member(&mut self) -> Result<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let name = self.expect_ident()?;
                if self.eat(&TokenKind::LParen) {
                    let args = self.parse_list_items(TokenKind::RParen)?;
                    expr = Expression::method(expr, name, args);
                } else {
                    expr = Expression::select(expr, name);
                }
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_ternary()?;
                self.expect(TokenKind::RBracket)?;
                expr = Expression::index(expr, index);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let token = self.advance().ok_or_else(|| ParseError::UnexpectedEnd {
            expected: "an operand".to_string(),
        })?;

        match token.kind {
            TokenKind::Int(i) => Ok(Expression::Literal(Value::Int(i))),
            TokenKind::Float(f) => Ok(Expression::Literal(Value::Float(f))),
            TokenKind::Str(s) => Ok(Expression::Literal(Value::String(s))),
            TokenKind::True => Ok(Expression::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expression::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expression::Literal(Value::Null)),
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let args = self.parse_list_items(TokenKind::RParen)?;
                    Ok(Expression::call(name, args))
                } else {
                    Ok(Expression::Ident(name))
                }
            }
            TokenKind::LParen => {
                let expr = self.parse_ternary()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                let items = self.parse_list_items(TokenKind::RBracket)?;
                Ok(Expression::List(items))
            }
            TokenKind::LBrace => self.parse_map_entries(),
            other => Err(ParseError::UnexpectedToken {
                position: token.position,
                found: other.to_string(),
                expected: "an operand".to_string(),
            }),
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            Some(token) => Err(ParseError::UnexpectedToken {
                position: token.position,
                found: token.kind.to_string(),
                expected: "a field name".to_string(),
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "a field name".to_string(),
            }),
        }
    }

    /// Parse comma separated expressions up to (and including) `close`
    fn parse_list_items(&mut self, close: TokenKind) -> Result<Vec<Expression>> {
        let mut items = Vec::new();
        if self.eat(&close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_ternary()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(close)?;
            return Ok(items);
        }
    }

    fn parse_map_entries(&mut self) -> Result<Expression> {
        let mut entries = Vec::new();
        if self.eat(&TokenKind::RBrace) {
            return Ok(Expression::Map(entries));
        }
        loop {
            let key = self.parse_ternary()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_ternary()?;
            entries.push((key, value));
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RBrace)?;
            return Ok(Expression::Map(entries));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expression {
        Expression::ident(name)
    }

    #[test]
    fn test_parse_number_literal() {
        let expr = ExpressionParser::parse("42").unwrap();
        assert_eq!(expr, Expression::literal(42));

        let expr = ExpressionParser::parse("3.5").unwrap();
        assert_eq!(expr, Expression::literal(3.5));

        let expr = ExpressionParser::parse("-7").unwrap();
        assert_eq!(expr, Expression::literal(-7));
    }

    #[test]
    fn test_parse_string_and_keyword_literals() {
        assert_eq!(
            ExpressionParser::parse(r#""hello world""#).unwrap(),
            Expression::literal("hello world")
        );
        assert_eq!(ExpressionParser::parse("true").unwrap(), Expression::literal(true));
        assert_eq!(
            ExpressionParser::parse("null").unwrap(),
            Expression::Literal(Value::Null)
        );
    }

    #[test]
    fn test_parse_binary_comparison() {
        let expr = ExpressionParser::parse("x > 5").unwrap();
        assert_eq!(
            expr,
            Expression::binary(ident("x"), Operator::Gt, Expression::literal(5))
        );
    }

    #[test]
    fn test_precedence() {
        // a + b * c == d  =>  (a + (b * c)) == d
        let expr = ExpressionParser::parse("a + b * c == d").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(
                    ident("a"),
                    Operator::Add,
                    Expression::binary(ident("b"), Operator::Mul, ident("c")),
                ),
                Operator::Eq,
                ident("d"),
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        // a - b - c  =>  (a - b) - c
        let expr = ExpressionParser::parse("a - b - c").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(ident("a"), Operator::Sub, ident("b")),
                Operator::Sub,
                ident("c"),
            )
        );
    }

    #[test]
    fn test_logical_operators() {
        // a || b && c  =>  a || (b && c)
        let expr = ExpressionParser::parse("a || b && c").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                ident("a"),
                Operator::Or,
                Expression::binary(ident("b"), Operator::And, ident("c")),
            )
        );
    }

    #[test]
    fn test_parentheses() {
        let expr = ExpressionParser::parse("(a + b) * (c + d)").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(ident("a"), Operator::Add, ident("b")),
                Operator::Mul,
                Expression::binary(ident("c"), Operator::Add, ident("d")),
            )
        );
    }

    #[test]
    fn test_member_access_and_calls() {
        let expr = ExpressionParser::parse(r#"order.customer.name.startsWith("A")"#).unwrap();
        assert_eq!(
            expr,
            Expression::method(
                Expression::select(Expression::select(ident("order"), "customer"), "name"),
                "startsWith",
                vec![Expression::literal("A")],
            )
        );

        let expr = ExpressionParser::parse("size(items) > 0").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::call("size", vec![ident("items")]),
                Operator::Gt,
                Expression::literal(0),
            )
        );
    }

    #[test]
    fn test_index_and_collections() {
        let expr = ExpressionParser::parse(r#"prices["apple"] in [1, 2.5]"#).unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::index(ident("prices"), Expression::literal("apple")),
                Operator::In,
                Expression::List(vec![Expression::literal(1), Expression::literal(2.5)]),
            )
        );

        let expr = ExpressionParser::parse(r#"{"a": 1, "b": x}"#).unwrap();
        assert_eq!(
            expr,
            Expression::Map(vec![
                (Expression::literal("a"), Expression::literal(1)),
                (Expression::literal("b"), ident("x")),
            ])
        );
    }

    #[test]
    fn test_ternary() {
        let expr = ExpressionParser::parse("x < 18 ? 0 : x < 65 ? 1 : 2").unwrap();
        assert_eq!(
            expr,
            Expression::ternary(
                Expression::binary(ident("x"), Operator::Lt, Expression::literal(18)),
                Expression::literal(0),
                Expression::ternary(
                    Expression::binary(ident("x"), Operator::Lt, Expression::literal(65)),
                    Expression::literal(1),
                    Expression::literal(2),
                ),
            )
        );
    }

    #[test]
    fn test_unary() {
        let expr = ExpressionParser::parse("!active && -balance > 0").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::unary(UnaryOperator::Not, ident("active")),
                Operator::And,
                Expression::binary(
                    Expression::unary(UnaryOperator::Negate, ident("balance")),
                    Operator::Gt,
                    Expression::literal(0),
                ),
            )
        );
    }

    #[test]
    fn test_invalid_expression() {
        assert!(ExpressionParser::parse("").is_err());
        assert!(ExpressionParser::parse("   ").is_err());
        assert!(ExpressionParser::parse("@#$").is_err());
        assert!(matches!(
            ExpressionParser::parse("x >"),
            Err(ParseError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            ExpressionParser::parse("x 5"),
            Err(ParseError::UnexpectedToken { position: 2, .. })
        ));
        assert!(ExpressionParser::parse("(a + b").is_err());
        assert!(ExpressionParser::parse("a ? b").is_err());
    }
}
