//! Integration tests for expression and rule-document parsing

use ruletree_core::ast::{Expression, Operator};
use ruletree_core::{Type, Value};
use ruletree_parser::*;
use std::io::Write;

// =============================================================================
// Expression Parser Tests
// =============================================================================

#[test]
fn test_parse_rule_expression() {
    let expr = ExpressionParser::parse("age >= 18 && country in ['DE', 'FR']").unwrap();
    let names: Vec<&str> = expr.identifiers().into_iter().collect();
    assert_eq!(names, vec!["age", "country"]);

    match expr {
        Expression::Binary { op, .. } => assert_eq!(op, Operator::And),
        other => panic!("Expected Binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_self_reference() {
    let expr = ExpressionParser::parse("amount > self.limit").unwrap();
    assert_eq!(
        expr,
        Expression::binary(
            Expression::ident("amount"),
            Operator::Gt,
            Expression::select(Expression::ident("self"), "limit"),
        )
    );
}

#[test]
fn test_parse_error_reports_offset() {
    let err = ExpressionParser::parse("a + ) b").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("offset 4"), "unexpected message: {}", message);
}

// =============================================================================
// Rule Document Tests
// =============================================================================

#[test]
fn test_parse_rule_file_yaml() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
rules:
  - id: order
    schema:
      id: order
      elements:
        - name: total
          type: {{ kind: float }}
        - name: items
          type: {{ kind: list, value_type: {{ kind: string }} }}
    rules:
      - id: large
        expr: "total > 100.0"
"#
    )
    .unwrap();

    let rules = RuleParser::parse_file(file.path()).unwrap();
    assert_eq!(rules.len(), 1);
    let schema = &rules[0].schema;
    assert_eq!(schema.get_element("total").unwrap().data_type, Type::Float);
    assert_eq!(
        schema.get_element("items").unwrap().data_type,
        Type::list(Type::String)
    );
    assert_eq!(rules[0].rules[0].id, "large");
}

#[test]
fn test_parse_rule_file_json() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"rules": [{{"id": "a", "expr": "x > 1"}}, {{"id": "b"}}]}}"#
    )
    .unwrap();

    let rules = RuleParser::parse_file(file.path()).unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_unknown_type_kind_is_any() {
    let rules = RuleParser::parse(
        r#"
rule:
  id: r
  schema:
    elements:
      - name: blob
        type: { kind: bytes }
"#,
    )
    .unwrap();
    assert_eq!(rules[0].schema.elements[0].data_type, Type::Any);
}

#[test]
fn test_parse_data_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"x": 10, "user": {{"name": "ann"}}}}"#).unwrap();

    let data = RuleParser::parse_data_file(file.path()).unwrap();
    assert_eq!(data.get("x"), Some(&Value::Int(10)));
    assert_eq!(
        data.get("user"),
        Some(&Value::map([("name", Value::from("ann"))]))
    );
}

#[test]
fn test_missing_file() {
    let err = RuleParser::parse_file("/nonexistent/rules.yaml").unwrap_err();
    assert!(matches!(err, ParseError::IoError(_)));
}
