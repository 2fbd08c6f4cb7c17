//! End-to-end tests: compile expressions and run them

use ruletree_compiler::{Compiler, DeclType, Declarations};
use ruletree_core::Value;
use ruletree_runtime::{Executor, RuntimeError};
use std::collections::HashMap;

fn declarations() -> Declarations {
    Declarations::new()
        .with_ident("x", DeclType::Int)
        .with_ident("price", DeclType::Double)
        .with_ident("name", DeclType::String)
        .with_ident("tags", DeclType::list(DeclType::String))
        .with_ident("created", DeclType::Timestamp)
        .with_ident("self", DeclType::Dyn)
}

fn run(source: &str, data: &[(&str, Value)]) -> Result<Value, RuntimeError> {
    let program = Compiler::new(declarations()).compile(source).unwrap();
    let data: HashMap<String, Value> = data
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Executor::execute(&program, &data).map(|execution| execution.value)
}

#[test]
fn test_rule_expression() {
    assert_eq!(run("x > 5", &[("x", Value::Int(10))]).unwrap(), Value::Bool(true));
    assert_eq!(run("x > 5", &[("x", Value::Int(3))]).unwrap(), Value::Bool(false));
}

#[test]
fn test_arithmetic_and_ternary() {
    assert_eq!(
        run("x * 2 + 1", &[("x", Value::Int(4))]).unwrap(),
        Value::Int(9)
    );
    assert_eq!(
        run("x > 3 ? price * 2.0 : 0.0", &[("x", Value::Int(4)), ("price", Value::Float(1.25))])
            .unwrap(),
        Value::Float(2.5)
    );
    assert_eq!(
        run("x > 3 ? 'big' : 'small'", &[("x", Value::Int(1))]).unwrap(),
        Value::from("small")
    );
}

#[test]
fn test_or_short_circuit_avoids_error() {
    // the right side would divide by zero
    assert_eq!(
        run("x == 0 || 10 / x > 1", &[("x", Value::Int(0))]).unwrap(),
        Value::Bool(true)
    );
    assert!(matches!(
        run("x != 0 || 10 / x > 1", &[("x", Value::Int(0))]),
        Err(RuntimeError::DivisionByZero)
    ));
}

#[test]
fn test_strings_and_lists() {
    let data = [
        ("name", Value::from("Alice")),
        ("tags", Value::List(vec![Value::from("vip"), Value::from("eu")])),
    ];
    assert_eq!(
        run("name.startsWith('A') && 'vip' in tags && size(tags) == 2", &data).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        run("name.matches('^[A-Z][a-z]+$')", &data).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_timestamp_strings_are_coerced() {
    let data = [("created", Value::from("2024-03-01T12:00:00Z"))];
    assert_eq!(
        run("created > timestamp('2024-01-01T00:00:00Z')", &data).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        run("created - duration('12h') == timestamp('2024-03-01T00:00:00Z')", &data).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_self_value() {
    let data = [
        ("x", Value::Int(12)),
        ("self", Value::map([("limit", Value::Int(10))])),
    ];
    assert_eq!(run("x > self.limit", &data).unwrap(), Value::Bool(true));
    assert!(matches!(
        run("x > self.other", &data),
        Err(RuntimeError::FieldNotFound(_))
    ));
}

#[test]
fn test_collections_literals() {
    assert_eq!(
        run("{'a': x, 'b': 2}['a'] + [1, 2, 3][2]", &[("x", Value::Int(5))]).unwrap(),
        Value::Int(8)
    );
}

#[test]
fn test_overflow() {
    assert!(matches!(
        run("x + 1", &[("x", Value::Int(i64::MAX))]),
        Err(RuntimeError::Overflow(_))
    ));
}
