//! Unit tests for Engine

use super::*;
use crate::backend::DataMap;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::NativeEvaluator;
use ruletree_core::{EvalOption, Rule, Schema, Type, Value, SELF_KEY};
use serde_json::json;

fn int_schema() -> Schema {
    Schema::new("ints").with_element("x", Type::Int)
}

fn data(x: i64) -> DataMap {
    DataMap::from([("x".to_string(), Value::Int(x))])
}

#[test]
fn test_engine_creation() {
    let engine = Engine::new();
    assert_eq!(engine.rule_count(), 0);
    assert_eq!(engine.config(), &EngineConfig::default());
    assert!(engine.describe().is_empty());
}

#[test]
fn test_children_admission() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(Rule::new("big").with_expr("x > 5"))
                .add_rule(Rule::new("small").with_expr("x < 5")),
        )
        .unwrap();

    let result = engine.evaluate(&mut data(10), "root", &[]).unwrap();
    assert!(result.pass);
    assert_eq!(result.results.len(), 2);
    assert!(result.child("big").unwrap().pass);
    assert!(!result.child("small").unwrap().pass);
    assert_eq!(result.child("big").unwrap().depth, 1);

    let result = engine
        .evaluate(&mut data(10), "root", &[EvalOption::ReturnFail(false)])
        .unwrap();
    assert_eq!(result.results.len(), 1);
    assert!(result.child("big").is_some());

    let result = engine
        .evaluate(&mut data(10), "root", &[EvalOption::ReturnPass(false)])
        .unwrap();
    assert_eq!(result.results.len(), 1);
    assert!(result.child("small").is_some());
}

#[test]
fn test_subtree_options_override() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(Rule::new("loud").with_expr("x < 0"))
                .add_rule(
                    Rule::new("quiet")
                        .with_opt(EvalOption::ReturnFail(false))
                        .add_rule(Rule::new("quiet_fail").with_expr("x < 0"))
                        .add_rule(Rule::new("quiet_pass").with_expr("x > 0")),
                ),
        )
        .unwrap();

    let result = engine.evaluate(&mut data(1), "root", &[]).unwrap();
    // the override applies to the subtree only
    assert!(result.child("loud").is_some());
    let quiet = result.child("quiet").unwrap();
    assert_eq!(quiet.results.len(), 1);
    assert!(quiet.child("quiet_pass").is_some());
}

#[test]
fn test_max_depth_truncates() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("l0")
                .with_schema(int_schema())
                .add_rule(Rule::new("l1").add_rule(Rule::new("l2").with_expr("x > 0"))),
        )
        .unwrap();

    let result = engine
        .evaluate(&mut data(1), "l0", &[EvalOption::MaxDepth(1)])
        .unwrap();
    let l1 = result.child("l1").unwrap();
    assert!(l1.results.is_empty());
    assert_eq!(result.len(), 2);

    let result = engine
        .evaluate(&mut data(1), "l0", &[EvalOption::MaxDepth(0)])
        .unwrap();
    assert!(result.results.is_empty());
}

#[test]
fn test_self_injection_does_not_leak() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(
                    Rule::new("with_self")
                        .with_self(Value::map([("limit", Value::Int(5))]))
                        .with_expr("x > self.limit"),
                )
                .add_rule(Rule::new("without_self").with_expr("self.limit == 5")),
        )
        .unwrap();

    let mut input = data(7);
    let err = engine.evaluate(&mut input, "root", &[]).unwrap_err();
    match err {
        EngineError::Evaluation { rule_id, .. } => assert_eq!(rule_id, "without_self"),
        other => panic!("Expected evaluation error, got {:?}", other),
    }
    assert!(!input.contains_key(SELF_KEY));
}

#[test]
fn test_self_left_in_data() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("r")
                .with_schema(int_schema())
                .with_self(3)
                .with_expr("x > self"),
        )
        .unwrap();

    let mut input = data(4);
    let result = engine.evaluate(&mut input, "r", &[]).unwrap();
    assert!(result.pass);
    assert_eq!(input.get(SELF_KEY), Some(&Value::Int(3)));
}

#[test]
fn test_action_and_meta_pass_through() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("r")
                .with_schema(int_schema())
                .with_expr("x > 1")
                .with_action(json!({"notify": "ops"}))
                .with_meta(json!({"owner": "risk"})),
        )
        .unwrap();

    let result = engine.evaluate(&mut data(0), "r", &[]).unwrap();
    assert!(!result.pass);
    assert_eq!(result.action, Some(json!({"notify": "ops"})));
    assert_eq!(result.meta, Some(json!({"owner": "risk"})));
}

#[test]
fn test_non_boolean_value_fails() {
    let mut engine = Engine::new();
    engine
        .add_rule(Rule::new("double").with_schema(int_schema()).with_expr("x * 2"))
        .unwrap();

    let result = engine.evaluate(&mut data(21), "double", &[]).unwrap();
    assert!(!result.pass);
    assert_eq!(result.as_i64(), Some(42));
}

#[test]
fn test_child_ids_validated() {
    let mut engine = Engine::new();
    let err = engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(Rule::new("ok").add_rule(Rule::new(" "))),
        )
        .unwrap_err();
    match err {
        EngineError::Validation(message) => assert!(message.contains("'ok'"), "{}", message),
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert_eq!(engine.rule_count(), 0);
}

#[test]
fn test_reregister_as_grouping_drops_program() {
    let mut engine = Engine::new();
    engine
        .add_rule(Rule::new("r").with_schema(int_schema()).with_expr("x > 100"))
        .unwrap();
    assert!(!engine.evaluate(&mut data(1), "r", &[]).unwrap().pass);

    engine
        .add_rule(Rule::new("r").with_schema(int_schema()))
        .unwrap();
    assert!(!engine.store().has_program("r"));
    assert!(engine.evaluate(&mut data(1), "r", &[]).unwrap().pass);
    assert_eq!(engine.rule_count(), 1);
}

#[test]
fn test_failed_registration_keeps_compiled_nodes() {
    let mut engine = Engine::new();
    let err = engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(Rule::new("good").with_expr("x > 1"))
                .add_rule(Rule::new("bad").with_expr("x >")),
        )
        .unwrap_err();

    assert!(matches!(err, EngineError::Compile { ref rule_id, .. } if rule_id == "bad"));
    assert!(engine.rule("root").is_none());
    assert!(engine.store().has_program("good"));
}

#[test]
fn test_deadline_exceeded() {
    let config = EngineConfig::new().with_timeout(std::time::Duration::ZERO);
    let mut engine = Engine::with_config(NativeEvaluator::new(), config);
    engine
        .add_rule(Rule::new("r").with_schema(int_schema()).with_expr("x > 1"))
        .unwrap();

    let err = engine.evaluate(&mut data(2), "r", &[]).unwrap_err();
    assert!(err.to_string().contains("deadline exceeded"));
}

#[test]
fn test_describe() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(Rule::new("leaf").with_expr("x > 1")),
        )
        .unwrap();
    engine
        .add_rule(Rule::new("another").with_schema(int_schema()).with_expr("x == 0"))
        .unwrap();

    assert_eq!(engine.describe(), "another *\nroot\n  leaf *\n");
}

#[test]
fn test_grouping_node_schema_is_validated() {
    let mut engine = Engine::new();
    let no_descriptor = Schema::new("orders").with_element(
        "order",
        Type::Message {
            name: "shop.Order".into(),
            descriptor: None,
        },
    );
    let err = engine
        .add_rule(Rule::new("g").with_schema(no_descriptor))
        .unwrap_err();
    assert!(matches!(err, EngineError::Schema(_)), "{:?}", err);

    let duplicated = Schema::new("dup")
        .with_element("x", Type::Int)
        .with_element("x", Type::String);
    let err = engine
        .add_rule(Rule::new("g").with_schema(duplicated))
        .unwrap_err();
    assert!(matches!(err, EngineError::Environment(_)), "{:?}", err);

    assert_eq!(engine.rule_count(), 0);
}

#[test]
fn test_truncated_children_do_not_trigger_negative_stop() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(
                    Rule::new("outer")
                        .with_expr("x > 0")
                        .add_rule(Rule::new("inner_fail").with_expr("x < 0")),
                )
                .add_rule(Rule::new("sibling").with_expr("x > 1")),
        )
        .unwrap();

    let options = [
        EvalOption::MaxDepth(1),
        EvalOption::StopFirstNegativeChild(true),
    ];
    let result = engine.evaluate(&mut data(5), "root", &options).unwrap();
    assert!(result.child("sibling").is_some());
    assert!(result.child("outer").unwrap().results.is_empty());

    // with room to descend the failing grandchild is reached
    let result = engine
        .evaluate(&mut data(5), "root", &[EvalOption::StopFirstNegativeChild(true)])
        .unwrap();
    assert!(result.child("outer").unwrap().child("inner_fail").is_some());
    assert!(result.child("sibling").is_some());
}

#[test]
fn test_truncated_children_do_not_trigger_positive_stop() {
    let mut engine = Engine::new();
    engine
        .add_rule(
            Rule::new("root")
                .with_schema(int_schema())
                .add_rule(
                    Rule::new("outer")
                        .with_expr("x < 0")
                        .add_rule(Rule::new("inner_pass").with_expr("x > 0")),
                )
                .add_rule(Rule::new("sibling").with_expr("x < -1")),
        )
        .unwrap();

    let options = [
        EvalOption::MaxDepth(1),
        EvalOption::StopFirstPositiveChild(true),
    ];
    let result = engine.evaluate(&mut data(5), "root", &options).unwrap();
    assert_eq!(result.results.len(), 2);
    assert!(!result.child("outer").unwrap().pass);
    assert!(result.child("outer").unwrap().results.is_empty());
    assert!(!result.child("sibling").unwrap().pass);
}
