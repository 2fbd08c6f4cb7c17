//! Rule trees loaded from YAML documents

use ruletree_parser::{DocumentFormat, RuleParser};
use ruletree_sdk::{EngineBuilder, EngineConfig, EvalOption};
use std::io::Write;

const ORDER_RULES: &str = r#"
version: "0.1"
rules:
  - id: order_checks
    schema:
      id: order
      elements:
        - name: amount
          type: { kind: float }
        - name: country
          type: { kind: string }
        - name: items
          type: { kind: list, value_type: { kind: string } }
    meta: { owner: risk }
    rules:
      - id: large_amount
        expr: "amount > self.limit"
        self: { limit: 1000 }
        action: { review: manual }
      - id: blocked_country
        expr: "country in ['XX', 'YY']"
      - id: gift_cards
        expr: "'gift_card' in items"
        opts:
          - stop_if_parent_negative: true
"#;

const ORDER_DATA: &str = r#"
amount: 1500.0
country: FR
items: [book, gift_card]
"#;

#[test]
fn test_yaml_rules_and_data() {
    let engine = EngineBuilder::new()
        .add_rule_content(ORDER_RULES)
        .build()
        .unwrap();
    let mut data = RuleParser::parse_data(ORDER_DATA, DocumentFormat::Yaml).unwrap();

    let result = engine.evaluate(&mut data, "order_checks", &[]).unwrap();
    assert!(result.pass);
    assert_eq!(result.meta, Some(serde_json::json!({"owner": "risk"})));

    let large = result.child("large_amount").unwrap();
    assert!(large.pass);
    assert_eq!(large.action, Some(serde_json::json!({"review": "manual"})));
    assert!(!result.child("blocked_country").unwrap().pass);
    assert!(result.child("gift_cards").unwrap().pass);

    let result = engine
        .evaluate(&mut data, "order_checks", &[EvalOption::ReturnFail(false)])
        .unwrap();
    let mut ids: Vec<&str> = result.results.keys().map(String::as_str).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["gift_cards", "large_amount"]);
}

#[test]
fn test_config_file_defaults_apply() {
    let mut config_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(config_file, "return_pass: false").unwrap();
    let config = EngineConfig::from_file(config_file.path()).unwrap();

    let mut rules_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    rules_file.write_all(ORDER_RULES.as_bytes()).unwrap();

    let engine = EngineBuilder::new()
        .with_config(config)
        .add_rule_file(rules_file.path())
        .build()
        .unwrap();
    let mut data = RuleParser::parse_data(ORDER_DATA, DocumentFormat::Yaml).unwrap();

    let result = engine.evaluate(&mut data, "order_checks", &[]).unwrap();
    assert_eq!(result.results.len(), 1);
    assert!(result.child("blocked_country").is_some());

    // call options override the configured defaults
    let result = engine
        .evaluate(&mut data, "order_checks", &[EvalOption::ReturnPass(true)])
        .unwrap();
    assert_eq!(result.results.len(), 3);
}
