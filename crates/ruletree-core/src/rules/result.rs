//! Evaluation result tree

use crate::types::Value;
use serde::Serialize;
use std::collections::HashMap;

/// Result of evaluating one rule and its admitted children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    /// ID of the evaluated rule
    pub rule_id: String,

    /// Whether the rule's value was a boolean `true`
    pub pass: bool,

    /// Raw value produced by the rule's expression
    pub value: Value,

    /// Action payload copied from the rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<serde_json::Value>,

    /// Meta payload copied from the rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,

    /// Depth of the rule in the evaluated tree (root = 0)
    pub depth: usize,

    /// Admitted child results keyed by child rule ID
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub results: HashMap<String, RuleResult>,
}

impl RuleResult {
    /// Create an empty result for a rule at the given depth
    pub fn new(rule_id: impl Into<String>, depth: usize) -> Self {
        Self {
            rule_id: rule_id.into(),
            pass: false,
            value: Value::Null,
            action: None,
            meta: None,
            depth,
            results: HashMap::new(),
        }
    }

    /// Look up an admitted child result
    pub fn child(&self, rule_id: &str) -> Option<&RuleResult> {
        self.results.get(rule_id)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Number of results in this tree, including this one
    pub fn len(&self) -> usize {
        1 + self.results.values().map(RuleResult::len).sum::<usize>()
    }

    /// A result always contains at least itself
    pub fn is_empty(&self) -> bool {
        false
    }
}
