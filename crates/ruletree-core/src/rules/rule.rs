//! Rule tree definitions

use super::options::EvalOption;
use crate::types::{Schema, Value};
use serde::{Deserialize, Serialize};

/// Reserved data key under which a rule's `self` value is exposed
pub const SELF_KEY: &str = "self";

/// A node in a rule tree
///
/// A rule without an expression is a pure grouping node: it passes
/// vacuously and only organizes its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule ID, also the lookup key in the engine
    pub id: String,

    /// Expression producing the rule's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,

    /// Schema for this rule and its descendants; empty means inherit
    #[serde(default, skip_serializing_if = "Schema::is_empty")]
    pub schema: Schema,

    /// Context value injected into the data under [`SELF_KEY`]
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_value: Option<Value>,

    /// Opaque payload handed back in the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<serde_json::Value>,

    /// Opaque payload handed back in the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,

    /// Option overrides for this subtree
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opts: Vec<EvalOption>,

    /// Child rules, evaluated in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
}

impl Rule {
    /// Create a grouping rule
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the expression
    pub fn with_expr(mut self, expr: impl Into<String>) -> Self {
        self.expr = Some(expr.into());
        self
    }

    /// Set the schema
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Set the `self` value
    pub fn with_self(mut self, value: impl Into<Value>) -> Self {
        self.self_value = Some(value.into());
        self
    }

    /// Set the action payload
    pub fn with_action(mut self, action: serde_json::Value) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the meta payload
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add an option override
    pub fn with_opt(mut self, option: EvalOption) -> Self {
        self.opts.push(option);
        self
    }

    /// Add a child rule
    pub fn add_rule(mut self, child: Rule) -> Self {
        self.rules.push(child);
        self
    }

    /// Add multiple child rules
    pub fn with_rules(mut self, children: Vec<Rule>) -> Self {
        self.rules.extend(children);
        self
    }

    /// The expression, if the rule carries a non-blank one
    pub fn expression(&self) -> Option<&str> {
        self.expr.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// True when the ID is empty or only whitespace
    pub fn has_blank_id(&self) -> bool {
        self.id.trim().is_empty()
    }
}
