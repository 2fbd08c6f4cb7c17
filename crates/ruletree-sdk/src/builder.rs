//! Builder pattern for Engine

use crate::backend::{ExpressionEvaluator, NativeEvaluator};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::rule_engine::Engine;
use ruletree_core::Rule;
use ruletree_parser::{DocumentFormat, RuleParser};
use std::path::PathBuf;
use tracing::debug;

/// Builder for [`Engine`]
///
/// # Example
///
/// ```rust,ignore
/// use ruletree_sdk::EngineBuilder;
///
/// let engine = EngineBuilder::new()
///     .with_config(EngineConfig::load()?)
///     .add_rule_file("rules/orders.yaml")
///     .build()?;
/// ```
pub struct EngineBuilder<E: ExpressionEvaluator = NativeEvaluator> {
    config: EngineConfig,
    evaluator: E,
    rules: Vec<Rule>,
    rule_files: Vec<PathBuf>,
    rule_contents: Vec<(String, DocumentFormat)>,
}

impl EngineBuilder<NativeEvaluator> {
    /// Create a builder using the native expression backend
    pub fn new() -> Self {
        Self::with_evaluator(NativeEvaluator::new())
    }
}

impl Default for EngineBuilder<NativeEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExpressionEvaluator> EngineBuilder<E> {
    /// Create a builder with a custom expression backend
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            config: EngineConfig::default(),
            evaluator,
            rules: Vec::new(),
            rule_files: Vec::new(),
            rule_contents: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn return_pass(mut self, enable: bool) -> Self {
        self.config.return_pass = enable;
        self
    }

    pub fn return_fail(mut self, enable: bool) -> Self {
        self.config.return_fail = enable;
        self
    }

    /// Register a rule tree when the engine is built
    pub fn add_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Load rules from a YAML or JSON file
    pub fn add_rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_files.push(path.into());
        self
    }

    /// Load rules from YAML content
    pub fn add_rule_content(mut self, content: impl Into<String>) -> Self {
        self.rule_contents.push((content.into(), DocumentFormat::Yaml));
        self
    }

    /// Load rules from JSON content
    pub fn add_rule_json(mut self, content: impl Into<String>) -> Self {
        self.rule_contents.push((content.into(), DocumentFormat::Json));
        self
    }

    /// Build the engine, compiling every rule
    ///
    /// Inline rules are registered first, then files, then content.
    pub fn build(self) -> Result<Engine<E>> {
        let mut engine = Engine::with_config(self.evaluator, self.config);

        engine.add_rules(self.rules)?;

        for path in &self.rule_files {
            let rules = RuleParser::parse_file(path)?;
            debug!(path = %path.display(), count = rules.len(), "loaded rule file");
            engine.add_rules(rules)?;
        }

        for (content, format) in &self.rule_contents {
            let rules = match format {
                DocumentFormat::Yaml => RuleParser::parse(content)?,
                DocumentFormat::Json => RuleParser::parse_json(content)?,
            };
            engine.add_rules(rules)?;
        }

        Ok(engine)
    }
}
