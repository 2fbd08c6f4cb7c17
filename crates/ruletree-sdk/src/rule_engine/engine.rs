//! Engine - compiles rule trees on registration and evaluates them by id

use super::store::RuleStore;
use super::tree_evaluator::TreeEvaluator;
use crate::backend::{
    DataMap, Environment, ExpressionEvaluator, Issues, NativeEvaluator, Program, ProgramOf,
};
use crate::config::EngineConfig;
use crate::error::{CompileStage, EngineError, Result};
use ruletree_compiler::SchemaCompiler;
use ruletree_core::{EvalOption, EvalOptions, Rule, RuleResult, Schema, Value};
use tracing::{debug, warn};

/// Rule-tree engine
///
/// Owns the registered rules and their compiled programs. Registration
/// needs `&mut self`; evaluation only borrows the engine, so a built engine
/// can be shared for concurrent evaluations as long as each call gets its
/// own data map.
pub struct Engine<E: ExpressionEvaluator = NativeEvaluator> {
    evaluator: E,
    store: RuleStore<ProgramOf<E>>,
    config: EngineConfig,
}

impl Engine<NativeEvaluator> {
    /// Create an engine with the native expression backend
    pub fn new() -> Self {
        Self::with_evaluator(NativeEvaluator::new())
    }
}

impl Default for Engine<NativeEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExpressionEvaluator> Engine<E> {
    /// Create an engine with a custom expression backend
    pub fn with_evaluator(evaluator: E) -> Self {
        Self::with_config(evaluator, EngineConfig::default())
    }

    /// Create an engine with a backend and configuration
    pub fn with_config(evaluator: E, config: EngineConfig) -> Self {
        Self {
            evaluator,
            store: RuleStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn store(&self) -> &RuleStore<ProgramOf<E>> {
        &self.store
    }

    /// Compile and register a rule tree
    ///
    /// Every node gets a program compiled against its resolved schema. On
    /// failure the root is not indexed, but programs already compiled for
    /// earlier nodes of the tree stay in the store.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        validate(&rule)?;

        if let Err(e) = self.compile_tree(&rule, None) {
            warn!(rule_id = %rule.id, error = %e, "rule registration failed");
            return Err(e);
        }

        debug!(rule_id = %rule.id, "rule registered");
        self.store.insert_rule(rule);
        Ok(())
    }

    /// Register several rule trees in order; the first failure stops the rest
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<()> {
        for rule in rules {
            self.add_rule(rule)?;
        }
        Ok(())
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.store.rule(id)
    }

    /// Remove a registered rule and its program
    pub fn remove_rule(&mut self, id: &str) -> Option<Rule> {
        let removed = self.store.remove(id);
        if removed.is_some() {
            debug!(rule_id = %id, "rule removed");
        }
        removed
    }

    pub fn rule_count(&self) -> usize {
        self.store.rule_count()
    }

    /// Evaluate a registered rule tree
    ///
    /// `options` are applied on top of the configured defaults. The `self`
    /// entry of `data` is rewritten by every node that carries a program.
    pub fn evaluate(
        &self,
        data: &mut DataMap,
        id: &str,
        options: &[EvalOption],
    ) -> Result<RuleResult> {
        let rule = self
            .store
            .rule(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        let options = self.base_options().apply(options);
        debug!(rule_id = %id, max_depth = options.max_depth, "evaluating rule tree");

        TreeEvaluator::new(self.store.programs())
            .evaluate(data, rule, 0, &options)
            .map_err(|e| {
                warn!(rule_id = %id, error = %e, "evaluation aborted");
                e
            })
    }

    /// Evaluate several rule trees in order with the configured defaults
    pub fn evaluate_all(&self, data: &mut DataMap, ids: &[&str]) -> Result<Vec<RuleResult>> {
        ids.iter().map(|id| self.evaluate(data, id, &[])).collect()
    }

    /// Evaluate rule trees in order until one passes
    pub fn evaluate_until_pass(
        &self,
        data: &mut DataMap,
        ids: &[&str],
    ) -> Result<Option<RuleResult>> {
        for id in ids {
            let result = self.evaluate(data, id, &[])?;
            if result.pass {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Evaluate an ad-hoc numeric expression
    ///
    /// The expression is registered as a rule whose id is the expression
    /// text, so later calls reuse the compiled program. Int results widen to
    /// `f64`; anything else is a conversion error.
    pub fn calculate(&mut self, data: &DataMap, expr: &str, schema: &Schema) -> Result<f64> {
        if !self.store.has_program(expr) {
            self.add_rule(
                Rule::new(expr)
                    .with_expr(expr)
                    .with_schema(schema.clone()),
            )?;
        }

        let program = self
            .store
            .program(expr)
            .ok_or_else(|| EngineError::NotFound(expr.to_string()))?;
        let (value, _) = program.eval(data).map_err(|e| EngineError::Evaluation {
            rule_id: expr.to_string(),
            message: e.to_string(),
        })?;

        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(EngineError::Conversion(format!(
                "expression '{}' returned {} value {}, expected a number",
                expr,
                other.type_name(),
                other
            ))),
        }
    }

    /// Indented listing of the registered trees; nodes with a compiled
    /// program are marked with `*`
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for id in self.store.ids() {
            if let Some(rule) = self.store.rule(id) {
                self.describe_rule(&mut out, rule, 0);
            }
        }
        out
    }

    fn describe_rule(&self, out: &mut String, rule: &Rule, depth: usize) {
        let marker = if self.store.has_program(&rule.id) { " *" } else { "" };
        out.push_str(&format!("{}{}{}\n", "  ".repeat(depth), rule.id, marker));
        for child in &rule.rules {
            self.describe_rule(out, child, depth + 1);
        }
    }

    fn base_options(&self) -> EvalOptions {
        let options = self.config.default_options();
        match self.config.deadline() {
            Some(deadline) => options.with_deadline(deadline),
            None => options,
        }
    }

    fn compile_tree(&mut self, rule: &Rule, ambient: Option<&Schema>) -> Result<()> {
        let schema = SchemaCompiler::resolve(&rule.schema, ambient)
            .ok_or_else(|| EngineError::Schema(format!("No valid schema for rule {}", rule.id)))?;

        // grouping nodes still need a schema their children can compile against
        let env = self.environment(&rule.id, schema)?;

        match rule.expression() {
            Some(expr) => {
                let program = compile_expression(&env, &rule.id, expr)?;
                self.store.insert_program(rule.id.clone(), program);
            }
            None => {
                // re-registered as a grouping node
                self.store.remove_program(&rule.id);
            }
        }

        for child in &rule.rules {
            self.compile_tree(child, Some(schema))?;
        }
        Ok(())
    }

    fn environment(&self, rule_id: &str, schema: &Schema) -> Result<E::Environment> {
        let declarations = SchemaCompiler::compile(schema)
            .map_err(|e| EngineError::Schema(format!("Rule '{}': {}", rule_id, e)))?;

        self.evaluator
            .new_environment(&declarations)
            .map_err(|e| EngineError::Environment(format!("Rule '{}': {}", rule_id, e)))
    }
}

fn compile_expression<Env: Environment>(
    env: &Env,
    rule_id: &str,
    expr: &str,
) -> Result<Env::Program> {
    let ast = env
        .parse(expr)
        .map_err(|issues| compile_error(rule_id, CompileStage::Parse, issues))?;
    let checked = env
        .check(ast)
        .map_err(|issues| compile_error(rule_id, CompileStage::Check, issues))?;
    let program = env
        .program(checked)
        .map_err(|e| compile_error(rule_id, CompileStage::Program, Issues::from(e)))?;

    debug!(rule_id = %rule_id, expr = %expr, "expression compiled");
    Ok(program)
}

/// Every node of the tree needs a non-blank id
fn validate(rule: &Rule) -> Result<()> {
    if rule.has_blank_id() {
        return Err(EngineError::Validation(
            "Rule id must not be blank".to_string(),
        ));
    }
    validate_children(rule)
}

fn validate_children(parent: &Rule) -> Result<()> {
    for child in &parent.rules {
        if child.has_blank_id() {
            return Err(EngineError::Validation(format!(
                "Child rule of '{}' has a blank id",
                parent.id
            )));
        }
        validate_children(child)?;
    }
    Ok(())
}

fn compile_error(rule_id: &str, stage: CompileStage, issues: Issues) -> EngineError {
    EngineError::Compile {
        rule_id: rule_id.to_string(),
        stage,
        message: issues.to_string(),
    }
}
