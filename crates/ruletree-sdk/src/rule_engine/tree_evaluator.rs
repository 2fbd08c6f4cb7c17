//! Tree evaluator
//!
//! Walks one rule tree depth first. Options flow down as immutable values:
//! each node merges its own overrides onto the options it inherited and
//! hands the merged copy to its children.

use crate::backend::{DataMap, Program};
use crate::error::{EngineError, Result};
use ruletree_core::{EvalOptions, Rule, RuleResult, Value, SELF_KEY};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Evaluates rule trees against a program index
pub(crate) struct TreeEvaluator<'a, P> {
    programs: &'a HashMap<String, P>,
}

impl<'a, P: Program> TreeEvaluator<'a, P> {
    pub(crate) fn new(programs: &'a HashMap<String, P>) -> Self {
        Self { programs }
    }

    /// Evaluate `rule` at `depth` with the options inherited from its parent
    ///
    /// Children deeper than the inherited `max_depth` are left out of the
    /// result. `data` is shared by the whole walk; each node with a program
    /// sets or clears the `self` entry before running.
    pub(crate) fn evaluate(
        &self,
        data: &mut DataMap,
        rule: &Rule,
        depth: usize,
        inherited: &EvalOptions,
    ) -> Result<RuleResult> {
        if inherited.deadline_exceeded() {
            return Err(EngineError::Evaluation {
                rule_id: rule.id.clone(),
                message: "deadline exceeded".to_string(),
            });
        }

        let mut result = RuleResult::new(rule.id.clone(), depth);
        result.action = rule.action.clone();
        result.meta = rule.meta.clone();

        let options = inherited.apply(&rule.opts);

        match self.programs.get(&rule.id) {
            Some(program) => {
                match &rule.self_value {
                    Some(value) => {
                        data.insert(SELF_KEY.to_string(), value.clone());
                    }
                    None => {
                        data.remove(SELF_KEY);
                    }
                }

                let (value, cost) = program.eval(data).map_err(|e| EngineError::Evaluation {
                    rule_id: rule.id.clone(),
                    message: e.to_string(),
                })?;
                result.pass = value == Value::Bool(true);
                result.value = value;
                trace!(rule_id = %rule.id, depth, cost, pass = result.pass, "rule evaluated");
            }
            None => {
                // grouping node
                result.pass = true;
                result.value = Value::Bool(true);
            }
        }

        if options.stop_if_parent_negative && !result.pass {
            debug!(rule_id = %rule.id, "parent negative, skipping children");
            return Ok(result);
        }

        let child_depth = depth + 1;
        if child_depth > options.max_depth {
            if !rule.rules.is_empty() {
                debug!(rule_id = %rule.id, max_depth = options.max_depth, "children beyond max depth");
            }
            return Ok(result);
        }

        for child in &rule.rules {
            let child_result = self.evaluate(data, child, child_depth, &options)?;
            let pass = child_result.pass;

            if options.admits(pass) {
                result.results.insert(child.id.clone(), child_result);
            }

            if pass && options.stop_first_positive_child {
                debug!(rule_id = %rule.id, child = %child.id, "stopping at first positive child");
                break;
            }
            if !pass && options.stop_first_negative_child {
                debug!(rule_id = %rule.id, child = %child.id, "stopping at first negative child");
                break;
            }
        }

        Ok(result)
    }
}
