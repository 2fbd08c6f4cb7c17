//! Rule store
//!
//! Registered root rules and the compiled programs of every node, both keyed
//! by rule id. The two maps are independent: programs of child nodes are
//! stored under the child's id, while only roots enter the rule index.

use ruletree_core::Rule;
use std::collections::HashMap;

/// Rules and compiled programs owned by one engine
#[derive(Debug)]
pub struct RuleStore<P> {
    rules: HashMap<String, Rule>,
    programs: HashMap<String, P>,
}

impl<P> Default for RuleStore<P> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            programs: HashMap::new(),
        }
    }
}

impl<P> RuleStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a root rule, replacing any rule with the same id
    pub fn insert_rule(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.id.clone(), rule)
    }

    pub fn insert_program(&mut self, id: impl Into<String>, program: P) {
        self.programs.insert(id.into(), program);
    }

    pub fn remove_program(&mut self, id: &str) -> Option<P> {
        self.programs.remove(id)
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn program(&self, id: &str) -> Option<&P> {
        self.programs.get(id)
    }

    pub fn has_program(&self, id: &str) -> bool {
        self.programs.contains_key(id)
    }

    pub(crate) fn programs(&self) -> &HashMap<String, P> {
        &self.programs
    }

    /// Remove a rule and its program
    ///
    /// Programs of the rule's children stay in the store.
    pub fn remove(&mut self, id: &str) -> Option<Rule> {
        self.programs.remove(id);
        self.rules.remove(id)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Registered root ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered root rules
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }
}
