//! Evaluation options
//!
//! Options flow top-down through a rule tree. Each rule may carry overrides
//! that apply to its own evaluation and to its descendants; siblings never
//! see each other's overrides because every level works on its own copy.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default maximum depth of a rule tree evaluation
pub const DEFAULT_DEPTH: usize = 100;

/// Traversal and filtering policy for a tree evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Rules deeper than this are silently skipped
    pub max_depth: usize,

    /// Keep passing children in the result tree
    pub return_pass: bool,

    /// Keep failing children in the result tree
    pub return_fail: bool,

    /// Do not evaluate the children of a failing rule
    pub stop_if_parent_negative: bool,

    /// Stop evaluating siblings after the first passing child
    pub stop_first_positive_child: bool,

    /// Stop evaluating siblings after the first failing child
    pub stop_first_negative_child: bool,

    /// Abort the evaluation once this instant has passed
    #[serde(skip)]
    pub deadline: Option<Instant>,
}

/// A single option override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalOption {
    MaxDepth(usize),
    ReturnPass(bool),
    ReturnFail(bool),
    StopIfParentNegative(bool),
    StopFirstPositiveChild(bool),
    StopFirstNegativeChild(bool),
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            return_pass: true,
            return_fail: true,
            stop_if_parent_negative: false,
            stop_first_positive_child: false,
            stop_first_negative_child: false,
            deadline: None,
        }
    }
}

impl EvalOptions {
    /// Return a copy with the overrides applied in order
    #[must_use]
    pub fn apply(&self, overrides: &[EvalOption]) -> Self {
        let mut merged = *self;
        for option in overrides {
            match *option {
                EvalOption::MaxDepth(depth) => merged.max_depth = depth,
                EvalOption::ReturnPass(v) => merged.return_pass = v,
                EvalOption::ReturnFail(v) => merged.return_fail = v,
                EvalOption::StopIfParentNegative(v) => merged.stop_if_parent_negative = v,
                EvalOption::StopFirstPositiveChild(v) => merged.stop_first_positive_child = v,
                EvalOption::StopFirstNegativeChild(v) => merged.stop_first_negative_child = v,
            }
        }
        merged
    }

    /// Set the deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether a child with the given outcome belongs in its parent's results
    pub fn admits(&self, pass: bool) -> bool {
        (pass && self.return_pass) || (!pass && self.return_fail)
    }

    /// True once the deadline, if any, has passed
    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
