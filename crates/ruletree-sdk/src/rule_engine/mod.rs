//! Engine - registering and evaluating rule trees
//!
//! # Architecture
//!
//! The module is organized into:
//! - `store`: flat rule index and compiled programs, keyed by rule id
//! - `tree_evaluator`: recursive evaluation of one rule tree
//! - `engine`: the public `Engine` facade
//! - `tests`: unit tests (test-only)

mod engine;
mod store;
mod tree_evaluator;

pub use engine::Engine;
pub use store::RuleStore;

#[cfg(test)]
mod tests;
