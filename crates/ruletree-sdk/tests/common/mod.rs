//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use ruletree_compiler::Declarations;
use ruletree_sdk::backend::{NativeEnvironment, NativeProgram};
use ruletree_sdk::{
    BackendError, DataMap, Engine, Environment, EvalCost, ExpressionEvaluator, Issues,
    NativeEvaluator, Program, Schema, Type, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared view of what a [`CountingEvaluator`] did
#[derive(Clone, Default)]
pub struct Counters {
    environments: Arc<AtomicUsize>,
    compiles: Arc<AtomicUsize>,
    evals: Arc<AtomicUsize>,
    evaluated: Arc<Mutex<Vec<String>>>,
}

impl Counters {
    /// Environments created
    pub fn environments(&self) -> usize {
        self.environments.load(Ordering::SeqCst)
    }

    /// Programs generated
    pub fn compiles(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    /// Program runs
    pub fn evals(&self) -> usize {
        self.evals.load(Ordering::SeqCst)
    }

    /// Sources of the programs run, in order
    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn was_evaluated(&self, source: &str) -> bool {
        self.evaluated().iter().any(|s| s == source)
    }
}

/// Native evaluator that counts compilations and runs
#[derive(Clone, Default)]
pub struct CountingEvaluator {
    inner: NativeEvaluator,
    counters: Counters,
}

impl CountingEvaluator {
    pub fn new() -> (Self, Counters) {
        let evaluator = Self::default();
        let counters = evaluator.counters.clone();
        (evaluator, counters)
    }
}

impl ExpressionEvaluator for CountingEvaluator {
    type Environment = CountingEnvironment;

    fn new_environment(
        &self,
        declarations: &Declarations,
    ) -> Result<CountingEnvironment, BackendError> {
        self.counters.environments.fetch_add(1, Ordering::SeqCst);
        Ok(CountingEnvironment {
            inner: self.inner.new_environment(declarations)?,
            counters: self.counters.clone(),
        })
    }
}

pub struct CountingEnvironment {
    inner: NativeEnvironment,
    counters: Counters,
}

impl Environment for CountingEnvironment {
    type Ast = <NativeEnvironment as Environment>::Ast;
    type CheckedAst = <NativeEnvironment as Environment>::CheckedAst;
    type Program = CountingProgram;

    fn parse(&self, expr: &str) -> Result<Self::Ast, Issues> {
        self.inner.parse(expr)
    }

    fn check(&self, ast: Self::Ast) -> Result<Self::CheckedAst, Issues> {
        self.inner.check(ast)
    }

    fn program(&self, checked: Self::CheckedAst) -> Result<CountingProgram, BackendError> {
        self.counters.compiles.fetch_add(1, Ordering::SeqCst);
        Ok(CountingProgram {
            inner: self.inner.program(checked)?,
            counters: self.counters.clone(),
        })
    }
}

pub struct CountingProgram {
    inner: NativeProgram,
    counters: Counters,
}

impl Program for CountingProgram {
    fn eval(&self, data: &DataMap) -> Result<(Value, EvalCost), BackendError> {
        self.counters.evals.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut evaluated) = self.counters.evaluated.lock() {
            evaluated.push(self.inner.source().to_string());
        }
        self.inner.eval(data)
    }
}

/// Engine wired to a fresh counting evaluator
pub fn counting_engine() -> (Engine<CountingEvaluator>, Counters) {
    let (evaluator, counters) = CountingEvaluator::new();
    (Engine::with_evaluator(evaluator), counters)
}

/// Schema from `(name, type)` pairs
pub fn schema(elements: &[(&str, Type)]) -> Schema {
    elements
        .iter()
        .fold(Schema::new("test"), |schema, (name, data_type)| {
            schema.with_element(*name, data_type.clone())
        })
}

/// Data map from `(name, value)` pairs
pub fn data(entries: &[(&str, Value)]) -> DataMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
