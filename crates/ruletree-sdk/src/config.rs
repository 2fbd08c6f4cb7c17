//! Configuration types for the rule engine

use crate::error::{EngineError, Result};
use ruletree_core::{EvalOptions, DEFAULT_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Engine configuration
///
/// Holds the base evaluation options every `evaluate` call starts from and
/// an optional per-call timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum tree depth evaluated
    pub max_depth: usize,

    /// Keep passing children in result trees
    pub return_pass: bool,

    /// Keep failing children in result trees
    pub return_fail: bool,

    pub stop_if_parent_negative: bool,

    pub stop_first_positive_child: bool,

    pub stop_first_negative_child: bool,

    /// Wall-clock limit for one `evaluate` call, in milliseconds
    pub evaluation_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let options = EvalOptions::default();
        Self {
            max_depth: DEFAULT_DEPTH,
            return_pass: options.return_pass,
            return_fail: options.return_fail,
            stop_if_parent_negative: options.stop_if_parent_negative,
            stop_first_positive_child: options.stop_first_positive_child,
            stop_first_negative_child: options.stop_first_negative_child,
            evaluation_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum evaluation depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the evaluation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.evaluation_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Options every evaluation starts from, without a deadline
    pub fn default_options(&self) -> EvalOptions {
        EvalOptions {
            max_depth: self.max_depth,
            return_pass: self.return_pass,
            return_fail: self.return_fail,
            stop_if_parent_negative: self.stop_if_parent_negative,
            stop_first_positive_child: self.stop_first_positive_child,
            stop_first_negative_child: self.stop_first_negative_child,
            deadline: None,
        }
    }

    /// Deadline for an evaluation starting now
    ///
    /// A timeout too large to represent means no deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.evaluation_timeout_ms
            .and_then(|ms| Instant::now().checked_add(Duration::from_millis(ms)))
    }

    /// Load configuration from `.env`, `config/ruletree.*` and `RULETREE_*`
    /// environment variables
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/ruletree").required(false))
            .add_source(config::Environment::with_prefix("RULETREE").try_parsing(true))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| EngineError::Config(format!("Failed to deserialize config: {}", e))),
            Err(e) => {
                tracing::info!("No engine configuration found ({}), using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit file (format from extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                EngineError::Config(format!("Failed to load {}: {}", path.display(), e))
            })
    }
}
