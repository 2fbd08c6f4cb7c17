//! Rule document parser
//!
//! Loads rule trees and evaluation data from YAML or JSON documents.
//!
//! A rule document holds either a list of root rules or a single one:
//!
//! ```yaml
//! version: "0.1"
//! rules:
//!   - id: adults
//!     schema:
//!       id: person
//!       elements:
//!         - name: age
//!           type: { kind: int }
//!     rules:
//!       - id: senior
//!         expr: "age >= 65"
//! ```
//!
//! Several documents may be concatenated with `---` separators.

use crate::error::{ParseError, Result};
use ruletree_core::{Rule, Schema, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Input data for one evaluation, keyed by declared name
pub type DataDocument = HashMap<String, Value>;

#[derive(Debug, Deserialize)]
struct RuleDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    rule: Option<Rule>,
}

impl RuleDocument {
    fn into_rules(self) -> Result<Vec<Rule>> {
        if let Some(version) = &self.version {
            log::trace!("rule document version {}", version);
        }
        let mut rules = self.rules;
        if let Some(rule) = self.rule {
            rules.push(rule);
        }
        if rules.is_empty() {
            return Err(ParseError::MissingField {
                field: "rules".to_string(),
            });
        }
        Ok(rules)
    }
}

/// Document format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Rule document parser
pub struct RuleParser;

impl RuleParser {
    /// Parse root rules from a YAML string (one or more `---` separated documents)
    pub fn parse(yaml_str: &str) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();
        for document in serde_yaml::Deserializer::from_str(yaml_str) {
            // options are written as `- return_fail: false`, not YAML tags
            let document: RuleDocument =
                serde_yaml::with::singleton_map_recursive::deserialize(document)?;
            rules.extend(document.into_rules()?);
        }
        if rules.is_empty() {
            return Err(ParseError::MissingField {
                field: "rules".to_string(),
            });
        }
        log::debug!("parsed {} root rule(s) from YAML", rules.len());
        Ok(rules)
    }

    /// Parse root rules from a JSON string
    pub fn parse_json(json_str: &str) -> Result<Vec<Rule>> {
        let document: RuleDocument = serde_json::from_str(json_str)?;
        let rules = document.into_rules()?;
        log::debug!("parsed {} root rule(s) from JSON", rules.len());
        Ok(rules)
    }

    /// Parse root rules from a file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
        let path = path.as_ref();
        log::debug!("loading rules from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        match DocumentFormat::from_path(path) {
            DocumentFormat::Json => Self::parse_json(&content),
            DocumentFormat::Yaml => Self::parse(&content),
        }
    }

    /// Parse an evaluation data document (a mapping of names to values)
    pub fn parse_data(content: &str, format: DocumentFormat) -> Result<DataDocument> {
        let data: DataDocument = match format {
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        };
        log::debug!("parsed data document with {} key(s)", data.len());
        Ok(data)
    }

    /// Parse an evaluation data document from a file
    pub fn parse_data_file(path: impl AsRef<Path>) -> Result<DataDocument> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse_data(&content, DocumentFormat::from_path(path))
    }

    /// Parse a standalone schema document
    pub fn parse_schema(content: &str, format: DocumentFormat) -> Result<Schema> {
        let schema: Schema = match format {
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        };
        log::debug!(
            "parsed schema '{}' with {} element(s)",
            schema.id,
            schema.elements.len()
        );
        Ok(schema)
    }

    pub fn parse_schema_file(path: impl AsRef<Path>) -> Result<Schema> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse_schema(&content, DocumentFormat::from_path(path))
    }
}
