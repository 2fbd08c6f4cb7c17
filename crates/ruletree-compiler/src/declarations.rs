//! Variable declarations
//!
//! Declarations are what the type checker sees of a schema: a list of typed
//! identifiers plus a registry of message types that identifiers (or their
//! nested fields) may refer to.

use crate::error::{CompileError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclType {
    Int,
    Double,
    String,
    Bool,
    Duration,
    Timestamp,
    Null,
    /// Dynamically typed; checked at runtime only
    Dyn,
    List(Box<DeclType>),
    Map(Box<DeclType>, Box<DeclType>),
    /// Message type, resolved through the [`TypeRegistry`]
    Object(String),
}

impl DeclType {
    /// Create a list type
    pub fn list(element: DeclType) -> Self {
        DeclType::List(Box::new(element))
    }

    /// Create a map type
    pub fn map(key: DeclType, value: DeclType) -> Self {
        DeclType::Map(Box::new(key), Box::new(value))
    }

    pub fn is_dyn(&self) -> bool {
        matches!(self, DeclType::Dyn)
    }

    /// Int, Double or Dyn
    pub fn is_numeric(&self) -> bool {
        matches!(self, DeclType::Int | DeclType::Double | DeclType::Dyn)
    }

    /// Bool or Dyn
    pub fn is_boolean(&self) -> bool {
        matches!(self, DeclType::Bool | DeclType::Dyn)
    }

    /// Whether values of this type have a total order
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            DeclType::Int
                | DeclType::Double
                | DeclType::String
                | DeclType::Bool
                | DeclType::Duration
                | DeclType::Timestamp
                | DeclType::Dyn
        )
    }

    /// Whether the type is allowed as a map key
    pub fn is_valid_map_key(&self) -> bool {
        matches!(
            self,
            DeclType::String | DeclType::Int | DeclType::Bool | DeclType::Dyn
        )
    }

    /// Whether values of the two types may be compared with each other
    pub fn is_compatible_with(&self, other: &DeclType) -> bool {
        match (self, other) {
            (DeclType::Dyn, _) | (_, DeclType::Dyn) => true,
            (DeclType::Null, _) | (_, DeclType::Null) => true,
            (DeclType::Int | DeclType::Double, DeclType::Int | DeclType::Double) => true,
            (DeclType::List(a), DeclType::List(b)) => a.is_compatible_with(b),
            (DeclType::Map(ka, va), DeclType::Map(kb, vb)) => {
                ka.is_compatible_with(kb) && va.is_compatible_with(vb)
            }
            (a, b) => a == b,
        }
    }

    /// Common type of two branches or collection elements
    pub fn unify(&self, other: &DeclType) -> DeclType {
        match (self, other) {
            (a, b) if a == b => a.clone(),
            (DeclType::Null, t) | (t, DeclType::Null) => t.clone(),
            (DeclType::Int | DeclType::Double, DeclType::Int | DeclType::Double) => {
                DeclType::Double
            }
            _ => DeclType::Dyn,
        }
    }
}

impl fmt::Display for DeclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclType::Int => write!(f, "int"),
            DeclType::Double => write!(f, "double"),
            DeclType::String => write!(f, "string"),
            DeclType::Bool => write!(f, "bool"),
            DeclType::Duration => write!(f, "duration"),
            DeclType::Timestamp => write!(f, "timestamp"),
            DeclType::Null => write!(f, "null"),
            DeclType::Dyn => write!(f, "dyn"),
            DeclType::List(t) => write!(f, "list({})", t),
            DeclType::Map(k, v) => write!(f, "map({}, {})", k, v),
            DeclType::Object(name) => write!(f, "{}", name),
        }
    }
}

/// A typed identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decl {
    pub name: String,
    pub decl_type: DeclType,
}

impl Decl {
    pub fn new(name: impl Into<String>, decl_type: DeclType) -> Self {
        Self {
            name: name.into(),
            decl_type,
        }
    }
}

/// Registry of message types by fully qualified name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    messages: BTreeMap<String, BTreeMap<String, DeclType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message layout
    ///
    /// Registering the same layout twice is a no-op; a different layout under
    /// an existing name is a conflict.
    pub fn register(&mut self, name: &str, fields: BTreeMap<String, DeclType>) -> Result<()> {
        match self.messages.get(name) {
            Some(existing) if *existing == fields => Ok(()),
            Some(_) => Err(CompileError::DeclarationConflict(format!(
                "message type '{}' is already registered with a different layout",
                name
            ))),
            None => {
                self.messages.insert(name.to_string(), fields);
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.messages.contains_key(name)
    }

    /// Declared type of a message field
    pub fn field_type(&self, message: &str, field: &str) -> Option<&DeclType> {
        self.messages.get(message).and_then(|fields| fields.get(field))
    }

    /// Field names of a message, sorted
    pub fn fields(&self, message: &str) -> Option<impl Iterator<Item = &str>> {
        self.messages
            .get(message)
            .map(|fields| fields.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Declaration set used to build an evaluation environment
///
/// Identifiers are kept in declaration order. Duplicate names are not
/// rejected here; environments decide how to treat them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    idents: Vec<Decl>,
    messages: TypeRegistry,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier declaration
    pub fn declare(&mut self, decl: Decl) {
        self.idents.push(decl);
    }

    /// Builder-style [`declare`](Self::declare)
    pub fn with_ident(mut self, name: impl Into<String>, decl_type: DeclType) -> Self {
        self.declare(Decl::new(name, decl_type));
        self
    }

    /// Type of the first identifier with the given name
    pub fn lookup(&self, name: &str) -> Option<&DeclType> {
        self.idents
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.decl_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn idents(&self) -> &[Decl] {
        &self.idents
    }

    pub fn messages(&self) -> &TypeRegistry {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut TypeRegistry {
        &mut self.messages
    }

    pub fn len(&self) -> usize {
        self.idents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idents.is_empty()
    }
}
