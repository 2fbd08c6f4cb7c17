//! Schema definitions
//!
//! A schema names the variables an expression may reference and gives each of
//! them a declared type. Types are a closed set of variants and may nest
//! (a list of maps of string to int, a message with list fields, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a data element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    String,
    Int,
    Float,
    Bool,
    Duration,
    Timestamp,

    /// Homogeneous list
    List {
        /// Type of the list elements
        value_type: Box<Type>,
    },

    /// Map of keys to values; maps can be nested
    Map {
        key_type: Box<Type>,
        value_type: Box<Type>,
    },

    /// Structured message described by an external descriptor
    Message {
        /// Fully qualified message name
        name: String,
        /// Field layout of the message, if one could be provided
        #[serde(default)]
        descriptor: Option<MessageDescriptor>,
    },

    /// No static type information; also the fallback for unknown type tags
    #[default]
    #[serde(other)]
    Any,
}

/// Field layout of a message type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    /// Fully qualified message name
    pub full_name: String,

    /// Fields of the message
    #[serde(default)]
    pub fields: Vec<DataElement>,
}

/// A named, typed variable in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElement {
    /// Key used both in the data map and in expressions
    pub name: String,

    /// Declared type
    #[serde(rename = "type", default)]
    pub data_type: Type,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered set of data elements
///
/// A schema with no elements is "empty" and tells the compiler to inherit
/// the schema of the nearest ancestor rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Schema identifier
    #[serde(default)]
    pub id: String,

    /// Elements in declaration order
    #[serde(default)]
    pub elements: Vec<DataElement>,
}

impl Type {
    /// Create a list type
    pub fn list(value_type: Type) -> Self {
        Type::List {
            value_type: Box::new(value_type),
        }
    }

    /// Create a map type
    pub fn map(key_type: Type, value_type: Type) -> Self {
        Type::Map {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
        }
    }

    /// Create a message type with its descriptor
    pub fn message(descriptor: MessageDescriptor) -> Self {
        Type::Message {
            name: descriptor.full_name.clone(),
            descriptor: Some(descriptor),
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &str {
        match self {
            Type::String => "string",
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::Duration => "duration",
            Type::Timestamp => "timestamp",
            Type::Any => "any",
            Type::List { .. } => "list",
            Type::Map { .. } => "map",
            Type::Message { .. } => "message",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::List { value_type } => write!(f, "list<{}>", value_type),
            Type::Map {
                key_type,
                value_type,
            } => write!(f, "map<{}, {}>", key_type, value_type),
            Type::Message { name, .. } => write!(f, "message<{}>", name),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

impl MessageDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn with_field(mut self, name: impl Into<String>, data_type: Type) -> Self {
        self.fields.push(DataElement::new(name, data_type));
        self
    }
}

impl DataElement {
    pub fn new(name: impl Into<String>, data_type: Type) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: None,
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Schema {
    /// Create a new, empty schema
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
        }
    }

    /// Add an element
    pub fn with_element(mut self, name: impl Into<String>, data_type: Type) -> Self {
        self.elements.push(DataElement::new(name, data_type));
        self
    }

    /// Add a prepared element
    pub fn add_element(mut self, element: DataElement) -> Self {
        self.elements.push(element);
        self
    }

    /// True when the schema declares nothing and must be inherited
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element by name
    pub fn get_element(&self, name: &str) -> Option<&DataElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let schema = Schema::new("person")
            .with_element("name", Type::String)
            .with_element("age", Type::Int)
            .add_element(DataElement::new("active", Type::Bool).with_description("is active"));

        assert_eq!(schema.id, "person");
        assert_eq!(schema.elements.len(), 3);
        assert!(!schema.is_empty());
        assert_eq!(schema.elements[0].name, "name");
        assert_eq!(schema.get_element("age").unwrap().data_type, Type::Int);
        assert!(schema.get_element("nonexistent").is_none());
    }

    #[test]
    fn test_default_schema_is_empty() {
        assert!(Schema::default().is_empty());
        assert_eq!(Type::default(), Type::Any);
    }

    #[test]
    fn test_nested_type_display() {
        let t = Type::list(Type::map(Type::String, Type::Int));
        assert_eq!(t.to_string(), "list<map<string, int>>");
        assert_eq!(t.type_name(), "list");

        let msg = Type::message(MessageDescriptor::new("shop.Order").with_field("total", Type::Float));
        assert_eq!(msg.to_string(), "message<shop.Order>");
    }

    #[test]
    fn test_type_serde() {
        let t = Type::map(Type::String, Type::list(Type::Float));
        let json = serde_json::to_string(&t).unwrap();
        let back: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_unknown_type_tag_is_any() {
        let t: Type = serde_json::from_str(r#"{"kind": "decimal"}"#).unwrap();
        assert_eq!(t, Type::Any);
    }

    #[test]
    fn test_nested_unknown_tag_and_any_roundtrip() {
        let t: Type =
            serde_json::from_str(r#"{"kind": "list", "value_type": {"kind": "bogus"}}"#).unwrap();
        assert_eq!(t, Type::list(Type::Any));

        let json = serde_json::to_value(Type::Any).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "any"}));
        assert_eq!(serde_json::from_value::<Type>(json).unwrap(), Type::Any);
    }

    #[test]
    fn test_element_defaults_to_any() {
        let e: DataElement = serde_json::from_str(r#"{"name": "blob"}"#).unwrap();
        assert_eq!(e.data_type, Type::Any);
    }
}
