//! Type system for ruletree
//!
//! This module contains:
//! - Runtime value types
//! - Schema definitions (declared variable types)

pub mod schema;
pub mod value;

pub use schema::{DataElement, MessageDescriptor, Schema, Type};
pub use value::{format_duration, parse_duration, parse_timestamp, MapKey, Value};
