//! Schema compiler
//!
//! Converts a [`Schema`] into [`Declarations`]. Every schema [`Type`] maps to
//! exactly one [`DeclType`]; message types are registered in the declaration
//! set's [`TypeRegistry`](crate::declarations::TypeRegistry) and referenced by
//! name.

use crate::declarations::{Decl, DeclType, Declarations};
use crate::error::{CompileError, Result};
use ruletree_core::{Schema, Type};
use std::collections::BTreeMap;

/// Schema compiler
pub struct SchemaCompiler;

impl SchemaCompiler {
    /// Compile a schema into a fresh declaration set
    pub fn compile(schema: &Schema) -> Result<Declarations> {
        let mut declarations = Declarations::new();
        Self::compile_into(schema, &mut declarations)?;
        Ok(declarations)
    }

    /// Add a schema's elements to an existing declaration set
    pub fn compile_into(schema: &Schema, declarations: &mut Declarations) -> Result<()> {
        for element in &schema.elements {
            let decl_type = Self::convert(
                &element.name,
                &element.name,
                &element.data_type,
                declarations,
            )?;
            declarations.declare(Decl::new(element.name.clone(), decl_type));
        }
        Ok(())
    }

    /// Pick the schema a rule compiles against
    ///
    /// A non-empty own schema wins; otherwise the ambient (inherited) schema
    /// is used. `None` when both are empty.
    pub fn resolve<'a>(own: &'a Schema, ambient: Option<&'a Schema>) -> Option<&'a Schema> {
        if !own.is_empty() {
            return Some(own);
        }
        ambient.filter(|schema| !schema.is_empty())
    }

    fn convert(
        element: &str,
        path: &str,
        data_type: &Type,
        declarations: &mut Declarations,
    ) -> Result<DeclType> {
        let decl_type = match data_type {
            Type::String => DeclType::String,
            Type::Int => DeclType::Int,
            Type::Float => DeclType::Double,
            Type::Bool => DeclType::Bool,
            Type::Duration => DeclType::Duration,
            Type::Timestamp => DeclType::Timestamp,
            Type::Any => DeclType::Dyn,

            Type::List { value_type } => DeclType::list(Self::convert(
                element,
                &format!("{}.value", path),
                value_type,
                declarations,
            )?),

            Type::Map {
                key_type,
                value_type,
            } => {
                let key_path = format!("{}.key", path);
                let key = Self::convert(element, &key_path, key_type, declarations)?;
                if !key.is_valid_map_key() {
                    return Err(invalid(
                        element,
                        &key_path,
                        format!("{} is not a valid map key type", key_type),
                    ));
                }
                let value = Self::convert(
                    element,
                    &format!("{}.value", path),
                    value_type,
                    declarations,
                )?;
                DeclType::map(key, value)
            }

            Type::Message { name, descriptor } => {
                let descriptor = descriptor.as_ref().ok_or_else(|| {
                    invalid(
                        element,
                        path,
                        format!("no descriptor provided for message type '{}'", name),
                    )
                })?;
                if descriptor.full_name != *name {
                    return Err(invalid(
                        element,
                        path,
                        format!(
                            "descriptor '{}' does not describe message type '{}'",
                            descriptor.full_name, name
                        ),
                    ));
                }

                let mut fields = BTreeMap::new();
                for field in &descriptor.fields {
                    let field_path = format!("{}.{}", path, field.name);
                    let field_type =
                        Self::convert(element, &field_path, &field.data_type, declarations)?;
                    fields.insert(field.name.clone(), field_type);
                }
                declarations
                    .messages_mut()
                    .register(name, fields)
                    .map_err(|e| invalid(element, path, e.to_string()))?;
                DeclType::Object(name.clone())
            }
        };
        Ok(decl_type)
    }
}

fn invalid(element: &str, path: &str, message: String) -> CompileError {
    CompileError::InvalidSchema {
        element: element.to_string(),
        path: path.to_string(),
        message,
    }
}
