//! Builtin function signatures
//!
//! The runtime implements these functions; the type checker uses the
//! signatures to validate calls before code generation.

use crate::declarations::DeclType;
use crate::error::{CompileError, Result};

/// How a builtin may be invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `f(x, ...)`
    Global,
    /// `x.f(...)`
    Method,
}

/// Resolve the result type of a builtin call
///
/// For method calls `args[0]` is the receiver.
pub fn resolve(name: &str, style: CallStyle, args: &[DeclType]) -> Result<DeclType> {
    match (style, name) {
        (_, "size") => {
            expect_arity(name, args, 1)?;
            expect_one_of(name, &args[0], |t| {
                matches!(
                    t,
                    DeclType::String | DeclType::List(_) | DeclType::Map(_, _) | DeclType::Dyn
                )
            })?;
            Ok(DeclType::Int)
        }

        (CallStyle::Global, "int") => {
            expect_arity(name, args, 1)?;
            expect_one_of(name, &args[0], |t| {
                matches!(
                    t,
                    DeclType::Int
                        | DeclType::Double
                        | DeclType::String
                        | DeclType::Timestamp
                        | DeclType::Dyn
                )
            })?;
            Ok(DeclType::Int)
        }

        (CallStyle::Global, "double") => {
            expect_arity(name, args, 1)?;
            expect_one_of(name, &args[0], |t| {
                matches!(
                    t,
                    DeclType::Int | DeclType::Double | DeclType::String | DeclType::Dyn
                )
            })?;
            Ok(DeclType::Double)
        }

        (CallStyle::Global, "string") => {
            expect_arity(name, args, 1)?;
            Ok(DeclType::String)
        }

        (CallStyle::Global, "duration") => {
            expect_arity(name, args, 1)?;
            expect_one_of(name, &args[0], |t| {
                matches!(t, DeclType::String | DeclType::Duration | DeclType::Dyn)
            })?;
            Ok(DeclType::Duration)
        }

        (CallStyle::Global, "timestamp") => {
            expect_arity(name, args, 1)?;
            expect_one_of(name, &args[0], |t| {
                matches!(
                    t,
                    DeclType::String | DeclType::Int | DeclType::Timestamp | DeclType::Dyn
                )
            })?;
            Ok(DeclType::Timestamp)
        }

        (CallStyle::Global, "has_key") => {
            expect_arity(name, args, 2)?;
            match &args[0] {
                DeclType::Map(key, _) if !args[1].is_compatible_with(key) => {
                    Err(CompileError::TypeError(format!(
                        "has_key: key of type {} does not match map key type {}",
                        args[1], key
                    )))
                }
                DeclType::Map(_, _) | DeclType::Dyn => Ok(DeclType::Bool),
                other => Err(CompileError::TypeError(format!(
                    "has_key expects a map, found {}",
                    other
                ))),
            }
        }

        (CallStyle::Method, "contains" | "startsWith" | "endsWith" | "matches") => {
            expect_arity(name, args, 2)?;
            for arg in args {
                expect_one_of(name, arg, |t| matches!(t, DeclType::String | DeclType::Dyn))?;
            }
            Ok(DeclType::Bool)
        }

        _ => Err(CompileError::UnknownFunction(match style {
            CallStyle::Global => format!("{}()", name),
            CallStyle::Method => format!(".{}()", name),
        })),
    }
}

fn expect_arity(name: &str, args: &[DeclType], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(CompileError::ArityMismatch {
            function: name.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn expect_one_of(name: &str, arg: &DeclType, accepts: impl Fn(&DeclType) -> bool) -> Result<()> {
    if accepts(arg) {
        Ok(())
    } else {
        Err(CompileError::TypeError(format!(
            "{} does not accept an argument of type {}",
            name, arg
        )))
    }
}
