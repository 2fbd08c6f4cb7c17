//! Builtin functions
//!
//! Method calls arrive with their receiver as the first argument.

use crate::error::{Result, RuntimeError};
use chrono::DateTime;
use regex::Regex;
use ruletree_core::types::{parse_duration, parse_timestamp};
use ruletree_core::{MapKey, Value};

/// Call a builtin function
pub(crate) fn call_function(name: &str, args: Vec<Value>) -> Result<Value> {
    match (name, args.as_slice()) {
        ("size", [value]) => size(value),
        ("int", [value]) => to_int(value),
        ("double", [value]) => to_double(value),
        ("string", [Value::String(s)]) => Ok(Value::String(s.clone())),
        ("string", [value]) => Ok(Value::String(value.to_string())),
        ("duration", [value]) => to_duration(value),
        ("timestamp", [value]) => to_timestamp(value),
        ("has_key", [Value::Map(entries), key]) => {
            let key = MapKey::try_from(key.clone())?;
            Ok(Value::Bool(entries.contains_key(&key)))
        }
        ("contains", [Value::String(s), Value::String(t)]) => Ok(Value::Bool(s.contains(t.as_str()))),
        ("startsWith", [Value::String(s), Value::String(t)]) => {
            Ok(Value::Bool(s.starts_with(t.as_str())))
        }
        ("endsWith", [Value::String(s), Value::String(t)]) => Ok(Value::Bool(s.ends_with(t.as_str()))),
        ("matches", [Value::String(s), Value::String(pattern)]) => {
            let regex = Regex::new(pattern).map_err(|e| RuntimeError::InvalidRegex(e.to_string()))?;
            Ok(Value::Bool(regex.is_match(s)))
        }
        ("size" | "int" | "double" | "string" | "duration" | "timestamp" | "has_key"
        | "contains" | "startsWith" | "endsWith" | "matches", _) => {
            Err(RuntimeError::TypeError(format!(
                "No overload of {} for ({})",
                name,
                args.iter().map(Value::type_name).collect::<Vec<_>>().join(", ")
            )))
        }
        _ => Err(RuntimeError::UnknownFunction(name.to_string())),
    }
}

fn size(value: &Value) -> Result<Value> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => {
            return Err(RuntimeError::TypeError(format!(
                "size() is not defined for {}",
                other.type_name()
            )))
        }
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| RuntimeError::Overflow("size()".to_string()))
}

fn to_int(value: &Value) -> Result<Value> {
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) => {
            if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Ok(Value::Int(f.trunc() as i64))
            } else {
                Err(RuntimeError::Overflow(format!("int({})", f)))
            }
        }
        Value::String(s) => s.trim().parse().map(Value::Int).map_err(|_| {
            RuntimeError::TypeError(format!("Cannot convert '{}' to int", s))
        }),
        Value::Timestamp(t) => Ok(Value::Int(t.timestamp())),
        other => Err(RuntimeError::TypeError(format!(
            "Cannot convert {} to int",
            other.type_name()
        ))),
    }
}

fn to_double(value: &Value) -> Result<Value> {
    match value {
        Value::Int(_) | Value::Float(_) => value
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| RuntimeError::TypeError("not a number".to_string())),
        Value::String(s) => s.trim().parse().map(Value::Float).map_err(|_| {
            RuntimeError::TypeError(format!("Cannot convert '{}' to double", s))
        }),
        other => Err(RuntimeError::TypeError(format!(
            "Cannot convert {} to double",
            other.type_name()
        ))),
    }
}

fn to_duration(value: &Value) -> Result<Value> {
    match value {
        Value::Duration(_) | Value::Null => Ok(value.clone()),
        Value::String(s) => Ok(Value::Duration(parse_duration(s)?)),
        other => Err(RuntimeError::TypeError(format!(
            "Cannot convert {} to duration",
            other.type_name()
        ))),
    }
}

fn to_timestamp(value: &Value) -> Result<Value> {
    match value {
        Value::Timestamp(_) | Value::Null => Ok(value.clone()),
        Value::String(s) => Ok(Value::Timestamp(parse_timestamp(s)?)),
        Value::Int(secs) => DateTime::from_timestamp(*secs, 0)
            .map(Value::Timestamp)
            .ok_or_else(|| RuntimeError::Overflow(format!("timestamp({})", secs))),
        other => Err(RuntimeError::TypeError(format!(
            "Cannot convert {} to timestamp",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn call(name: &str, args: &[Value]) -> Result<Value> {
        call_function(name, args.to_vec())
    }

    #[test]
    fn test_size() {
        assert_eq!(call("size", &[Value::from("héllo")]).unwrap(), Value::Int(5));
        assert_eq!(
            call("size", &[Value::List(vec![Value::Null; 3])]).unwrap(),
            Value::Int(3)
        );
        assert!(call("size", &[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(call("int", &[Value::Float(2.9)]).unwrap(), Value::Int(2));
        assert_eq!(call("int", &[Value::from(" 42 ")]).unwrap(), Value::Int(42));
        assert_eq!(call("double", &[Value::Int(2)]).unwrap(), Value::Float(2.0));
        assert_eq!(call("string", &[Value::Int(7)]).unwrap(), Value::from("7"));
        assert!(matches!(
            call("int", &[Value::Float(f64::INFINITY)]),
            Err(RuntimeError::Overflow(_))
        ));
    }

    #[test]
    fn test_time_conversions() {
        assert_eq!(
            call("duration", &[Value::from("1h30m")]).unwrap(),
            Value::Duration(Duration::minutes(90))
        );
        let ts = call("timestamp", &[Value::from("2024-01-01T00:00:00Z")]).unwrap();
        assert_eq!(call("int", &[ts.clone()]).unwrap(), Value::Int(1_704_067_200));
        // already converted values pass through
        assert_eq!(call("timestamp", &[ts.clone()]).unwrap(), ts);
        assert!(matches!(
            call("duration", &[Value::from("soon")]),
            Err(RuntimeError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_string_methods() {
        let s = Value::from("hello world");
        assert_eq!(call("contains", &[s.clone(), Value::from("o w")]).unwrap(), Value::Bool(true));
        assert_eq!(call("startsWith", &[s.clone(), Value::from("he")]).unwrap(), Value::Bool(true));
        assert_eq!(call("endsWith", &[s.clone(), Value::from("he")]).unwrap(), Value::Bool(false));
        assert_eq!(call("matches", &[s.clone(), Value::from("^h.*d$")]).unwrap(), Value::Bool(true));
        assert!(matches!(
            call("matches", &[s, Value::from("(")]),
            Err(RuntimeError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_has_key_and_unknown() {
        let map = Value::map([("a", Value::Int(1))]);
        assert_eq!(call("has_key", &[map.clone(), Value::from("a")]).unwrap(), Value::Bool(true));
        assert_eq!(call("has_key", &[map, Value::from("b")]).unwrap(), Value::Bool(false));
        assert!(matches!(call("nope", &[]), Err(RuntimeError::UnknownFunction(_))));
        assert!(matches!(
            call("size", &[Value::Int(1), Value::Int(2)]),
            Err(RuntimeError::TypeError(_))
        ));
    }
}
