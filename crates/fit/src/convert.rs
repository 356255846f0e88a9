use crate::error::FixtureError;
use std::fmt;

/// Target type of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Text => "text",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => f.write_str("null"),
            TypedValue::Text(s) => f.write_str(s),
            TypedValue::Integer(v) => write!(f, "{v}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Boolean(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Text(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::Text(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Integer(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

/// Turns cell text into a typed value. `parameter` is the `[...]` part of the column
/// header, if any.
pub trait ValueConverter {
    fn convert(
        &self,
        raw: &str,
        target: ValueType,
        parameter: Option<&str>,
    ) -> Result<TypedValue, FixtureError>;
}

/// Plain conversions. `null` converts to `TypedValue::Null` for every target, `blank` to
/// the empty text.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardConverter;

impl ValueConverter for StandardConverter {
    fn convert(
        &self,
        raw: &str,
        target: ValueType,
        _parameter: Option<&str>,
    ) -> Result<TypedValue, FixtureError> {
        let raw = raw.trim();
        if raw == "null" {
            return Ok(TypedValue::Null);
        }
        let failed = |reason: String| FixtureError::Conversion {
            value: raw.to_string(),
            target: target.to_string(),
            reason,
        };
        match target {
            ValueType::Text if raw == "blank" => Ok(TypedValue::Text(String::new())),
            ValueType::Text => Ok(TypedValue::Text(raw.to_string())),
            ValueType::Integer => raw
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|e| failed(e.to_string())),
            ValueType::Float => raw
                .parse::<f64>()
                .map(TypedValue::Float)
                .map_err(|e| failed(e.to_string())),
            ValueType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" => Ok(TypedValue::Boolean(true)),
                "false" | "no" => Ok(TypedValue::Boolean(false)),
                _ => Err(failed("expected true/false or yes/no".to_string())),
            },
        }
    }
}
