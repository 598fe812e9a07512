//! Coercion of raw form input into typed values

use serde_json::{Number, Value};
use std::str::FromStr;

/// Coercion errors carry the message shown next to the form field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("This field must be an integer")]
    NotInteger { raw: String },

    #[error("This field must be a number")]
    NotNumber { raw: String },
}

/// Type a raw string is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Int,
    Float,
    /// Best effort: bool/null literals, int, float, JSON, then the raw string.
    Auto,
    /// Left as the raw string.
    Str,
}

impl TargetType {
    /// Map a schema `type` name to a target. Unknown names keep the raw string.
    pub fn from_type_name(name: &str) -> Self {
        name.parse().unwrap_or(TargetType::Str)
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(TargetType::Int),
            "float" => Ok(TargetType::Float),
            "auto" => Ok(TargetType::Auto),
            "str" => Ok(TargetType::Str),
            other => Err(format!("unknown coercion type: {}", other)),
        }
    }
}

/// Parse a finite real number, ignoring surrounding whitespace.
///
/// Blank input is not a number; it never reads as 0.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Coerce `raw` into `target`.
///
/// With `raise_on_failure` unset a failed conversion returns the raw string
/// instead of an error. `Auto` never fails.
///
/// Empty or whitespace-only input fails `Int` and `Float`, and `Auto` keeps
/// it as the raw string rather than reading it as 0.
pub fn coerce(raw: &str, target: TargetType, raise_on_failure: bool) -> Result<Value, CoercionError> {
    let result = match target {
        TargetType::Int => coerce_int(raw),
        TargetType::Float => coerce_float(raw),
        TargetType::Auto => Ok(coerce_auto(raw)),
        TargetType::Str => Ok(Value::String(raw.to_string())),
    };

    match result {
        Err(_) if !raise_on_failure => Ok(Value::String(raw.to_string())),
        other => other,
    }
}

fn coerce_int(raw: &str) -> Result<Value, CoercionError> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(Value::from(i));
    }

    // Integral reals such as "1e3" or "5.0"
    match parse_number(trimmed) {
        Some(f) if f.fract() == 0.0 => {
            if f.abs() < i64::MAX as f64 {
                Ok(Value::from(f as i64))
            } else {
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| CoercionError::NotInteger {
                        raw: raw.to_string(),
                    })
            }
        }
        _ => Err(CoercionError::NotInteger {
            raw: raw.to_string(),
        }),
    }
}

fn coerce_float(raw: &str) -> Result<Value, CoercionError> {
    parse_number(raw)
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| CoercionError::NotNumber {
            raw: raw.to_string(),
        })
}

fn coerce_auto(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }

    coerce_int(raw)
        .or_else(|_| coerce_float(raw))
        .ok()
        .or_else(|| serde_json::from_str(raw).ok())
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
