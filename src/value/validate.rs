//! Field validators
//!
//! Validators run in order over a working copy of the value. `int` and
//! `float` replace the working copy with its numeric form, so later tags see
//! the number rather than the raw string. The first failure wins.

use serde_json::{Number, Value};

use super::coerce::parse_number;

const MSG_REQUIRED: &str = "This field is required";
const MSG_INT: &str = "This field must be an integer";
const MSG_FLOAT: &str = "This field must be a number";
const MSG_JSON: &str = "This field must be a valid JSON";
const MSG_TOML: &str = "This field must be a valid TOML";

/// A validator tag declared on a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Required,
    Int,
    Float,
    /// `json` and `dict`
    Json,
    Toml,
}

impl Validator {
    /// Parse a tag; unknown tags yield `None` and are skipped by [`validate`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "required" => Some(Validator::Required),
            "int" => Some(Validator::Int),
            "float" => Some(Validator::Float),
            "json" | "dict" => Some(Validator::Json),
            "toml" => Some(Validator::Toml),
            _ => None,
        }
    }

    /// Check the working value, possibly replacing it with its numeric form.
    fn check(self, working: &mut Option<Value>) -> Result<(), &'static str> {
        match self {
            Validator::Required => match working {
                None | Some(Value::Null) => Err(MSG_REQUIRED),
                Some(Value::String(s)) if s.is_empty() => Err(MSG_REQUIRED),
                Some(Value::Array(a)) if a.is_empty() => Err(MSG_REQUIRED),
                _ => Ok(()),
            },
            Validator::Int => {
                let n = as_number(working.as_ref())
                    .filter(|f| f.fract() == 0.0)
                    .ok_or(MSG_INT)?;
                *working = Some(integral_value(n));
                Ok(())
            }
            Validator::Float => {
                let n = as_number(working.as_ref())
                    .and_then(Number::from_f64)
                    .ok_or(MSG_FLOAT)?;
                *working = Some(Value::Number(n));
                Ok(())
            }
            Validator::Json => match working {
                None => Err(MSG_JSON),
                Some(Value::String(s)) => serde_json::from_str::<Value>(s)
                    .map(|_| ())
                    .map_err(|_| MSG_JSON),
                Some(_) => Ok(()),
            },
            Validator::Toml => match working {
                Some(Value::String(s)) => toml::from_str::<toml::Table>(s)
                    .map(|_| ())
                    .map_err(|_| MSG_TOML),
                _ => Err(MSG_TOML),
            },
        }
    }
}

fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::String(s) => parse_number(s),
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn integral_value(f: f64) -> Value {
    if f.abs() < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Validate `raw` against `tags` in order.
///
/// Returns the message of the first failing validator, or `None` when valid.
pub fn validate<S: AsRef<str>>(raw: Option<&Value>, tags: &[S]) -> Option<String> {
    let mut working = raw.cloned();
    tags.iter()
        .filter_map(|tag| Validator::from_tag(tag.as_ref()))
        .find_map(|v| v.check(&mut working).err())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(raw: Value, tags: &[&str]) -> Option<String> {
        validate(Some(&raw), tags)
    }

    #[test]
    fn test_required() {
        assert_eq!(validate(None, &["required"]).as_deref(), Some(MSG_REQUIRED));
        assert_eq!(check(json!(null), &["required"]).as_deref(), Some(MSG_REQUIRED));
        assert_eq!(check(json!(""), &["required"]).as_deref(), Some(MSG_REQUIRED));
        assert_eq!(check(json!([]), &["required"]).as_deref(), Some(MSG_REQUIRED));
        assert_eq!(check(json!("x"), &["required"]), None);
        assert_eq!(check(json!(0), &["required"]), None);
    }

    #[test]
    fn test_required_short_circuits() {
        // An empty string is not an integer either, but only "required" is reported.
        assert_eq!(check(json!(""), &["required", "int"]).as_deref(), Some(MSG_REQUIRED));
    }

    #[test]
    fn test_int_and_float() {
        assert_eq!(check(json!("12"), &["int"]), None);
        assert_eq!(check(json!("1.5"), &["int"]).as_deref(), Some(MSG_INT));
        assert_eq!(check(json!("abc"), &["int"]).as_deref(), Some(MSG_INT));
        assert_eq!(check(json!("1.5"), &["float"]), None);
        assert_eq!(check(json!("1e400"), &["float"]).as_deref(), Some(MSG_FLOAT));
        assert_eq!(check(json!("x"), &["float"]).as_deref(), Some(MSG_FLOAT));
        assert_eq!(check(json!(3), &["int", "float"]), None);
    }

    #[test]
    fn test_numeric_working_value_feeds_later_tags() {
        // After "int" the working value is the number 12, which is valid JSON
        // but no longer a TOML document string.
        assert_eq!(check(json!("12"), &["int", "json"]), None);
        assert_eq!(check(json!("12"), &["int", "toml"]).as_deref(), Some(MSG_TOML));
    }

    #[test]
    fn test_json_and_dict() {
        assert_eq!(check(json!(r#"{"a": 1}"#), &["json"]), None);
        assert_eq!(check(json!("[1, 2"), &["json"]).as_deref(), Some(MSG_JSON));
        assert_eq!(check(json!("{a: 1}"), &["dict"]).as_deref(), Some(MSG_JSON));
        assert_eq!(validate(None, &["json"]).as_deref(), Some(MSG_JSON));
    }

    #[test]
    fn test_toml() {
        assert_eq!(check(json!("a = 1\n[b]\nc = \"x\""), &["toml"]), None);
        assert_eq!(check(json!("a = "), &["toml"]).as_deref(), Some(MSG_TOML));
    }

    #[test]
    fn test_unknown_tags_ignored() {
        assert_eq!(check(json!("anything"), &["email", "list"]), None);
        assert_eq!(check(json!("x"), &["bogus", "int"]).as_deref(), Some(MSG_INT));
    }

    #[test]
    fn test_owned_tags() {
        let tags = vec!["required".to_string(), "float".to_string()];
        assert_eq!(validate(Some(&json!("2.5")), &tags), None);
    }
}
