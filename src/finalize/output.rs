//! Final configuration document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::error::FinalizeError;

/// The finalized configuration, ready to be written as JSON or TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalConfig {
    pub config: Map<String, Value>,
}

impl FinalConfig {
    pub fn new(config: Map<String, Value>) -> Self {
        Self { config }
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }

    /// The document as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.config.clone())
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.config
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.config.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, FinalizeError> {
        serde_json::to_string_pretty(&self.config).map_err(|e| FinalizeError::Serialize {
            format: "JSON",
            reason: e.to_string(),
        })
    }

    /// Serialize to TOML. Fails when the tree holds values TOML cannot
    /// represent, such as `null`.
    pub fn to_toml(&self) -> Result<String, FinalizeError> {
        if let Some(path) = find_null(&self.config, "") {
            return Err(FinalizeError::Serialize {
                format: "TOML",
                reason: format!("null value at '{}'", path),
            });
        }
        toml::to_string(&self.config).map_err(|e| FinalizeError::Serialize {
            format: "TOML",
            reason: e.to_string(),
        })
    }

    /// Write to file; `.toml` paths get TOML, anything else JSON.
    pub fn write_to_file(&self, path: &Path) -> Result<(), FinalizeError> {
        let contents = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => self.to_toml()?,
            _ => self.to_json()?,
        };
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Path of the first `null` in the tree, if any.
fn find_null(map: &Map<String, Value>, prefix: &str) -> Option<String> {
    map.iter().find_map(|(key, value)| {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Null => Some(path),
            Value::Object(inner) => find_null(inner, &path),
            Value::Array(items) => items.iter().enumerate().find_map(|(i, item)| match item {
                Value::Null => Some(format!("{}[{}]", path, i)),
                Value::Object(inner) => find_null(inner, &format!("{}[{}]", path, i)),
                _ => None,
            }),
            _ => None,
        }
    })
}
