//! Schema document sections and loading
//!
//! A schema arrives from the board backend as JSON. TOML is accepted as well
//! and converted to the same JSON tree before deserializing.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::node::SchemaNode;

pub const SECTION_PIPELINE_OPTS: &str = "PIPELINE_OPTIONS";
pub const SECTION_PROCESSES: &str = "PROCESSES";
pub const SECTION_PROCGROUPS: &str = "PROCGROUPS";
pub const SECTION_ADDITIONAL_OPTS: &str = "ADDITIONAL_OPTIONS";
pub const SECTION_RUNNING_OPTS: &str = "RUNNING_OPTIONS";

/// Schema errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse schema JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse schema TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Malformed option '{option}': {reason}")]
    Shape { option: String, reason: String },
}

/// Deserialize a missing-or-null collection as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A process and its own options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessEntry {
    /// Own options; `null` means none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: IndexMap<String, SchemaNode>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A process group: shared arguments plus member processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcGroup {
    #[serde(rename = "ARGUMENTS", default, deserialize_with = "null_as_empty")]
    pub arguments: IndexMap<String, SchemaNode>,

    #[serde(rename = "PROCESSES")]
    pub processes: IndexMap<String, ProcessEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full schema edited by the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "PIPELINE_OPTIONS")]
    pub pipeline_options: IndexMap<String, SchemaNode>,

    #[serde(rename = "ADDITIONAL_OPTIONS", default)]
    pub additional_options: IndexMap<String, SchemaNode>,

    #[serde(rename = "PROCESSES", default)]
    pub processes: IndexMap<String, ProcessEntry>,

    #[serde(rename = "PROCGROUPS", default)]
    pub procgroups: IndexMap<String, ProcGroup>,

    /// Options used to build the run command line; not finalized.
    #[serde(
        rename = "RUNNING_OPTIONS",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub running_options: IndexMap<String, SchemaNode>,
}

impl SchemaDocument {
    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SchemaError> {
        let table: toml::Value = toml::from_str(s)?;
        Ok(serde_json::from_value(toml_to_json(table))?)
    }

    /// Load a schema file; `.toml` files are parsed as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    /// Read a schema file as an untyped JSON tree, for the display layer.
    pub fn read_raw(path: &Path) -> Result<Map<String, Value>, SchemaError> {
        let contents = fs::read_to_string(path)?;
        let value = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml_to_json(toml::from_str(&contents)?),
            _ => serde_json::from_str(&contents)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            other => Err(SchemaError::Shape {
                option: path.display().to_string(),
                reason: format!("schema must be a mapping, got {}", other),
            }),
        }
    }

    /// Whether the pipeline declares `plugin_opts.args_flatten` as truthy.
    pub fn flatten_requested(&self) -> bool {
        self.pipeline_options
            .get("plugin_opts")
            .and_then(|opts| opts.value.as_ref())
            .and_then(|v| v.get("args_flatten"))
            .and_then(|flag| flag.get("value"))
            .map(is_truthy)
            .unwrap_or(false)
    }
}

/// Truthiness of a loosely typed flag value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convert TOML Value to JSON Value
pub(crate) fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_minimal_document() {
        let doc = SchemaDocument::from_json_str(r#"{"PIPELINE_OPTIONS": {}}"#).unwrap();
        assert!(doc.pipeline_options.is_empty());
        assert!(doc.processes.is_empty());
        assert!(doc.procgroups.is_empty());
    }

    #[test]
    fn test_missing_pipeline_options_is_error() {
        let err = SchemaDocument::from_json_str(r#"{"PROCESSES": {}}"#).unwrap_err();
        assert!(err.to_string().contains("PIPELINE_OPTIONS"));
    }

    #[test]
    fn test_sections_preserve_order() {
        let doc = SchemaDocument::from_json_str(
            r#"{
                "PIPELINE_OPTIONS": {"zeta": {"value": 1}, "alpha": {"value": 2}},
                "PROCESSES": {"P2": {"value": {}}, "P1": {"value": {}}}
            }"#,
        )
        .unwrap();
        let names: Vec<&str> = doc.pipeline_options.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        let procs: Vec<&str> = doc.processes.keys().map(String::as_str).collect();
        assert_eq!(procs, vec!["P2", "P1"]);
    }

    #[test]
    fn test_null_process_options_are_empty() {
        let doc = SchemaDocument::from_json_str(
            r#"{
                "PIPELINE_OPTIONS": {},
                "PROCESSES": {"P": {"hidden": true, "value": null}},
                "PROCGROUPS": {"G": {"ARGUMENTS": null, "PROCESSES": {"Q": {"value": null}}}}
            }"#,
        )
        .unwrap();
        assert!(doc.processes["P"].value.is_empty());
        assert_eq!(doc.processes["P"].extra["hidden"], json!(true));
        assert!(doc.procgroups["G"].arguments.is_empty());
        assert!(doc.procgroups["G"].processes["Q"].value.is_empty());
    }

    #[test]
    fn test_toml_preserves_key_order() {
        let doc = SchemaDocument::from_toml_str(
            "[PIPELINE_OPTIONS.zeta]\nvalue = 1\n\n[PIPELINE_OPTIONS.alpha]\nvalue = 2\n\n\
             [PROCESSES.P2.value.mid]\nvalue = 3\n\n[PROCESSES.P1.value.beta]\nvalue = 4\n",
        )
        .unwrap();
        let names: Vec<&str> = doc.pipeline_options.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        let procs: Vec<&str> = doc.processes.keys().map(String::as_str).collect();
        assert_eq!(procs, vec!["P2", "P1"]);

        let config = crate::finalize::finalize(&doc).unwrap();
        let keys: Vec<&str> = config.config.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "P2", "P1"]);
    }

    #[test]
    fn test_procgroup_requires_processes() {
        let err = SchemaDocument::from_json_str(
            r#"{"PIPELINE_OPTIONS": {}, "PROCGROUPS": {"G": {"ARGUMENTS": {}}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("PROCESSES"));
    }

    #[test]
    fn test_flatten_requested() {
        let doc: SchemaDocument = serde_json::from_value(json!({
            "PIPELINE_OPTIONS": {
                "plugin_opts": {"value": {"args_flatten": {"value": true}}}
            }
        }))
        .unwrap();
        assert!(doc.flatten_requested());

        let doc: SchemaDocument = serde_json::from_value(json!({
            "PIPELINE_OPTIONS": {
                "plugin_opts": {"value": {"args_flatten": {"value": false}}}
            }
        }))
        .unwrap();
        assert!(!doc.flatten_requested());

        let doc: SchemaDocument = serde_json::from_value(json!({
            "PIPELINE_OPTIONS": {"plugin_opts": {"value": {}}}
        }))
        .unwrap();
        assert!(!doc.flatten_requested());
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(temp, "[PIPELINE_OPTIONS.forks]").unwrap();
        writeln!(temp, "type = \"int\"").unwrap();
        writeln!(temp, "value = 4").unwrap();
        writeln!(temp, "default = 1").unwrap();

        let doc = SchemaDocument::from_file(temp.path()).unwrap();
        let forks = &doc.pipeline_options["forks"];
        assert_eq!(forks.value, Some(json!(4)));
        assert_eq!(forks.default, Some(json!(1)));
    }

    #[test]
    fn test_load_json_file() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, r#"{{"PIPELINE_OPTIONS": {{"name": {{"value": "x"}}}}}}"#).unwrap();

        let doc = SchemaDocument::from_file(temp.path()).unwrap();
        assert_eq!(doc.pipeline_options["name"].value, Some(json!("x")));

        let raw = SchemaDocument::read_raw(temp.path()).unwrap();
        assert_eq!(raw["PIPELINE_OPTIONS"]["name"]["value"], json!("x"));
    }
}
