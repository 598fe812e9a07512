//! Schema node and its reconciliation shape

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::document::SchemaError;

/// Whether an option name is a placeholder for user-defined keys
/// (`<key>`, `<more>`, `envs>` ...).
pub fn is_placeholder(name: &str) -> bool {
    name.starts_with('<') || name.ends_with('>')
}

/// Process-group argument mirroring declared by a process option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PgArg {
    /// `true` mirrors the group argument with the option's own name.
    Flag(bool),
    /// Dotted path into the group arguments, e.g. `"plugin_opts.ncores"`.
    Path(String),
}

impl PgArg {
    /// Resolve the dotted path to look up for an option named `option`.
    pub fn path<'a>(&'a self, option: &'a str) -> Option<&'a str> {
        match self {
            PgArg::Flag(true) => Some(option),
            PgArg::Flag(false) => None,
            PgArg::Path(path) => Some(path.as_str()),
        }
    }
}

/// One configurable option as declared in the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Declared type (`ns`, `namespace`, `int`, `float`, `auto`, `list`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Current value entered in the form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Default value the current value is compared against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgarg: Option<PgArg>,

    /// Descriptive fields the finalizer does not interpret (desc, choices, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How a node takes part in reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionShape<'a> {
    /// Dynamic `[key, raw]` pairs merged straight into the parent config.
    Placeholder(Vec<(String, &'a Value)>),
    /// Nested options reconciled into their own mapping.
    Namespace(IndexMap<String, SchemaNode>),
    /// Value compared against a process-group argument before defaults.
    Mirrored {
        path: &'a str,
        value: Option<&'a Value>,
        default: Option<&'a Value>,
    },
    Plain {
        value: Option<&'a Value>,
        default: Option<&'a Value>,
    },
}

impl SchemaNode {
    /// Convenience constructor used by tests and schema builders.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Whether the declared type is a namespace.
    pub fn is_namespace_type(&self) -> bool {
        matches!(self.kind.as_deref(), Some("ns") | Some("namespace"))
    }

    /// Classify this node for reconciliation.
    ///
    /// `namespace` forces the namespace shape (e.g. `*_opts` options) and
    /// `mirror` enables process-group mirroring for nodes that declare `pgarg`.
    pub fn shape<'a>(
        &'a self,
        name: &'a str,
        namespace: bool,
        mirror: bool,
    ) -> Result<OptionShape<'a>, SchemaError> {
        if is_placeholder(name) {
            return self.placeholder_pairs(name).map(OptionShape::Placeholder);
        }

        if namespace || self.is_namespace_type() {
            return self.namespace_children(name).map(OptionShape::Namespace);
        }

        let value = self.value.as_ref();
        let default = self.default.as_ref();
        if mirror {
            if let Some(path) = self.pgarg.as_ref().and_then(|p| p.path(name)) {
                return Ok(OptionShape::Mirrored {
                    path,
                    value,
                    default,
                });
            }
        }
        Ok(OptionShape::Plain { value, default })
    }

    fn placeholder_pairs(&self, name: &str) -> Result<Vec<(String, &Value)>, SchemaError> {
        let pairs = match &self.value {
            None => return Ok(Vec::new()),
            Some(Value::Array(pairs)) => pairs,
            Some(other) => {
                return Err(SchemaError::Shape {
                    option: name.to_string(),
                    reason: format!("placeholder value must be a list of pairs, got {}", other),
                })
            }
        };

        let mut out = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let items = pair.as_array().ok_or_else(|| SchemaError::Shape {
                option: name.to_string(),
                reason: format!("placeholder entry must be a [key, value] pair, got {}", pair),
            })?;

            let key = match items.first() {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if s.is_empty() => continue,
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(other) => {
                    return Err(SchemaError::Shape {
                        option: name.to_string(),
                        reason: format!("placeholder key must be a scalar, got {}", other),
                    })
                }
            };
            // A pair without a value has nothing to contribute.
            if let Some(raw) = items.get(1) {
                out.push((key, raw));
            }
        }
        Ok(out)
    }

    fn namespace_children(&self, name: &str) -> Result<IndexMap<String, SchemaNode>, SchemaError> {
        match &self.value {
            None => Ok(IndexMap::new()),
            Some(value @ Value::Object(_)) => {
                serde_json::from_value(value.clone()).map_err(|e| SchemaError::Shape {
                    option: name.to_string(),
                    reason: format!("namespace members are not schema nodes: {}", e),
                })
            }
            Some(other) => Err(SchemaError::Shape {
                option: name.to_string(),
                reason: format!("namespace value must be a mapping, got {}", other),
            }),
        }
    }
}
