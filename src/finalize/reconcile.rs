//! Reconciliation of a single option into a config mapping

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::FinalizeError;
use crate::schema::{OptionShape, SchemaNode};
use crate::value::{coerce, option_values_equal, TargetType};

/// Look up a process-group argument by dotted path.
///
/// The first segment selects an argument; each further segment descends into
/// the current namespace value and takes that member's `value`. Missing steps
/// and `null` resolve to `None`.
pub fn group_value<'a>(args: &'a IndexMap<String, SchemaNode>, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = args.get(first)?.value.as_ref()?;
    for part in parts {
        current = current.get(part)?.get("value")?;
    }
    (!current.is_null()).then_some(current)
}

/// Reconcile option `name` into `config`.
///
/// Placeholder pairs are auto-coerced and merged into `config` directly,
/// namespaces recurse into `config[name]` and are dropped when empty, and
/// any other option is set only when it differs from its process-group
/// argument (if mirrored) and from its default.
pub fn reconcile(
    config: &mut Map<String, Value>,
    name: &str,
    node: &SchemaNode,
    namespace: bool,
    group_args: Option<&IndexMap<String, SchemaNode>>,
) -> Result<(), FinalizeError> {
    let (value, default) = match node.shape(name, namespace, group_args.is_some())? {
        OptionShape::Placeholder(pairs) => {
            for (key, raw) in pairs {
                config.insert(key, coerce_raw(raw));
            }
            return Ok(());
        }
        OptionShape::Namespace(members) => {
            let mut nested = config
                .get(name)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            for (member, member_node) in &members {
                reconcile(&mut nested, member, member_node, false, group_args)?;
            }
            if nested.is_empty() {
                debug!(option = %name, "Dropping empty namespace");
            } else {
                config.insert(name.to_string(), Value::Object(nested));
            }
            return Ok(());
        }
        OptionShape::Mirrored {
            path,
            value,
            default,
        } => {
            let inherited = group_args.and_then(|args| group_value(args, path));
            if option_values_equal(inherited, value) {
                debug!(option = %name, pgarg = %path, "Dropping option inherited from process group");
                return Ok(());
            }
            (value, default)
        }
        OptionShape::Plain { value, default } => (value, default),
    };

    match value {
        None => {}
        Some(v) if option_values_equal(Some(v), default) => {
            debug!(option = %name, "Dropping option equal to its default");
        }
        Some(v) => {
            config.insert(name.to_string(), v.clone());
        }
    }
    Ok(())
}

/// Raw placeholder values are form strings; anything else is already typed.
fn coerce_raw(raw: &Value) -> Value {
    match raw {
        Value::String(s) => {
            coerce(s, TargetType::Auto, false).unwrap_or_else(|_| Value::String(s.clone()))
        }
        other => other.clone(),
    }
}
