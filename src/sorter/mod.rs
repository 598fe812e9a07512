//! Display ordering of option keys
//!
//! Works on the raw JSON mapping the form renders from. Placeholder keys
//! (`<key>`, `more>`) without an explicit `order` are pushed to the end by
//! backfilling `order = 9999` on the node itself; everything else defaults to
//! order 0. Ties keep insertion order.

use serde_json::{Map, Value};
use tracing::error;

pub use crate::schema::is_placeholder;

/// Order assigned to placeholder keys that do not declare one.
pub const PLACEHOLDER_ORDER: i64 = 9999;

/// Errors raised while inspecting node shapes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SortError {
    #[error("option '{0}' is not a mapping")]
    NotAMapping(String),

    #[error("option '{key}' has a non-numeric order: {order}")]
    BadOrder { key: String, order: Value },
}

/// Sort `keys` of `data` by `(order, position in keys)`.
///
/// Backfills the `order` of placeholder nodes as a side effect.
pub fn sort_keys<S: AsRef<str>>(
    data: &mut Map<String, Value>,
    keys: &[S],
) -> Result<Vec<String>, SortError> {
    let mut ordered = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.as_ref();
        let node = data
            .get_mut(key)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| SortError::NotAMapping(key.to_string()))?;

        if is_placeholder(key) && node.get("order").map_or(true, Value::is_null) {
            node.insert("order".to_string(), Value::from(PLACEHOLDER_ORDER));
        }

        let order = match node.get("order") {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(other) => {
                return Err(SortError::BadOrder {
                    key: key.to_string(),
                    order: other.clone(),
                })
            }
        };
        ordered.push((order, key.to_string()));
    }

    // Stable: equal orders keep their position in `keys`.
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(ordered.into_iter().map(|(_, k)| k).collect())
}

fn is_hidden(node: &Value) -> bool {
    node.get("hidden") == Some(&Value::Bool(true))
}

fn filtered_keys(
    data: &mut Map<String, Value>,
    hidden: bool,
    context: &str,
) -> Option<Vec<String>> {
    let keys: Vec<String> = data
        .iter()
        .filter(|(_, node)| is_hidden(node) == hidden)
        .map(|(k, _)| k.clone())
        .collect();

    match sort_keys(data, &keys) {
        Ok(sorted) => Some(sorted),
        Err(e) => {
            error!(context = %context, error = %e, "Failed to sort option keys");
            None
        }
    }
}

/// Sorted keys of nodes marked `hidden: true`.
///
/// Shape errors are logged under `context` (the active section) and yield `None`.
pub fn keys_hidden(data: &mut Map<String, Value>, context: &str) -> Option<Vec<String>> {
    filtered_keys(data, true, context)
}

/// Sorted keys of nodes not marked `hidden: true`.
pub fn keys_unhidden(data: &mut Map<String, Value>, context: &str) -> Option<Vec<String>> {
    filtered_keys(data, false, context)
}

/// Whether any node is hidden.
pub fn has_hidden(data: &mut Map<String, Value>, context: &str) -> bool {
    keys_hidden(data, context).is_some_and(|keys| !keys.is_empty())
}
