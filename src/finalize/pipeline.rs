//! Walk of the whole schema document

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::FinalizeError;
use super::output::FinalConfig;
use super::reconcile::reconcile;
use crate::schema::{SchemaDocument, SchemaNode};
use crate::value::values_equal;

/// Process options that always hold nested options.
fn is_process_namespace(option: &str) -> bool {
    option.ends_with("_opts") || option == "envs"
}

/// Reconcile a process's own options, dropping those the root config
/// already resolves to the same value.
fn process_config(
    options: &IndexMap<String, SchemaNode>,
    root: &Map<String, Value>,
    group_args: Option<&IndexMap<String, SchemaNode>>,
) -> Result<Map<String, Value>, FinalizeError> {
    let mut proc_conf = Map::new();
    for (option, node) in options {
        reconcile(
            &mut proc_conf,
            option,
            node,
            is_process_namespace(option),
            group_args,
        )?;
        let inherited = matches!(
            (proc_conf.get(option), root.get(option)),
            (Some(own), Some(root_value)) if values_equal(own, root_value)
        );
        if inherited {
            debug!(option = %option, "Dropping process option inherited from pipeline");
            proc_conf.shift_remove(option);
        }
    }
    Ok(proc_conf)
}

/// Finalize an edited schema into the configuration document.
///
/// Pipeline options and additional options land at the root. Each process
/// is nested under its name, or merged into the root when the pipeline sets
/// `plugin_opts.args_flatten`. Process-group arguments are nested under the
/// group name and member processes always under their own name.
pub fn finalize(schema: &SchemaDocument) -> Result<FinalConfig, FinalizeError> {
    let flatten = schema.flatten_requested();
    let mut config = Map::new();

    for (option, node) in &schema.pipeline_options {
        reconcile(&mut config, option, node, option.ends_with("_opts"), None)?;
    }

    for (option, node) in &schema.additional_options {
        reconcile(&mut config, option, node, false, None)?;
    }

    for (proc, entry) in &schema.processes {
        let proc_conf = process_config(&entry.value, &config, None)?;
        if proc_conf.is_empty() {
            continue;
        }
        if flatten {
            debug!(process = %proc, "Flattening process options into the root");
            config.extend(proc_conf);
        } else {
            config.insert(proc.clone(), Value::Object(proc_conf));
        }
    }

    for (group, group_info) in &schema.procgroups {
        let mut group_conf = config
            .get(group)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        for (option, node) in &group_info.arguments {
            reconcile(&mut group_conf, option, node, false, None)?;
        }
        if !group_conf.is_empty() {
            config.insert(group.clone(), Value::Object(group_conf));
        }

        for (proc, entry) in &group_info.processes {
            let proc_conf = process_config(&entry.value, &config, Some(&group_info.arguments))?;
            if !proc_conf.is_empty() {
                config.insert(proc.clone(), Value::Object(proc_conf));
            }
        }
    }

    Ok(FinalConfig::new(config))
}
