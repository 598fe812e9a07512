//! Default section descriptions

use crate::schema::{
    SECTION_ADDITIONAL_OPTS, SECTION_PIPELINE_OPTS, SECTION_PROCESSES, SECTION_PROCGROUPS,
    SECTION_RUNNING_OPTS,
};

pub const PROCESS_ENVS_DESC: &str = "The options that shared by all jobs of the process";
pub const PROCESS_PLUGIN_OPTS_DESC: &str = "The plugin options for the process";

const PIPELINE_OPTS_DESC: &str = "
# Pipeline Options

These options are used to configure the pipeline, set common options and control how to run the pipeline.
";

const PROCESSES_DESC: &str = "
# Processes

Processes are basic unit of a pipeline. Each process has its own configuration items. Some of them are derived from the pipeline options.
";

const PROCGROUPS_DESC: &str = "
# Process Groups

Process groups are groups of processes that run as part of the main pipeline. They are usually used to run a group of processes in a separate pipeline.
";

const ADDITIONAL_OPTS_DESC: &str = "
# Additional Options

Additional options are used to configure the pipeline. For example, the input and output of the pipeline.
";

const RUNNING_OPTS_DESC: &str = "
# Running Options

Running options are used to generate the command line to run the pipeline.
";

/// Markdown shown above a section when the schema gives no description.
pub fn default_description(section: &str) -> Option<&'static str> {
    match section {
        SECTION_PIPELINE_OPTS => Some(PIPELINE_OPTS_DESC),
        SECTION_PROCESSES => Some(PROCESSES_DESC),
        SECTION_PROCGROUPS => Some(PROCGROUPS_DESC),
        SECTION_ADDITIONAL_OPTS => Some(ADDITIONAL_OPTS_DESC),
        SECTION_RUNNING_OPTS => Some(RUNNING_OPTS_DESC),
        _ => None,
    }
}
