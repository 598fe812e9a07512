//! Pipeline option schema
//!
//! In-memory representation of the option schema edited by the board form:
//! pipeline options, additional options, per-process options and process
//! groups, each made of [`SchemaNode`]s.

mod document;
mod node;

pub use document::{
    ProcGroup, ProcessEntry, SchemaDocument, SchemaError, SECTION_ADDITIONAL_OPTS,
    SECTION_PIPELINE_OPTS, SECTION_PROCESSES, SECTION_PROCGROUPS, SECTION_RUNNING_OPTS,
};
pub use node::{is_placeholder, OptionShape, PgArg, SchemaNode};
