//! Schema finalization
//!
//! Collapses an edited [`SchemaDocument`](crate::schema::SchemaDocument) into
//! the smallest configuration that reproduces it:
//! - unchanged options (value equals default) are dropped
//! - empty namespaces are dropped
//! - process options equal to the pipeline-level value are dropped
//! - process options mirroring an equal process-group argument are dropped

mod error;
mod output;
mod pipeline;
mod reconcile;

pub use error::FinalizeError;
pub use output::FinalConfig;
pub use pipeline::finalize;
pub use reconcile::{group_value, reconcile};
