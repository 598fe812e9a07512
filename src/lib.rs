//! Pipen Board config finalization
//!
//! This crate turns the option schema edited in the pipeline board form into
//! the minimal configuration document used to run the pipeline. It also
//! carries the value coercion and validation rules applied to raw form input,
//! the display ordering of option keys, and the small pieces of form state
//! around them.

pub mod finalize;
pub mod help;
pub mod schema;
pub mod sorter;
pub mod state;
pub mod status;
pub mod value;

pub use finalize::{finalize, reconcile, FinalConfig, FinalizeError};
pub use schema::{OptionShape, PgArg, SchemaDocument, SchemaError, SchemaNode};
pub use sorter::{has_hidden, keys_hidden, keys_unhidden, sort_keys};
pub use state::{FileStore, FormState, MemoryStore, StateStore};
pub use status::{status_percentages, RunStatusTree, StatusBreakdown};
pub use value::{coerce, validate, values_equal, CoercionError, TargetType};
