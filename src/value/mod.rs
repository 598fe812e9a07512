//! Value semantics shared by the form and the finalizer
//!
//! - Deep structural equality used for every pruning decision
//! - Coercion of raw form strings into typed values
//! - Validator tags checked while the user edits a field

mod coerce;
mod equality;
mod validate;

pub use coerce::{coerce, parse_number, CoercionError, TargetType};
pub use equality::{option_values_equal, values_equal};
pub use validate::{validate, Validator};
