//! Finalization errors

use std::io;

use crate::schema::SchemaError;

/// Finalization errors
#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to serialize config as {format}: {reason}")]
    Serialize { format: &'static str, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}
