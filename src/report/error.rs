//! Engine-level error types, layered over DatabaseError.

use thiserror::Error;

use super::types::FieldError;
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Always the full ordered list of violations, never a single opaque
    /// message. Raised before any mutation, so the caller can retry with
    /// corrected input.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
}
