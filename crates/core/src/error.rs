use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// `PastDate` is deliberately separate from `Validation` so callers can
/// distinguish "bad input, fix and retry" from "already gone" — both map
/// to 400 at the HTTP boundary but carry distinct codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Not-found keyed by a natural identifier (cabin slugs).
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot book past dates: {0}")]
    PastDate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
