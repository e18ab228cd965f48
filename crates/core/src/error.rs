use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Well-formed input that can never succeed (e.g. swapping with yourself).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The operation is not allowed in the entity's current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The requested status change is not one the caller may perform.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Lost a concurrency race or observed stale ownership.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
