use crate::types::DbId;

/// Domain error taxonomy shared by the repository and API layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested write was already applied (e.g. attendance marked
    /// today). Distinct from [`CoreError::Conflict`] so callers can surface
    /// a friendlier message.
    #[error("Already done: {0}")]
    AlreadyDone(String),

    /// Server-side data is misconfigured (e.g. an event without an
    /// attendable log). Always a 500, never the client's fault.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An external collaborator (certificate service, forms provider)
    /// failed. Never rolls back committed ledger state.
    #[error("Upstream service failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
