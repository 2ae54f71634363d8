//! Error taxonomy for the synchronization layer
//!
//! The layer swallows and reports mutation/fetch errors locally (notice +
//! rollback); it never throws into the rendering layer. Rendering only ever
//! observes `RenderState` and cache values, so these types travel between
//! the engine, the notice log, and test assertions - not into the UI.

use thiserror::Error;

use crate::model::EntityId;

/// Result type alias using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

/// Canonical error kind taxonomy
///
/// A stable, structured classification of every error in the layer. Each
/// kind maps to a stable code usable for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    /// Identifier resolves to no entity; surfaced as NotFound, not retried
    NotFound,
    /// Malformed route identifier; resolved to NotFound at the routing boundary
    InvalidRoute,
    /// Continuation token rejected by the server
    InvalidCursor,
    /// List page fetch failed; feed state left retryable
    FetchFailed,
    /// Transport/server rejected a mutation; recovered via snapshot rollback
    MutationRejected,
    /// Transport-level failure outside a mutation
    Transport,
    /// Internal invariant breach
    Internal,
}

impl SyncErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SyncErrorKind::NotFound => "ERR_NOT_FOUND",
            SyncErrorKind::InvalidRoute => "ERR_INVALID_ROUTE",
            SyncErrorKind::InvalidCursor => "ERR_INVALID_CURSOR",
            SyncErrorKind::FetchFailed => "ERR_FETCH_FAILED",
            SyncErrorKind::MutationRejected => "ERR_MUTATION_REJECTED",
            SyncErrorKind::Transport => "ERR_TRANSPORT",
            SyncErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Error taxonomy for synchronization operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Identifier resolves to no entity
    #[error("Entity not found: {entity_id}")]
    EntityNotFound { entity_id: EntityId },

    /// Route identifier is malformed (non-numeric)
    #[error("Invalid route identifier: '{segment}'")]
    InvalidRouteId { segment: String },

    /// Continuation token rejected by the server
    #[error("Invalid cursor: {reason}")]
    InvalidCursor { reason: String },

    /// A list page fetch failed
    #[error("Page fetch failed: {reason}")]
    FetchFailed { reason: String },

    /// Transport/server rejected a mutation
    #[error("Mutation '{action}' rejected: {reason}")]
    MutationRejected { action: String, reason: String },

    /// Transport-level failure outside a mutation
    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    /// Internal invariant breach
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SyncError {
    /// Get the error kind
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::EntityNotFound { .. } => SyncErrorKind::NotFound,
            SyncError::InvalidRouteId { .. } => SyncErrorKind::InvalidRoute,
            SyncError::InvalidCursor { .. } => SyncErrorKind::InvalidCursor,
            SyncError::FetchFailed { .. } => SyncErrorKind::FetchFailed,
            SyncError::MutationRejected { .. } => SyncErrorKind::MutationRejected,
            SyncError::Transport { .. } => SyncErrorKind::Transport,
            SyncError::Internal { .. } => SyncErrorKind::Internal,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
