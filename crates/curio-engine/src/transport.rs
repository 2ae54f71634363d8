//! Transport seam: the request/response primitives the page consumes
//!
//! Implemented by the embedding application (an HTTP client in production,
//! a scripted fake in tests). The trait is `?Send`: the whole layer runs on
//! a current-thread executor and futures never cross threads.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use curio_core::errors::SyncError;
use curio_core::model::{Entity, EntityId, PageRequest, ReviewPage};
use curio_core::mutation::ReportReason;

/// Failure surfaced by the host's network layer
///
/// Timeouts are the transport's responsibility; the synchronization layer
/// imposes none of its own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("network failure: {reason}")]
    Network { reason: String },

    #[error("rejected by server: {reason}")]
    Rejected { reason: String },

    #[error("request timed out")]
    Timeout,
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Consumed query and mutation operations
#[async_trait(?Send)]
pub trait Transport {
    async fn entity_by_id(&self, id: EntityId) -> TransportResult<Option<Entity>>;

    /// Entity ids the current session has favorited
    async fn favorite_memberships(&self) -> TransportResult<BTreeSet<EntityId>>;

    /// One server-ordered review page for the given query and cursor
    async fn reviews(&self, request: &PageRequest) -> TransportResult<ReviewPage>;

    /// Flip the favorite state of an entity
    ///
    /// A true toggle, not an idempotent set/unset: repeated rapid calls
    /// without settlement in between can desync the optimistic prediction
    /// from the server-applied state. Accepted, documented risk.
    async fn toggle_favorite(&self, id: EntityId) -> TransportResult<()>;

    async fn report_entity(&self, id: EntityId, reason: ReportReason) -> TransportResult<()>;

    async fn unpublish_entity(&self, id: EntityId) -> TransportResult<()>;

    async fn delete_entity(&self, id: EntityId) -> TransportResult<()>;
}

/// Map a transport failure on a fetch path into the layer's taxonomy
pub(crate) fn fetch_error(err: TransportError) -> SyncError {
    SyncError::FetchFailed {
        reason: err.to_string(),
    }
}

/// Map a transport failure on a mutation path into the layer's taxonomy
pub(crate) fn mutation_error(action: &str, err: TransportError) -> SyncError {
    SyncError::MutationRejected {
        action: action.to_string(),
        reason: err.to_string(),
    }
}
