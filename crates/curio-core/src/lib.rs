//! Curio Core - Optimistic cache synchronization kernel
//!
//! This crate provides the synchronous heart of the Curio client layer,
//! including:
//! - Entity, Rank and Review models with session/route types
//! - The keyed remote-value cache with cooperative fetch cancellation
//! - Mutation snapshots and the optimistic patch inventory
//! - The cursor-paginated review feed sequencer
//! - The pure five-state view gate for the detail page
//! - Back-navigation return-context rewriting
//!
//! Everything here is single-threaded and synchronous; the async boundary
//! (transport calls, settlement) lives in `curio-engine`.

pub mod cache;
pub mod errors;
pub mod feed;
pub mod logging_facility;
pub mod model;
pub mod mutation;
pub mod nav;
pub mod notify;
pub mod queries;
pub mod snapshot;

// Re-export commonly used types
pub use cache::{CacheKey, CacheValue, FetchState, FetchTicket, RemoteCache};
pub use errors::{Result, SyncError, SyncErrorKind};
pub use feed::{PageTicket, ReviewFeed};
pub use model::{Entity, EntityId, Rank, Review, ReviewPage, RouteFlags, Session};
pub use mutation::{MutationAction, MutationOutcome, ReportReason};
pub use notify::{Notice, NoticeKind, NoticeLog};
pub use queries::view_gate::{resolve, RenderState};
pub use snapshot::MutationSnapshot;
