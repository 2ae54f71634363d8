//! Domain models for the entity detail page
//!
//! These types mirror the server's resources as the client sees them. The
//! server remains the sole source of truth post-settlement; everything here
//! is a local, possibly optimistically-patched copy.

pub mod entity;
pub mod ids;
pub mod review;
pub mod session;

pub use entity::{Entity, EntityVersion, PublicationStatus, Rank};
pub use ids::{EntityId, ReviewId, UserId, VersionId};
pub use review::{Cursor, PageRequest, Review, ReviewFilters, ReviewPage, ReviewQuery, ReviewSort};
pub use session::{EntityRoute, RouteFlags, Session, Viewer};
