//! Review records and the cursor-paginated page shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntityId, ReviewId, UserId, VersionId};

/// Opaque continuation token identifying where the next page begins
///
/// Minted server-side; the client never inspects or orders these beyond
/// equality checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single user review of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub entity_id: EntityId,
    pub version_id: Option<VersionId>,
    pub author: UserId,
    pub author_name: String,
    /// Star rating, 1..=5
    pub rating: u8,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One server-ordered page of reviews plus its continuation token
///
/// `next_cursor` absent means there are no further pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub next_cursor: Option<Cursor>,
}

/// Server-side sort orders for the review list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    HighestRated,
}

/// Server-side filters for the review list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReviewFilters {
    /// Restrict to reviews of one version
    pub version_id: Option<VersionId>,
    /// Drop reviews without body text
    pub with_body_only: bool,
}

/// Identifies one review list: the entity plus its filter/sort parameters
///
/// Changing any part of this resets the feed; pages from different queries
/// are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    pub entity_id: EntityId,
    pub sort: ReviewSort,
    pub filters: ReviewFilters,
}

impl ReviewQuery {
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            sort: ReviewSort::default(),
            filters: ReviewFilters::default(),
        }
    }
}

/// A single page request issued by the feed sequencer
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub query: ReviewQuery,
    /// Cursor to resume from; absent on the first page
    pub cursor: Option<Cursor>,
}
