//! The primary entity resource and its aggregates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntityId, UserId, VersionId};

/// Publication status of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationStatus {
    Draft,
    Published,
    Unpublished,
}

/// All-time aggregate counters for an entity
///
/// Eventually consistent with server truth: optimistic patches may move
/// these ahead of the server until the next settled fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Rank {
    pub favorite_count_all_time: u64,
    pub rating_all_time: f64,
    pub rating_count_all_time: u64,
    pub download_count_all_time: u64,
}

/// One published revision of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityVersion {
    pub id: VersionId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The primary resource rendered by the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub status: PublicationStatus,
    /// Content-sensitivity flag; gates rendering for anonymous viewers
    pub sensitive: bool,
    pub owner: UserId,
    /// Ordered by creation time, descending; the first is the latest
    pub versions: Vec<EntityVersion>,
    pub rank: Rank,
}

impl Entity {
    /// Create a draft entity with no versions and zeroed rank
    pub fn new(id: EntityId, name: impl Into<String>, owner: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            status: PublicationStatus::Draft,
            sensitive: false,
            owner,
            versions: Vec::new(),
            rank: Rank::default(),
        }
    }

    /// The latest version, if any (first element of the ordered sequence)
    pub fn latest_version(&self) -> Option<&EntityVersion> {
        self.versions.first()
    }

    /// Re-establish the latest-first ordering after ingesting versions
    pub fn sort_versions_latest_first(&mut self) {
        self.versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }
}
