//! Mutation action inventory and optimistic patch predictions
//!
//! Each user action that mutates remotely-owned state declares the cache
//! keys it touches and how to predict their patched values from the
//! captured previous state. The engine's coordinator runs the three-phase
//! protocol (begin, settle-success, settle-failure) around these
//! declarations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, CacheValue};
use crate::errors::SyncError;
use crate::model::{EntityId, PublicationStatus};
use crate::snapshot::MutationSnapshot;

/// Reason codes accepted by the report endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportReason {
    TosViolation,
    AdultContent,
    Spam,
}

/// User actions that mutate remotely-owned state
#[derive(Debug, Clone, PartialEq)]
pub enum MutationAction {
    /// Flip favorite membership and move the all-time count with it.
    ///
    /// The server call is a true toggle, not an idempotent set/unset:
    /// rapid repeated invocation without settlement in between can desync
    /// the prediction from the server-applied toggle. Accepted, documented
    /// ordering caveat.
    ToggleFavorite { entity_id: EntityId },

    /// Report the entity; no optimistic UI patch
    ReportEntity {
        entity_id: EntityId,
        reason: ReportReason,
    },

    /// Set status to Unpublished pending confirmation
    UnpublishEntity { entity_id: EntityId },

    /// Delete the entity; no optimistic patch - the page navigates away on
    /// confirmed success only
    DeleteEntity { entity_id: EntityId },
}

impl MutationAction {
    /// Stable name used in log events and rejection errors
    pub fn name(&self) -> &'static str {
        match self {
            MutationAction::ToggleFavorite { .. } => "toggle_favorite",
            MutationAction::ReportEntity { .. } => "report_entity",
            MutationAction::UnpublishEntity { .. } => "unpublish_entity",
            MutationAction::DeleteEntity { .. } => "delete_entity",
        }
    }

    /// The entity this action targets
    pub fn entity_id(&self) -> EntityId {
        match self {
            MutationAction::ToggleFavorite { entity_id }
            | MutationAction::ReportEntity { entity_id, .. }
            | MutationAction::UnpublishEntity { entity_id }
            | MutationAction::DeleteEntity { entity_id } => *entity_id,
        }
    }

    /// Cache keys this action touches
    ///
    /// Every affected key has its in-flight fetch cancelled and its state
    /// snapshotted at Begin, whether or not a patch is predicted for it.
    pub fn affected_keys(&self) -> Vec<CacheKey> {
        match self {
            MutationAction::ToggleFavorite { entity_id } => {
                vec![CacheKey::Favorites, CacheKey::Entity(*entity_id)]
            }
            MutationAction::ReportEntity { .. } => Vec::new(),
            MutationAction::UnpublishEntity { entity_id }
            | MutationAction::DeleteEntity { entity_id } => {
                vec![CacheKey::Entity(*entity_id)]
            }
        }
    }

    /// Predicted patches applied at Begin
    ///
    /// A pure function of the captured previous values only - never of the
    /// anticipated server response. This is what makes rollback exact.
    pub fn predict(&self, prior: &MutationSnapshot) -> Vec<(CacheKey, CacheValue)> {
        match self {
            MutationAction::ToggleFavorite { entity_id } => {
                let mut patches = Vec::new();

                let membership: BTreeSet<EntityId> = prior
                    .previous(CacheKey::Favorites)
                    .and_then(CacheValue::as_favorites)
                    .cloned()
                    .unwrap_or_default();
                let was_member = membership.contains(entity_id);

                // Flip membership and move the count in the same patch set,
                // keeping the coupling invariant across settlement.
                let mut flipped = membership;
                if was_member {
                    flipped.remove(entity_id);
                } else {
                    flipped.insert(*entity_id);
                }
                patches.push((CacheKey::Favorites, CacheValue::Favorites(flipped)));

                if let Some(entity) = prior
                    .previous(CacheKey::Entity(*entity_id))
                    .and_then(CacheValue::as_entity)
                {
                    let mut patched = entity.clone();
                    patched.rank.favorite_count_all_time = if was_member {
                        patched.rank.favorite_count_all_time.saturating_sub(1)
                    } else {
                        patched.rank.favorite_count_all_time + 1
                    };
                    patches.push((
                        CacheKey::Entity(*entity_id),
                        CacheValue::Entity(patched),
                    ));
                }

                patches
            }

            MutationAction::ReportEntity { .. } => Vec::new(),

            MutationAction::UnpublishEntity { entity_id } => prior
                .previous(CacheKey::Entity(*entity_id))
                .and_then(CacheValue::as_entity)
                .map(|entity| {
                    let mut patched = entity.clone();
                    patched.status = PublicationStatus::Unpublished;
                    vec![(
                        CacheKey::Entity(*entity_id),
                        CacheValue::Entity(patched),
                    )]
                })
                .unwrap_or_default(),

            MutationAction::DeleteEntity { .. } => Vec::new(),
        }
    }
}

/// Outcome of a settled mutation
///
/// The single result surface of the three-phase protocol; raw transport
/// errors never travel further than this.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum MutationOutcome {
    /// Server confirmed; list-shaped affected keys were invalidated
    Committed,
    /// Server rejected; every affected key was restored from the snapshot
    RolledBack(SyncError),
}

impl MutationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed)
    }
}
