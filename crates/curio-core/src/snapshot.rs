//! Mutation snapshots for exact rollback
//!
//! A snapshot captures the full settled state (value, staleness, or
//! settled-absent / never-settled) of every cache key a mutation is about
//! to optimistically patch. It is owned exclusively by the in-flight
//! mutation and destroyed on settlement: dropped on success, consumed by
//! `RemoteCache::restore` on failure.

use crate::cache::{CacheKey, CacheValue, Settled};

/// Captured prior state of a mutation's affected keys
///
/// Restoring from a snapshot returns every affected key byte-for-byte to
/// its pre-mutation state, which is what makes optimistic rollback exact.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationSnapshot {
    /// `None` slot means the key had never settled when captured
    pub(crate) entries: Vec<(CacheKey, Option<Settled>)>,
}

impl MutationSnapshot {
    /// Keys captured by this snapshot, in capture order
    pub fn keys(&self) -> impl Iterator<Item = CacheKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// The captured value under `key`, if the key held one
    ///
    /// This is the only prior state `MutationAction::predict` may consult:
    /// predictions are pure functions of captured previous values, never of
    /// the anticipated server response.
    pub fn previous(&self, key: CacheKey) -> Option<&CacheValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, slot)| match slot {
                Some(Settled::Present { value, .. }) => Some(value),
                _ => None,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
