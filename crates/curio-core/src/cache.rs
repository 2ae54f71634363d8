//! Keyed in-memory cache of remotely-owned values
//!
//! The cache is the single shared mutable resource of the layer and its
//! sole mutation surface:
//! - All operations are synchronous, key-isolated, and run to completion
//!   within the current turn (writing key A never affects key B).
//! - Cancellation is cooperative: `cancel_pending` bumps a per-key fetch
//!   epoch; an in-flight fetch's completion carries the epoch it started
//!   with and is discarded on mismatch. The network request itself is not
//!   aborted.
//! - `invalidate` marks a settled value stale so the next read-through
//!   fetch hits the network; the stale value stays readable meanwhile.
//! - Change listeners fire synchronously after every observable state
//!   change, replacing implicit framework reactivity.
//!
//! Single-threaded by design: interior mutability instead of locks. Callers
//! treat every read as a snapshot valid for the current synchronous turn
//! only.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::model::{Entity, EntityId};
use crate::snapshot::MutationSnapshot;

/// Cache key addressing one remotely-owned value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The entity detail record (entity-shaped)
    Entity(EntityId),
    /// The session's favorite membership set (list-shaped)
    Favorites,
}

impl CacheKey {
    /// Whether this key holds a collection rather than a single record
    ///
    /// List-shaped keys are invalidated after a committed mutation so the
    /// next read re-fetches authoritative server state; entity-shaped keys
    /// keep the predicted value until the next natural refetch.
    pub fn is_list_shaped(&self) -> bool {
        matches!(self, CacheKey::Favorites)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Entity(id) => write!(f, "entity:{}", id),
            CacheKey::Favorites => write!(f, "favorites"),
        }
    }
}

/// Value stored under a cache key
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Entity(Entity),
    Favorites(BTreeSet<EntityId>),
}

impl CacheValue {
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            CacheValue::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_favorites(&self) -> Option<&BTreeSet<EntityId>> {
        match self {
            CacheValue::Favorites(set) => Some(set),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self {
            CacheValue::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}

/// Settlement state of a key's backing fetch
///
/// A key with a previously settled value stays `Settled` while a stale
/// refetch is in flight; `Pending` means nothing has ever settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Unfetched,
    Pending,
    Settled,
}

/// A settled cache slot
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Settled {
    /// Fetch settled with a value; `stale` forces the next read-through
    Present { value: CacheValue, stale: bool },
    /// Fetch settled with no value (entity does not exist)
    Absent,
}

/// Ticket handed out by `begin_fetch`
///
/// Completion is discarded if the key's epoch moved on (`cancel_pending`)
/// while the fetch was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    epoch: u64,
}

impl FetchTicket {
    pub fn key(&self) -> CacheKey {
        self.key
    }
}

/// Listener invoked synchronously after each observable change to a key
///
/// Listeners may read the cache but must not subscribe from within a
/// notification.
pub type ChangeListener = Box<dyn Fn(CacheKey)>;

/// Keyed in-memory store of fetched values
#[derive(Default)]
pub struct RemoteCache {
    slots: RefCell<HashMap<CacheKey, Settled>>,
    /// Epoch of the fetch currently in flight per key
    pending: RefCell<HashMap<CacheKey, u64>>,
    /// Monotonic per-key fetch epoch; bumped by `cancel_pending`
    epochs: RefCell<HashMap<CacheKey, u64>>,
    listeners: RefCell<Vec<ChangeListener>>,
}

impl RemoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the settled value under a key; never blocks
    ///
    /// Pending and settled-absent keys read as `None`. The returned clone
    /// is a snapshot valid for the current synchronous turn only.
    pub fn read(&self, key: CacheKey) -> Option<CacheValue> {
        match self.slots.borrow().get(&key) {
            Some(Settled::Present { value, .. }) => Some(value.clone()),
            _ => None,
        }
    }

    /// Settlement state of a key, as consumed by the view gate
    pub fn fetch_state(&self, key: CacheKey) -> FetchState {
        if self.slots.borrow().contains_key(&key) {
            FetchState::Settled
        } else if self.pending.borrow().contains_key(&key) {
            FetchState::Pending
        } else {
            FetchState::Unfetched
        }
    }

    /// Whether the settled value under a key is marked stale
    pub fn is_stale(&self, key: CacheKey) -> bool {
        matches!(
            self.slots.borrow().get(&key),
            Some(Settled::Present { stale: true, .. })
        )
    }

    /// Write a value under a key, settling it fresh
    pub fn write(&self, key: CacheKey, value: CacheValue) {
        self.slots
            .borrow_mut()
            .insert(key, Settled::Present { value, stale: false });
        self.notify(key);
    }

    /// Write through a pure updater, total over the absent case
    pub fn update<F>(&self, key: CacheKey, f: F)
    where
        F: FnOnce(Option<CacheValue>) -> CacheValue,
    {
        let previous = self.read(key);
        self.write(key, f(previous));
    }

    /// Discard the effect of any in-flight fetch targeting `key`
    ///
    /// Cooperative: the epoch moves on and the fetch's eventual completion
    /// is dropped on arrival. Prevents a stale response from overwriting a
    /// fresher optimistic write.
    pub fn cancel_pending(&self, key: CacheKey) {
        *self.epochs.borrow_mut().entry(key).or_insert(0) += 1;
        let was_pending = self.pending.borrow_mut().remove(&key).is_some();
        if was_pending {
            debug!(cache_key = %key, "cancelled in-flight fetch");
            self.notify(key);
        }
    }

    /// Mark the settled value under `key` stale
    ///
    /// The next read-through fetch hits the network; the stale value stays
    /// readable until it does. No-op for unsettled or absent keys.
    pub fn invalidate(&self, key: CacheKey) {
        let mut changed = false;
        if let Some(Settled::Present { stale, .. }) = self.slots.borrow_mut().get_mut(&key) {
            if !*stale {
                *stale = true;
                changed = true;
            }
        }
        if changed {
            debug!(cache_key = %key, "invalidated");
            self.notify(key);
        }
    }

    /// Start a read-through fetch for `key`
    ///
    /// Returns `None` when a fetch is already in flight or the key holds a
    /// fresh settled value (including settled-absent: a confirmed NotFound
    /// is not retried). Otherwise marks the key pending and returns the
    /// ticket the completion must present.
    pub fn begin_fetch(&self, key: CacheKey) -> Option<FetchTicket> {
        if self.pending.borrow().contains_key(&key) {
            return None;
        }
        match self.slots.borrow().get(&key) {
            Some(Settled::Present { stale: false, .. }) | Some(Settled::Absent) => return None,
            _ => {}
        }
        let epoch = *self.epochs.borrow().get(&key).unwrap_or(&0);
        self.pending.borrow_mut().insert(key, epoch);
        self.notify(key);
        Some(FetchTicket { key, epoch })
    }

    /// Settle a read-through fetch
    ///
    /// `outcome` of `None` settles the key absent. A completion whose
    /// ticketed epoch no longer matches is discarded without touching the
    /// slot - the caller's response arrived after `cancel_pending`.
    pub fn complete_fetch(&self, ticket: FetchTicket, outcome: Option<CacheValue>) {
        let current = *self.epochs.borrow().get(&ticket.key).unwrap_or(&0);
        if current != ticket.epoch {
            debug!(cache_key = %ticket.key, "discarded stale fetch completion");
            return;
        }
        self.pending.borrow_mut().remove(&ticket.key);
        let slot = match outcome {
            Some(value) => Settled::Present { value, stale: false },
            None => Settled::Absent,
        };
        self.slots.borrow_mut().insert(ticket.key, slot);
        self.notify(ticket.key);
    }

    /// Abandon a read-through fetch after a transport failure
    ///
    /// Clears the pending marker (unless the epoch moved on) without
    /// settling the key, so a later trigger may retry.
    pub fn fail_fetch(&self, ticket: FetchTicket) {
        let current = *self.epochs.borrow().get(&ticket.key).unwrap_or(&0);
        if current != ticket.epoch {
            return;
        }
        self.pending.borrow_mut().remove(&ticket.key);
        self.notify(ticket.key);
    }

    /// Register a listener fired synchronously after each change
    pub fn subscribe(&self, listener: ChangeListener) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Capture the settled state of the given keys for exact rollback
    pub fn capture(&self, keys: &[CacheKey]) -> MutationSnapshot {
        let slots = self.slots.borrow();
        MutationSnapshot {
            entries: keys
                .iter()
                .map(|key| (*key, slots.get(key).cloned()))
                .collect(),
        }
    }

    /// Restore every captured key to its captured state
    ///
    /// Keys captured as never-settled are returned to that state. Fetch
    /// epochs are not rewound; cancellation survives rollback.
    pub fn restore(&self, snapshot: &MutationSnapshot) {
        for (key, slot) in &snapshot.entries {
            match slot {
                Some(settled) => {
                    self.slots.borrow_mut().insert(*key, settled.clone());
                }
                None => {
                    self.slots.borrow_mut().remove(key);
                }
            }
            self.notify(*key);
        }
    }

    fn notify(&self, key: CacheKey) {
        for listener in self.listeners.borrow().iter() {
            listener(key);
        }
    }
}
