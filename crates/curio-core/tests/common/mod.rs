//! Shared helpers for curio-core integration tests

use std::collections::BTreeSet;

use curio_core::cache::{CacheKey, CacheValue, RemoteCache};
use curio_core::model::{Entity, EntityId, PublicationStatus, UserId};

/// A published entity with the given favorite count
pub fn published_entity(id: u64, favorite_count: u64) -> Entity {
    let mut entity = Entity::new(EntityId::new(id), format!("entity-{}", id), UserId::new(1));
    entity.status = PublicationStatus::Published;
    entity.rank.favorite_count_all_time = favorite_count;
    entity
}

/// Cache seeded with one settled entity and a settled membership set
pub fn seeded_cache(entity: Entity, favorites: &[u64]) -> RemoteCache {
    let cache = RemoteCache::new();
    cache.write(CacheKey::Entity(entity.id), CacheValue::Entity(entity));
    cache.write(
        CacheKey::Favorites,
        CacheValue::Favorites(favorites.iter().copied().map(EntityId::new).collect()),
    );
    cache
}

pub fn favorites_of(cache: &RemoteCache) -> BTreeSet<EntityId> {
    cache
        .read(CacheKey::Favorites)
        .and_then(|value| value.as_favorites().cloned())
        .unwrap_or_default()
}

pub fn favorite_count(cache: &RemoteCache, id: u64) -> u64 {
    cache
        .read(CacheKey::Entity(EntityId::new(id)))
        .and_then(|value| value.into_entity())
        .map(|entity| entity.rank.favorite_count_all_time)
        .expect("entity settled in cache")
}
