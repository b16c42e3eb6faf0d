//! Entity ids and the entity-tracking collaborator.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec3;

/// Session-unique runtime entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the id as the signed unique id used by add/remove messages.
    #[must_use]
    pub const fn unique(self) -> i64 {
        self.0 as i64
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// An entity as seen by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    pub id: EntityId,
    pub identifier: String,
    pub position: Vec3,
    /// Bounding box width and height.
    pub dimensions: (f32, f32),
}

/// Entity-tracking collaborator of a session.
pub trait EntityRegistry: Send + Sync {
    /// Allocates the next runtime id. Ids increase monotonically.
    fn allocate_id(&self) -> EntityId;

    /// Records a spawned entity.
    fn register_spawned_entity(&self, entity: TrackedEntity);

    /// Forgets a despawned entity, returning it if it was known.
    fn remove_entity(&self, id: EntityId) -> Option<TrackedEntity>;
}

/// In-memory [`EntityRegistry`].
#[derive(Debug)]
pub struct EntityCache {
    next_id: AtomicU64,
    entities: Mutex<BTreeMap<EntityId, TrackedEntity>>,
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCache {
    /// Creates an empty cache whose first allocated id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an empty cache whose first allocated id is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next_id: AtomicU64::new(first),
            entities: Mutex::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.lock().contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<TrackedEntity> {
        self.lock().get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<EntityId, TrackedEntity>> {
        self.entities.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntityRegistry for EntityCache {
    fn allocate_id(&self) -> EntityId {
        EntityId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn register_spawned_entity(&self, entity: TrackedEntity) {
        self.lock().insert(entity.id, entity);
    }

    fn remove_entity(&self, id: EntityId) -> Option<TrackedEntity> {
        self.lock().remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: EntityId) -> TrackedEntity {
        TrackedEntity {
            id,
            identifier: "minecraft:armor_stand".to_owned(),
            position: Vec3::ZERO,
            dimensions: (1.0, 1.0),
        }
    }

    #[test]
    fn ids_are_monotonic() {
        let cache = EntityCache::new();
        let a = cache.allocate_id();
        let b = cache.allocate_id();
        assert_eq!(a, EntityId::new(1));
        assert!(b > a);
    }

    #[test]
    fn starting_at_offsets_ids() {
        let cache = EntityCache::starting_at(100);
        assert_eq!(cache.allocate_id().raw(), 100);
    }

    #[test]
    fn register_and_remove() {
        let cache = EntityCache::new();
        let id = cache.allocate_id();
        cache.register_spawned_entity(entity(id));
        assert!(cache.contains(id));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove_entity(id).map(|e| e.id), Some(id));
        assert!(cache.remove_entity(id).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn unique_id_matches_raw() {
        assert_eq!(EntityId::new(42).unique(), 42);
    }
}
