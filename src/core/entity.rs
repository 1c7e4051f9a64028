//! Game entity system with typed integer IDs
//!
//! Every card and player gets a stable, globally-unique integer ID from a
//! single monotonic counter owned by the state that creates it. IDs are
//! generic over the entity type so `CardId` and `PlayerId` can't be mixed up
//! at a call site even though both are backed by the same representation.

use crate::KernelError;
use crate::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed integer ID for a game entity.
///
/// Stable for the lifetime of a game; stable under `clone()` of the state
/// that owns the entity. Two IDs of different `T` never compare equal even
/// if their underlying integer matches.
pub struct EntityId<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityId<T> {
    pub fn new(raw: u32) -> Self {
        EntityId {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.raw
    }
}

// Manual impls: `#[derive(...)]` would require `T: Clone/Copy/...`, which
// we don't want to impose on Card/Player just because their ID type exists.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for EntityId<T> {}
impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<T> Eq for EntityId<T> {}
impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}
impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.raw)
    }
}
impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
impl<T> Serialize for EntityId<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.raw)
    }
}
impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Ok(EntityId::new(raw))
    }
}

/// Base trait for all game entities.
pub trait GameEntity<T> {
    fn id(&self) -> EntityId<T>;
}

/// Central arena for one entity type, keyed by `EntityId<T>`.
///
/// Entities are never deallocated mid-game (matching the spec invariant that
/// an `instance_id` is stable and unique for the whole game), so this is a
/// flat append-mostly map rather than a slot allocator with free lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: FxHashMap<u32, T>,
    next_id: u32,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Mint a new unique ID without inserting anything.
    pub fn next_id(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: EntityId<T>, entity: T) {
        self.entities.insert(id.raw, entity);
    }

    pub fn get(&self, id: EntityId<T>) -> Result<&T> {
        self.entities
            .get(&id.raw)
            .ok_or(KernelError::EntityNotFound(id.raw))
    }

    pub fn get_mut(&mut self, id: EntityId<T>) -> Result<&mut T> {
        self.entities
            .get_mut(&id.raw)
            .ok_or(KernelError::EntityNotFound(id.raw))
    }

    pub fn contains(&self, id: EntityId<T>) -> bool {
        self.entities.contains_key(&id.raw)
    }

    pub fn remove(&mut self, id: EntityId<T>) -> Option<T> {
        self.entities.remove(&id.raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId<T>, &T)> {
        self.entities.iter().map(|(raw, v)| (EntityId::new(*raw), v))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Thing {
        name: String,
    }

    #[test]
    fn ids_are_stable_and_unique() {
        let mut store: EntityStore<Thing> = EntityStore::new();
        let id1 = store.next_id();
        let id2 = store.next_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.as_u32(), 0);
        assert_eq!(id2.as_u32(), 1);

        store.insert(
            id1,
            Thing {
                name: "a".into(),
            },
        );
        assert_eq!(store.get(id1).unwrap().name, "a");
        assert!(store.get(id2).is_err());
    }

    #[test]
    fn clone_preserves_ids() {
        let mut store: EntityStore<Thing> = EntityStore::new();
        let id = store.next_id();
        store.insert(
            id,
            Thing {
                name: "clone-me".into(),
            },
        );
        let cloned = store.clone();
        assert_eq!(cloned.get(id).unwrap().name, "clone-me");
    }
}
