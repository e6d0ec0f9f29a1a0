//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u32` handle with no inherent data. The
//! [`EntityAllocator`] owns the list of live handles and destroys them by
//! swap-remove, keeping an id → position map so destruction stays O(1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An opaque entity handle.
///
/// Entities are pure identifiers. Components attached to them give them
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u32);

impl Entity {
    /// The invalid / destroyed entity sentinel (all bits set).
    pub const INVALID: Entity = Entity(u32::MAX);

    /// Create an entity from a raw `u32` handle.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` handle.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns `true` unless this is [`Entity::INVALID`].
    ///
    /// This says nothing about liveness; use [`EntityAllocator::is_alive`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "Entity({})", self.0)
        } else {
            f.write_str("Entity(INVALID)")
        }
    }
}

/// Allocates monotonically increasing entity handles and tracks the live set.
///
/// Handles are never reused. A fresh allocator hands out `0, 1, 2, …`, so
/// until the first destruction a handle equals its position in [`live`].
///
/// [`live`]: EntityAllocator::live
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next_id: u32,
    /// Live handles in creation order, reordered by swap-remove.
    live: Vec<Entity>,
    /// Position of every live handle inside `live`.
    positions: HashMap<Entity, usize>,
}

impl EntityAllocator {
    /// Creates a new, empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity and appends it to the live list.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` handle space is exhausted.
    pub fn allocate(&mut self) -> Entity {
        assert!(
            self.next_id != Entity::INVALID.0,
            "entity handle space exhausted"
        );
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.positions.insert(entity, self.live.len());
        self.live.push(entity);
        entity
    }

    /// Removes `entity` from the live list by swap-remove.
    ///
    /// Returns `false` for the sentinel or a handle that is not live.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        let Some(pos) = self.positions.remove(&entity) else {
            return false;
        };
        self.live.swap_remove(pos);
        // The former last element now sits where `entity` was.
        if let Some(&moved) = self.live.get(pos) {
            self.positions.insert(moved, pos);
        }
        true
    }

    /// Returns `true` if `entity` is currently live.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.positions.contains_key(&entity)
    }

    /// The live entities in live-list order.
    #[must_use]
    pub fn live(&self) -> &[Entity] {
        &self.live
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
