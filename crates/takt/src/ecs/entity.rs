//! # Entity — Lightweight Identifiers for Simulated Objects
//!
//! An [`EntityId`] is just a number — it doesn't "contain" anything. The
//! [`World`](super::world::World) maps ids to their components. This
//! separation of identity from data is the core insight of the ECS pattern.
//!
//! ## Design: Monotonic IDs, Never Reused
//!
//! Ids come from a counter that only moves forward. A despawned entity's id
//! is never handed out again, so a stale handle can never silently alias a
//! newer entity — lookups on it simply miss. This makes generation counters
//! unnecessary; the cost is that the id space is consumed monotonically,
//! which a `u64` absorbs for any realistic session length.
//!
//! A soft reset keeps one designated survivor entity and must guarantee
//! that ids allocated afterwards are strictly greater than the survivor's;
//! [`EntityRegistry::advance_past`] exists for exactly that.

use std::collections::HashSet;
use std::fmt;

/// A lightweight handle to an entity in the [`World`](super::world::World).
///
/// Created via [`World::spawn`](super::world::World::spawn) and only valid
/// for the world that created it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// Returns the raw id. Useful for diagnostics, not for general use.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns the entity identity lifecycle: allocation and the liveness set.
///
/// ## Memory Layout
///
/// ```text
/// next_id: 5                ← counter, never rewinds
/// order:   [0, 2, 4]        ← live ids in creation order
/// alive:   {0, 2, 4}        ← membership test
/// ```
///
/// `order` gives queries a deterministic iteration order for a fixed
/// sequence of spawn/despawn calls; `alive` keeps liveness checks O(1).
pub(crate) struct EntityRegistry {
    next_id: u64,
    order: Vec<EntityId>,
    alive: HashSet<EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            order: Vec::new(),
            alive: HashSet::new(),
        }
    }

    /// Allocate a fresh id and register it live.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.order.push(id);
        self.alive.insert(id);
        id
    }

    /// Deregister an id. Returns `false` if it was not live (idempotent).
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        if !self.alive.remove(&id) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&e| e == id) {
            self.order.remove(pos);
        }
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.alive.contains(&id)
    }

    /// Live ids in creation order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Ensure the next allocated id is strictly greater than `id`.
    ///
    /// Used by the soft-reset path so the survivor entity's id is never
    /// trailed by a fresh allocation.
    pub fn advance_past(&mut self, id: EntityId) {
        if self.next_id <= id.0 {
            self.next_id = id.0 + 1;
        }
    }
}
