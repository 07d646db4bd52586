//! # Signature — Per-Entity Component Bitmasks
//!
//! Each component type is assigned a bit the first time any add or query
//! operation references it. Each entity carries a [`Signature`] with bit
//! *i* set iff it currently holds the component whose type owns bit *i*.
//! "Which entities have {A, B, C}?" then becomes one mask test per live
//! entity.
//!
//! ## Capacity
//!
//! A `u32` mask leaves 31 freely usable bits. Registering a 32nd distinct
//! component type logs a warning and is assigned the top bit — as is every
//! type after it, so matches involving those types may collide. The index
//! degrades rather than fails: the frame loop must stay alive (see the
//! crate's error-handling policy).
//!
//! ## Ordering
//!
//! Bit assignment is insertion-ordered and stable for the lifetime of the
//! owning [`World`](super::world::World). It is **not** reproducible across
//! processes — it depends on call order, not type identity. The registry is
//! instance state, never global, so independent worlds in one process don't
//! share (or fight over) bit assignments.

use std::any::TypeId;
use std::collections::HashMap;

use log::warn;

use super::entity::EntityId;

/// A per-entity component bitmask.
pub type Signature = u32;

/// Number of freely usable bits in a [`Signature`]. Types registered beyond
/// this share the final bit.
pub const SIGNATURE_CAPACITY: u32 = 31;

/// Assigns a stable bit per component type and maintains a bitmask per
/// entity.
pub(crate) struct SignatureIndex {
    /// Component type → its assigned bit (a one-bit mask, not a position).
    bits: HashMap<TypeId, Signature>,
    /// Entity → current signature.
    masks: HashMap<EntityId, Signature>,
    /// Next bit position to assign.
    next_bit: u32,
    /// Set once the 32nd distinct type has been registered.
    overflowed: bool,
}

impl SignatureIndex {
    pub fn new() -> Self {
        Self {
            bits: HashMap::new(),
            masks: HashMap::new(),
            next_bit: 0,
            overflowed: false,
        }
    }

    /// Start tracking an entity with a zero signature.
    pub fn register_entity(&mut self, id: EntityId) {
        self.masks.insert(id, 0);
    }

    pub fn drop_entity(&mut self, id: EntityId) {
        self.masks.remove(&id);
    }

    /// The bit for a component type, assigning one on first use.
    ///
    /// Past [`SIGNATURE_CAPACITY`] distinct types, every further type gets
    /// the top bit; a warning is logged per overflowing registration.
    pub fn bit_for(&mut self, type_id: TypeId, name: &'static str) -> Signature {
        if let Some(&bit) = self.bits.get(&type_id) {
            return bit;
        }
        if self.next_bit >= SIGNATURE_CAPACITY {
            warn!(
                "signature index full: component type `{name}` shares bit {SIGNATURE_CAPACITY}; \
                 queries involving it may collide"
            );
            self.overflowed = true;
        }
        let bit = 1u32 << self.next_bit.min(SIGNATURE_CAPACITY);
        self.next_bit += 1;
        self.bits.insert(type_id, bit);
        bit
    }

    /// The bit for a component type, if it has ever been registered.
    pub fn lookup(&self, type_id: TypeId) -> Option<Signature> {
        self.bits.get(&type_id).copied()
    }

    pub fn set_bit(&mut self, id: EntityId, bit: Signature) {
        if let Some(mask) = self.masks.get_mut(&id) {
            *mask |= bit;
        }
    }

    pub fn clear_bit(&mut self, id: EntityId, bit: Signature) {
        if let Some(mask) = self.masks.get_mut(&id) {
            *mask &= !bit;
        }
    }

    pub fn signature(&self, id: EntityId) -> Option<Signature> {
        self.masks.get(&id).copied()
    }

    /// Number of distinct component types ever registered.
    pub fn type_count(&self) -> usize {
        self.bits.len()
    }

    /// Whether the 32nd distinct type has been registered (degraded mode).
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}
