//! # World — The Central Container
//!
//! The [`World`] composes the entity registry, component store, and
//! signature index into a single facade, and owns the ordered system
//! sequence the frame loop dispatches into.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ World                                                │
//! │                                                      │
//! │  EntityRegistry: id allocation + liveness set        │
//! │                                                      │
//! │  ComponentStore: EntityId → (TypeId → Box<dyn Any>)  │
//! │                                                      │
//! │  SignatureIndex: TypeId → bit, EntityId → bitmask    │
//! │    kept in lockstep with the store on every          │
//! │    insert/remove/despawn                             │
//! │                                                      │
//! │  systems: Vec<Box<dyn System>>                       │
//! │    registration order = dispatch order, all phases   │
//! │                                                      │
//! │  profiler: per-system update durations               │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! Nothing here returns an error. Operations on absent entities or
//! components either log a warning and do nothing (mutations) or report
//! absence through `Option`/`false` (lookups). Spawn/despawn races within a
//! frame are expected; the frame loop must never die because a system
//! touched an entity that another system already removed.

use std::any::TypeId;
use std::time::Instant;

use log::warn;

use super::component::{Component, ComponentSet, ComponentStore};
use super::entity::{EntityId, EntityRegistry};
use super::signature::{Signature, SignatureIndex};
use super::system::{System, short_name};
use crate::profiler::Profiler;

/// The central container for all simulation state.
pub struct World {
    entities: EntityRegistry,
    components: ComponentStore,
    signatures: SignatureIndex,
    systems: Vec<Box<dyn System>>,
    profiler: Profiler,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityRegistry::new(),
            components: ComponentStore::new(),
            signatures: SignatureIndex::new(),
            systems: Vec::new(),
            profiler: Profiler::new(),
        }
    }

    // ── Entity Management ────────────────────────────────────────────

    /// Allocate a fresh entity with an empty component set and a zero
    /// signature. Ids are monotonic and never reused.
    pub fn spawn(&mut self) -> EntityId {
        let id = self.entities.allocate();
        self.components.register_entity(id);
        self.signatures.register_entity(id);
        id
    }

    /// Remove an entity, its component set, and its signature. Removing an
    /// already-absent entity is a no-op, not an error.
    pub fn despawn(&mut self, id: EntityId) {
        if !self.entities.deallocate(id) {
            return;
        }
        self.components.drop_entity(id);
        self.signatures.drop_entity(id);
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entity ids in creation order.
    pub fn entities(&self) -> Vec<EntityId> {
        self.entities.iter().collect()
    }

    // ── Component Access ─────────────────────────────────────────────

    /// Attach `component` to `id`, replacing any existing instance of the
    /// same type and setting the type's signature bit (assigning a bit on
    /// first use).
    ///
    /// Adding to a non-existent entity logs a warning and does nothing —
    /// deliberately soft, because spawn/despawn races are expected during
    /// a frame.
    pub fn insert<T: Component>(&mut self, id: EntityId, component: T) {
        if !self.entities.contains(id) {
            warn!(
                "attempted to add component `{}` to non-existent entity {id}",
                short_name(std::any::type_name::<T>())
            );
            return;
        }
        let bit = self
            .signatures
            .bit_for(TypeId::of::<T>(), std::any::type_name::<T>());
        self.components.insert(id, component);
        self.signatures.set_bit(id, bit);
    }

    /// Shared reference to `id`'s component of type `T`, if attached.
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.components.get::<T>(id)
    }

    /// Mutable reference to `id`'s component of type `T`, if attached.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.components.get_mut::<T>(id)
    }

    /// Signature bit test. A type never registered with any entity simply
    /// isn't held — `false`, not an error.
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        let Some(signature) = self.signatures.signature(id) else {
            return false;
        };
        match self.signatures.lookup(TypeId::of::<T>()) {
            Some(bit) => signature & bit == bit,
            None => false,
        }
    }

    /// Detach `id`'s component of type `T` and clear its signature bit.
    /// No-op if absent.
    pub fn remove<T: Component>(&mut self, id: EntityId) {
        if !self.components.remove(id, TypeId::of::<T>()) {
            return;
        }
        if let Some(bit) = self.signatures.lookup(TypeId::of::<T>()) {
            self.signatures.clear_bit(id, bit);
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// All live entities holding every component type in `Q`, in creation
    /// order. Deterministic for a fixed sequence of spawn/despawn calls.
    ///
    /// Builds the query mask by OR-ing each type's bit; types never seen
    /// before are registered as a side effect, so even a read-only query
    /// can grow the type registry. Cost is one mask test per live entity.
    ///
    /// # Example
    ///
    /// ```ignore
    /// for id in world.entities_with::<(Position, Velocity)>() {
    ///     // ...
    /// }
    /// ```
    pub fn entities_with<Q: ComponentSet>(&mut self) -> Vec<EntityId> {
        let mut mask: Signature = 0;
        for (type_id, name) in Q::types() {
            mask |= self.signatures.bit_for(type_id, name);
        }
        let signatures = &self.signatures;
        self.entities
            .iter()
            .filter(|&id| {
                signatures
                    .signature(id)
                    .is_some_and(|signature| signature & mask == mask)
            })
            .collect()
    }

    /// Number of distinct component types the signature index has seen.
    pub fn registered_type_count(&self) -> usize {
        self.signatures.type_count()
    }

    /// Whether the signature index has exceeded its bit capacity and is
    /// operating degraded (see [`signature`](super::signature)).
    pub fn signature_overflowed(&self) -> bool {
        self.signatures.overflowed()
    }

    // ── System Registry & Dispatch ───────────────────────────────────

    /// Append a system. Registration order is the authoritative dispatch
    /// order for every lifecycle phase.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Drop the entire system sequence. Used by external orchestrators
    /// that rebuild the system set after a soft reset.
    pub fn clear_systems(&mut self) {
        self.systems.clear();
    }

    /// First lifecycle phase: `initialize` on every system, in
    /// registration order.
    pub fn initialize(&mut self) {
        self.dispatch(|system, world| system.initialize(world));
    }

    /// Second lifecycle phase, strictly after all `initialize` calls.
    pub fn post_initialize(&mut self) {
        self.dispatch(|system, world| system.post_initialize(world));
    }

    /// Per-frame phase: `update(dt)` on every system, in registration
    /// order, timing each call for the profiler.
    pub fn update(&mut self, dt: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        for system in &mut systems {
            let start = Instant::now();
            system.update(self, dt);
            let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;
            self.profiler.track(short_name(system.name()), elapsed_ms);
        }
        self.reattach(systems);
    }

    /// Shutdown phase: `destroy` on every system, in registration order.
    pub fn destroy(&mut self) {
        for system in &mut self.systems {
            system.destroy();
        }
    }

    /// Soft reset: despawn every entity except `survivor`, advance the id
    /// counter past `survivor`, then call `reset` on every system. The
    /// system sequence itself is kept; callers that rebuild it use
    /// [`clear_systems`](Self::clear_systems) and re-register.
    pub fn reset(&mut self, survivor: EntityId) {
        if !self.entities.contains(survivor) {
            warn!("reset survivor {survivor} is not alive; clearing every entity");
        }
        let doomed: Vec<EntityId> = self.entities.iter().filter(|&id| id != survivor).collect();
        for id in doomed {
            self.despawn(id);
        }
        self.entities.advance_past(survivor);
        for system in &mut self.systems {
            system.reset();
        }
    }

    /// Run one phase pass. The system list is taken out of the world for
    /// the duration so each hook can receive `&mut World` without
    /// aliasing; systems registered during the pass are appended afterwards
    /// and take effect from the next phase.
    fn dispatch(&mut self, mut phase: impl FnMut(&mut Box<dyn System>, &mut World)) {
        let mut systems = std::mem::take(&mut self.systems);
        for system in &mut systems {
            phase(system, self);
        }
        self.reattach(systems);
    }

    fn reattach(&mut self, mut systems: Vec<Box<dyn System>>) {
        systems.append(&mut self.systems);
        self.systems = systems;
    }

    // ── Profiling ────────────────────────────────────────────────────

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
