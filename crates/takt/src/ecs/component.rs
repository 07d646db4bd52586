//! # Component — Type-Erased Per-Entity Storage
//!
//! A component is a plain data record identified by its Rust type. Storage
//! is a map per entity: `TypeId → Box<dyn Any>`. An entity holds at most
//! one instance of a given component type; re-inserting overwrites.
//!
//! This trades the cache-friendliness of columnar/archetype layouts for
//! simplicity — appropriate here because the signature index (not the
//! storage) answers the hot "which entities have {A, B, C}" question, and
//! per-entity lookups are O(1) either way.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::entity::EntityId;

/// Marker trait for component types. Blanket-implemented for any
/// `'static + Send + Sync` type; you never implement it by hand.
pub trait Component: Any + Send + Sync {}

impl<T: Any + Send + Sync> Component for T {}

/// A set of component types used as a query, e.g.
/// `(Position, Velocity)`. Implemented for tuples of 1 to 8 components.
pub trait ComponentSet {
    /// The `TypeId` and human-readable name of each type in the set.
    fn types() -> Vec<(TypeId, &'static str)>;
}

macro_rules! impl_component_set {
    ($($T:ident),+) => {
        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            fn types() -> Vec<(TypeId, &'static str)> {
                vec![$((TypeId::of::<$T>(), std::any::type_name::<$T>())),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

/// All component instances attached to one entity, keyed by type.
type ComponentMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Owns, per entity, the set of attached component instances.
///
/// Purely a data store: liveness policy and signature maintenance live in
/// [`World`](super::world::World), which keeps this map and the
/// [`SignatureIndex`](super::signature::SignatureIndex) in lockstep.
pub(crate) struct ComponentStore {
    maps: HashMap<EntityId, ComponentMap>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self {
            maps: HashMap::new(),
        }
    }

    /// Initialize an empty component set for a freshly spawned entity.
    pub fn register_entity(&mut self, id: EntityId) {
        self.maps.insert(id, ComponentMap::new());
    }

    /// Drop an entity's entire component set.
    pub fn drop_entity(&mut self, id: EntityId) {
        self.maps.remove(&id);
    }

    /// Store `component` on `id`, replacing any existing instance of the
    /// same type. The caller has already checked liveness.
    pub fn insert<T: Component>(&mut self, id: EntityId, component: T) {
        if let Some(map) = self.maps.get_mut(&id) {
            map.insert(TypeId::of::<T>(), Box::new(component));
        }
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.maps
            .get(&id)?
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.maps
            .get_mut(&id)?
            .get_mut(&TypeId::of::<T>())?
            .downcast_mut::<T>()
    }

    /// Delete the stored instance. Returns `false` if absent.
    pub fn remove(&mut self, id: EntityId, type_id: TypeId) -> bool {
        self.maps
            .get_mut(&id)
            .is_some_and(|map| map.remove(&type_id).is_some())
    }
}
