//! # Signature-Indexed ECS
//!
//! A deliberately simple Entity Component System. Unlike the archetype
//! designs used by [hecs](https://github.com/Ralith/hecs) and
//! [bevy_ecs](https://github.com/bevyengine/bevy), storage here is a plain
//! per-entity map of type-erased components, paired with a per-entity
//! **signature**: a bitmask with one bit per component type. Multi-component
//! queries reduce to a mask test per live entity, which is plenty for worlds
//! with tens to hundreds of entities and a small closed set of component
//! types.
//!
//! ## Module Overview
//!
//! - [`entity`] — Monotonic entity IDs and the liveness registry
//! - [`component`] — Type-erased per-entity storage (`Box<dyn Any>`)
//! - [`signature`] — Type-to-bit registry and per-entity bitmasks
//! - [`system`] — The five-phase system lifecycle trait
//! - [`world`] — Central facade (entities + components + systems)

pub mod component;
pub mod entity;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{Component, ComponentSet};
pub use entity::EntityId;
pub use signature::Signature;
pub use system::System;
pub use world::World;
