//! Convenience re-exports. `use takt::prelude::*` pulls in everything a
//! typical game needs.

pub use crate::ecs::{Component, ComponentSet, EntityId, System, World};
pub use crate::game_loop::GameLoop;
pub use crate::notify::{Channel, SubscriberToken};
pub use crate::profiler::Profiler;
