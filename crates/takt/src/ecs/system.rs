//! # System — Units of Behavior Over the World
//!
//! A system is a stateful object implementing any subset of five lifecycle
//! hooks; the rest default to no-ops. Gameplay logic lives entirely in
//! systems, which query and mutate the [`World`] through the hooks'
//! `&mut World` argument.
//!
//! ## Lifecycle
//!
//! ```text
//! start  ──► initialize (all systems, registration order)
//!        ──► post_initialize (all systems, after every initialize)
//! tick   ──► update(dt) (every frame, registration order)
//! stop   ──► destroy (release external resources)
//! reset  ──► reset (clear per-system transient state)
//! ```
//!
//! `post_initialize` exists to break ordering dependencies: system B's
//! setup may need a value system A only produces during its own
//! `initialize`. Within each phase, registration order is the total order —
//! it is an explicit correctness dependency (input mutates velocity before
//! movement integrates it, movement runs before collision, and so on).
//!
//! ## Design Philosophy
//!
//! No parameter injection, no dependency graphs, no parallel scheduling.
//! Systems run strictly sequentially on one thread; each completes before
//! the next begins. The world is the single shared mutable resource, handed
//! to each hook by the dispatcher — a system never stores a world
//! reference.

use super::world::World;

/// A unit of behavior driven by the [`World`]'s phase dispatch.
///
/// All hooks have default no-op bodies; implement only what the system
/// needs.
pub trait System {
    /// Name used for profiling and diagnostics. Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Called once when the loop starts, before any `post_initialize`.
    /// Seed initial state and acquire external resources here.
    fn initialize(&mut self, world: &mut World) {
        let _ = world;
    }

    /// Called once after *every* system's `initialize` has completed.
    /// Use for setup that depends on another system's initialization.
    fn post_initialize(&mut self, world: &mut World) {
        let _ = world;
    }

    /// Called every frame with the elapsed time in seconds.
    fn update(&mut self, world: &mut World, dt: f32) {
        let _ = (world, dt);
    }

    /// Called once when the loop stops. Release external resources here —
    /// on every path, so repeated start/stop cycles don't leak.
    fn destroy(&mut self) {}

    /// Called on soft reset. Clear per-system transient caches (timers,
    /// accumulators); the world reference, if needed again, is re-acquired
    /// in the next `initialize`.
    fn reset(&mut self) {}
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// short name (e.g. `demo::systems::GravitySystem` → `GravitySystem`).
pub(crate) fn short_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DoesNothing;
    impl System for DoesNothing {}

    #[test]
    fn default_hooks_are_no_ops() {
        let mut world = World::new();
        let mut system = DoesNothing;
        system.initialize(&mut world);
        system.post_initialize(&mut world);
        system.update(&mut world, 0.016);
        system.destroy();
        system.reset();
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(DoesNothing.name().ends_with("DoesNothing"));
    }

    #[test]
    fn short_name_strips_path() {
        assert_eq!(short_name("a::b::GravitySystem"), "GravitySystem");
        assert_eq!(short_name("Bare"), "Bare");
    }
}
