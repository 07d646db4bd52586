//! # Takt — Minimal Frame-Driven Simulation Kernel
//!
//! A small Entity-Component-System core plus a frame loop that advances
//! simulated state at a controlled cadence. Game logic is written as
//! [`System`](ecs::System) implementations registered on a
//! [`World`](ecs::World); a [`GameLoop`](game_loop::GameLoop) drives the
//! per-frame lifecycle and guards against timing glitches.
//!
//! Start with `use takt::prelude::*`.

pub mod ecs;
pub mod game_loop;
pub mod notify;
pub mod prelude;
pub mod profiler;
