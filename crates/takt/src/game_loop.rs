//! # GameLoop — Frame Scheduling
//!
//! A two-state (Stopped/Running) machine that drives the
//! [`World`](crate::ecs::World)'s lifecycle:
//!
//! ```text
//! start ──► record time baseline
//!       ──► World::initialize, World::post_initialize (once per start)
//! tick  ──► dt = now - last_time (seconds)
//!       ──► dt > glitch threshold? skip World::update, keep running
//!       ──► otherwise World::update(dt)
//! stop  ──► World::destroy (once), emit profiler report
//! ```
//!
//! ## Degenerate Frames
//!
//! A frame whose delta exceeds the glitch threshold (default 0.1 s — below
//! 10 fps, typically a suspended process or a debugger pause) is skipped
//! entirely rather than integrated: applying seconds of simulated time in
//! one step tears physics apart. The loop itself stays alive and the next
//! frame proceeds from the new baseline.
//!
//! ## Ownership
//!
//! The loop never owns the world — every call borrows it. That lets an
//! external orchestrator compose restart as stop → `World::reset` (or full
//! system re-registration) → start without reconstructing the loop.
//! [`run_until`](GameLoop::run_until) is a convenience driver that paces
//! [`tick`](GameLoop::tick) at a fixed cadence; an external timer source
//! can call `tick` directly instead.

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::ecs::World;

/// Default glitch threshold in seconds. Frames slower than this are
/// treated as degenerate and skipped.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Default pacing interval for [`GameLoop::run_until`] (60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Drives a single-threaded frame cadence over a [`World`].
pub struct GameLoop {
    running: bool,
    last_time: Instant,
    max_delta: f32,
    frame_interval: Duration,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            running: false,
            last_time: Instant::now(),
            max_delta: DEFAULT_MAX_DELTA,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    /// Override the glitch threshold, in seconds.
    pub fn with_max_delta(mut self, seconds: f32) -> Self {
        self.max_delta = seconds;
        self
    }

    /// Override the [`run_until`](Self::run_until) pacing rate.
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_interval = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Transition Stopped→Running: record the time baseline and run the
    /// two initialization phases exactly once. No-op if already running.
    pub fn start(&mut self, world: &mut World) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_time = Instant::now();

        world.initialize();
        world.post_initialize();
        info!("game loop started ({} systems)", world.system_count());
    }

    /// Transition Running→Stopped: run `World::destroy` exactly once and
    /// emit the profiler report. No-op if already stopped.
    pub fn stop(&mut self, world: &mut World) {
        if !self.running {
            return;
        }
        self.running = false;
        world.destroy();

        let summary = world.profiler().summary();
        if !summary.is_empty() {
            info!("profiler report ({} systems):", summary.len());
            for stats in summary {
                info!(
                    "  {:<24} mean {:.3} ms over {} frames",
                    stats.name, stats.mean_ms, stats.samples
                );
            }
        }
        info!("game loop stopped");
    }

    /// Advance one frame using the wall clock. A tick while stopped is a
    /// no-op — this guards against a stale scheduled callback firing after
    /// [`stop`](Self::stop).
    pub fn tick(&mut self, world: &mut World) {
        self.advance(world, Instant::now());
    }

    fn advance(&mut self, world: &mut World, now: Instant) {
        if !self.running {
            return;
        }
        let dt = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;

        if dt > self.max_delta {
            warn!("large frame delta {dt:.3}s detected; skipping update");
            return;
        }
        world.update(dt);
    }

    /// Blocking driver: start, then tick at the configured frame interval
    /// until `should_stop` returns true (checked after each tick), then
    /// stop. Restart-style behavior is composed by the caller around this.
    pub fn run_until(&mut self, world: &mut World, mut should_stop: impl FnMut(&World) -> bool) {
        self.start(world);
        while self.running {
            let frame_start = Instant::now();
            self.tick(world);
            if should_stop(world) {
                self.stop(world);
                break;
            }
            let spent = frame_start.elapsed();
            if let Some(remaining) = self.frame_interval.checked_sub(spent) {
                std::thread::sleep(remaining);
            }
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ecs::System;

    /// Records lifecycle calls and every dt passed to update.
    struct Recorder {
        deltas: Rc<RefCell<Vec<f32>>>,
        events: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Recorder {
        fn install(world: &mut World) -> (Rc<RefCell<Vec<f32>>>, Rc<RefCell<Vec<&'static str>>>) {
            let deltas = Rc::new(RefCell::new(Vec::new()));
            let events = Rc::new(RefCell::new(Vec::new()));
            world.add_system(Recorder {
                deltas: Rc::clone(&deltas),
                events: Rc::clone(&events),
            });
            (deltas, events)
        }
    }

    impl System for Recorder {
        fn initialize(&mut self, _world: &mut World) {
            self.events.borrow_mut().push("initialize");
        }
        fn post_initialize(&mut self, _world: &mut World) {
            self.events.borrow_mut().push("post_initialize");
        }
        fn update(&mut self, _world: &mut World, dt: f32) {
            self.deltas.borrow_mut().push(dt);
        }
        fn destroy(&mut self) {
            self.events.borrow_mut().push("destroy");
        }
    }

    #[test]
    fn start_runs_both_init_phases_once() {
        let mut world = World::new();
        let (_, events) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new();

        game_loop.start(&mut world);
        game_loop.start(&mut world); // no-op while running
        assert_eq!(*events.borrow(), vec!["initialize", "post_initialize"]);
    }

    #[test]
    fn stop_destroys_once() {
        let mut world = World::new();
        let (_, events) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new();

        game_loop.stop(&mut world); // no-op while stopped
        game_loop.start(&mut world);
        game_loop.stop(&mut world);
        game_loop.stop(&mut world); // no-op once stopped
        assert_eq!(
            *events.borrow(),
            vec!["initialize", "post_initialize", "destroy"]
        );
    }

    #[test]
    fn tick_while_stopped_is_noop() {
        let mut world = World::new();
        let (deltas, _) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new();

        game_loop.tick(&mut world);
        assert!(deltas.borrow().is_empty());
    }

    #[test]
    fn glitch_frame_is_skipped_not_applied() {
        let mut world = World::new();
        let (deltas, _) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new();
        game_loop.start(&mut world);

        let baseline = game_loop.last_time;

        // Simulated 5-second stall: must be skipped entirely.
        game_loop.advance(&mut world, baseline + Duration::from_secs(5));
        assert!(deltas.borrow().is_empty());

        // The next ordinary frame proceeds from the new baseline.
        game_loop.advance(
            &mut world,
            baseline + Duration::from_secs(5) + Duration::from_millis(16),
        );
        let recorded = deltas.borrow();
        assert_eq!(recorded.len(), 1);
        assert!((recorded[0] - 0.016).abs() < 1e-3);
    }

    #[test]
    fn update_never_sees_delta_above_threshold() {
        let mut world = World::new();
        let (deltas, _) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new().with_max_delta(0.05);
        game_loop.start(&mut world);

        let baseline = game_loop.last_time;
        let mut now = baseline;
        for step_ms in [16, 200, 16, 60, 40, 16] {
            now += Duration::from_millis(step_ms);
            game_loop.advance(&mut world, now);
        }
        assert!(deltas.borrow().iter().all(|&dt| dt <= 0.05));
        assert_eq!(deltas.borrow().len(), 4);
    }

    #[test]
    fn stop_prevents_further_updates() {
        let mut world = World::new();
        let (deltas, _) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new();
        game_loop.start(&mut world);

        let baseline = game_loop.last_time;
        game_loop.advance(&mut world, baseline + Duration::from_millis(16));
        game_loop.stop(&mut world);
        // A stale scheduled tick after stop must do nothing.
        game_loop.advance(&mut world, baseline + Duration::from_millis(32));
        assert_eq!(deltas.borrow().len(), 1);
    }

    #[test]
    fn run_until_stops_on_predicate() {
        let mut world = World::new();
        let (deltas, events) = Recorder::install(&mut world);
        let mut game_loop = GameLoop::new().with_frame_rate(1000);

        let mut frames = 0;
        game_loop.run_until(&mut world, |_world| {
            frames += 1;
            frames >= 3
        });

        assert!(!game_loop.is_running());
        assert_eq!(deltas.borrow().len(), 3);
        assert_eq!(
            *events.borrow(),
            vec!["initialize", "post_initialize", "destroy"]
        );
    }
}
