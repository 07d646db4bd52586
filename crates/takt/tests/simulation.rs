//! End-to-end scenarios exercising the ECS core, phase dispatch, and the
//! frame loop together, the way a small game consumes them.

use std::cell::RefCell;
use std::rc::Rc;

use takt::prelude::*;

/// Make warnings from the soft-failure paths visible under `RUST_LOG`.
fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

struct Size {
    w: f32,
    h: f32,
}

struct Sprite;
struct AffectedByGravity;

// ── Minimal gameplay systems ─────────────────────────────────────────────

/// Applies queued "press" events as an upward velocity impulse, once per
/// press. Stands in for an event-driven input backend.
struct InputLike {
    player: EntityId,
    pending_press: Rc<RefCell<bool>>,
    jump_strength: f32,
}

impl System for InputLike {
    fn update(&mut self, world: &mut World, _dt: f32) {
        if !std::mem::take(&mut *self.pending_press.borrow_mut()) {
            return;
        }
        if let Some(velocity) = world.get_mut::<Velocity>(self.player) {
            velocity.y = -self.jump_strength;
        }
    }
}

struct GravityLike {
    gravity: f32,
}

impl System for GravityLike {
    fn update(&mut self, world: &mut World, dt: f32) {
        for id in world.entities_with::<(Velocity, AffectedByGravity)>() {
            if let Some(velocity) = world.get_mut::<Velocity>(id) {
                velocity.y += self.gravity * dt;
            }
        }
    }
}

struct MovementLike;

impl System for MovementLike {
    fn update(&mut self, world: &mut World, dt: f32) {
        for id in world.entities_with::<(Position, Velocity)>() {
            let Some(velocity) = world.get::<Velocity>(id) else {
                continue;
            };
            let (vx, vy) = (velocity.x, velocity.y);
            if let Some(position) = world.get_mut::<Position>(id) {
                position.x += vx * dt;
                position.y += vy * dt;
            }
        }
    }
}

fn spawn_faller(world: &mut World) -> EntityId {
    let id = world.spawn();
    world.insert(id, Position { x: 0.0, y: 0.0 });
    world.insert(id, Velocity { x: 0.0, y: 0.0 });
    world.insert(id, AffectedByGravity);
    id
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[test]
fn gravity_then_movement_in_one_frame() {
    let mut world = World::new();
    let player = spawn_faller(&mut world);

    let pending = Rc::new(RefCell::new(false));
    world.add_system(InputLike {
        player,
        pending_press: Rc::clone(&pending),
        jump_strength: 350.0,
    });
    world.add_system(GravityLike { gravity: 980.0 });
    world.add_system(MovementLike);

    world.initialize();
    world.post_initialize();
    world.update(1.0);

    // Movement runs after gravity, so the frame integrates the
    // post-gravity velocity.
    assert_eq!(world.get::<Velocity>(player), Some(&Velocity { x: 0.0, y: 980.0 }));
    assert_eq!(world.get::<Position>(player), Some(&Position { x: 0.0, y: 980.0 }));
}

#[test]
fn press_overrides_gravity_before_integration() {
    let mut world = World::new();
    let player = spawn_faller(&mut world);

    let pending = Rc::new(RefCell::new(true));
    world.add_system(InputLike {
        player,
        pending_press: Rc::clone(&pending),
        jump_strength: 350.0,
    });
    world.add_system(GravityLike { gravity: 980.0 });
    world.add_system(MovementLike);

    world.update(0.1);

    // Input set v.y = -350 before gravity added 98.
    let velocity = world.get::<Velocity>(player).unwrap();
    assert!((velocity.y - (-350.0 + 98.0)).abs() < 1e-3);

    // The press is consumed: a second frame applies gravity only.
    world.update(0.1);
    let velocity = world.get::<Velocity>(player).unwrap();
    assert!((velocity.y - (-350.0 + 196.0)).abs() < 1e-3);
}

#[test]
fn sprite_query_excludes_spriteless_entity() {
    let mut world = World::new();

    let plain = world.spawn();
    world.insert(plain, Position { x: 0.0, y: 0.0 });
    world.insert(plain, Size { w: 10.0, h: 10.0 });

    let drawn = world.spawn();
    world.insert(drawn, Position { x: 5.0, y: 5.0 });
    world.insert(drawn, Size { w: 10.0, h: 10.0 });
    world.insert(drawn, Sprite);

    assert_eq!(world.entities_with::<(Position, Size, Sprite)>(), vec![drawn]);
    assert_eq!(
        world.entities_with::<(Position, Size)>(),
        vec![plain, drawn]
    );
    assert_eq!(world.get::<Size>(drawn).map(|s| s.w * s.h), Some(100.0));
}

#[test]
fn has_matches_signature_through_mixed_mutations() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();

    world.insert(a, Position { x: 0.0, y: 0.0 });
    world.insert(a, Sprite);
    world.insert(b, Sprite);

    world.remove::<Sprite>(a);
    assert!(!world.has::<Sprite>(a));
    assert!(world.has::<Position>(a));
    assert!(world.has::<Sprite>(b));

    world.insert(a, Sprite);
    world.despawn(b);
    assert!(world.has::<Sprite>(a));
    assert!(!world.has::<Sprite>(b));
    assert_eq!(world.entities_with::<(Sprite,)>(), vec![a]);
}

#[test]
fn reset_survivor_outlives_everything() {
    let mut world = World::new();
    let survivor = world.spawn();
    world.insert(survivor, Position { x: 1.0, y: 2.0 });

    let mut others = Vec::new();
    for _ in 0..20 {
        let id = world.spawn();
        world.insert(id, Sprite);
        others.push(id);
    }

    world.reset(survivor);

    assert_eq!(world.entity_count(), 1);
    assert!(world.is_alive(survivor));
    for id in others {
        assert!(!world.is_alive(id));
    }
    assert_eq!(world.get::<Position>(survivor), Some(&Position { x: 1.0, y: 2.0 }));

    let next = world.spawn();
    assert!(next.index() > survivor.index());
}

// ── Bitmask capacity ─────────────────────────────────────────────────────

struct Unique<const N: usize>;

#[test]
fn thirty_second_type_degrades_but_first_31_stay_queryable() {
    init_logs();
    let mut world = World::new();
    let holder = world.spawn();

    macro_rules! insert_all {
        ($($n:literal),+) => { $( world.insert(holder, Unique::<$n>); )+ };
    }
    insert_all!(
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
        24, 25, 26, 27, 28, 29, 30
    );
    assert_eq!(world.registered_type_count(), 31);
    assert!(!world.signature_overflowed());

    // The 32nd distinct type trips the overflow diagnostic.
    world.insert(holder, Unique::<31>);
    assert!(world.signature_overflowed());
    assert_eq!(world.registered_type_count(), 32);

    // Every one of the first 31 types remains independently queryable.
    macro_rules! check_all {
        ($($n:literal),+) => {
            $( assert_eq!(world.entities_with::<(Unique<$n>,)>(), vec![holder]); )+
        };
    }
    check_all!(
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
        24, 25, 26, 27, 28, 29, 30
    );
}

// ── Loop-driven lifecycle ────────────────────────────────────────────────

struct FrameCounter {
    frames: Rc<RefCell<u32>>,
}

impl System for FrameCounter {
    fn update(&mut self, _world: &mut World, _dt: f32) {
        *self.frames.borrow_mut() += 1;
    }
}

#[test]
fn loop_drives_world_and_reports_profile() {
    init_logs();
    let mut world = World::new();
    let frames = Rc::new(RefCell::new(0));
    world.add_system(FrameCounter {
        frames: Rc::clone(&frames),
    });

    let mut game_loop = GameLoop::new().with_frame_rate(500);
    game_loop.run_until(&mut world, |_| *frames.borrow() >= 5);

    assert!(!game_loop.is_running());
    assert_eq!(*frames.borrow(), 5);

    let summary = world.profiler().summary();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].name, "FrameCounter");
    assert_eq!(summary[0].samples, 5);
}

#[test]
fn restart_composes_stop_reset_start() {
    let mut world = World::new();
    let survivor = world.spawn();
    world.insert(survivor, Position { x: 0.0, y: 0.0 });

    let frames = Rc::new(RefCell::new(0));
    world.add_system(FrameCounter {
        frames: Rc::clone(&frames),
    });
    world.add_system(GravityLike { gravity: 980.0 });

    let mut game_loop = GameLoop::new().with_frame_rate(500);
    game_loop.run_until(&mut world, |_| *frames.borrow() >= 3);

    // External restart: stop already happened; reset, re-register, start.
    world.reset(survivor);
    world.clear_systems();
    world.add_system(FrameCounter {
        frames: Rc::clone(&frames),
    });

    game_loop.run_until(&mut world, |_| *frames.borrow() >= 6);
    assert!(!game_loop.is_running());
    assert_eq!(world.entity_count(), 1);
    assert_eq!(*frames.borrow(), 6);
}
