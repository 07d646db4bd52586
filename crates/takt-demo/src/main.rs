//! takt-demo — a headless flappy-style game built on the takt kernel.
//!
//! Runs two short rounds: the first ends in a game over, then the restart
//! path (stop → soft reset + system re-registration → start) runs a second
//! round. Presses come from a script instead of a keyboard; rendering goes
//! to the log (`RUST_LOG=debug` or `trace` for more detail).

mod components;
mod surface;
mod systems;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use log::info;
use takt::notify::Channel;
use takt::prelude::*;

use components::{AffectedByGravity, Bird, Color, Game, GameState, Position, Size, Sprite, Velocity};
use surface::LogSurface;
use systems::{
    CollisionSystem, GameControllerSystem, GravitySystem, InputSystem, MovementSystem,
    PipeSpawnerSystem, RenderSystem, ScoringSystem,
};

const PLAYFIELD_WIDTH: f32 = 400.0;
const PLAYFIELD_HEIGHT: f32 = 600.0;
const MAX_ROUND_SECS: f32 = 20.0;

// ── Factories ────────────────────────────────────────────────────────────

fn create_bird(world: &mut World) -> EntityId {
    let bird = world.spawn();
    world.insert(bird, Position(Vec2::new(80.0, PLAYFIELD_HEIGHT / 2.0)));
    world.insert(bird, Velocity(Vec2::ZERO));
    world.insert(bird, Size(Vec2::new(34.0, 24.0)));
    world.insert(bird, Sprite { color: Color::Yellow });
    world.insert(bird, AffectedByGravity);
    world.insert(bird, Bird);
    bird
}

fn create_game(world: &mut World) -> EntityId {
    let game = world.spawn();
    world.insert(
        game,
        Game {
            state: GameState::Ready,
            score: 0,
        },
    );
    game
}

// ── Wiring ───────────────────────────────────────────────────────────────

/// Build the system sequence in its load-bearing order and register it.
/// Called once at startup and again after every soft reset.
fn register_systems(
    world: &mut World,
    game_entity: EntityId,
    bird_entity: EntityId,
    press_script: Vec<f32>,
    state_channel: &Rc<RefCell<Channel<GameState>>>,
    score_channel: &Rc<RefCell<Channel<u32>>>,
) {
    world.add_system(InputSystem::new(bird_entity, press_script));
    world.add_system(PipeSpawnerSystem::new(game_entity));
    world.add_system(GravitySystem::new());
    world.add_system(MovementSystem);
    world.add_system(ScoringSystem::new(game_entity, bird_entity));
    world.add_system(CollisionSystem::new(game_entity));
    world.add_system(GameControllerSystem::new(
        game_entity,
        Rc::clone(state_channel),
        Rc::clone(score_channel),
    ));
    world.add_system(RenderSystem::new(
        game_entity,
        Box::new(LogSurface::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)),
    ));
}

fn play_round(game_loop: &mut GameLoop, world: &mut World, game_entity: EntityId) {
    if let Some(game) = world.get_mut::<Game>(game_entity) {
        game.state = GameState::Running;
    }

    let mut elapsed = 0.0f32;
    game_loop.run_until(world, |world| {
        elapsed += 1.0 / 60.0;
        let over = world.get::<Game>(game_entity).map(|g| g.state) == Some(GameState::GameOver);
        over || elapsed >= MAX_ROUND_SECS
    });

    let score = world.get::<Game>(game_entity).map(|g| g.score).unwrap_or(0);
    info!("round finished with score {score}");
}

fn main() {
    env_logger::init();

    let mut world = World::new();
    let mut game_loop = GameLoop::new();

    let state_channel = Rc::new(RefCell::new(Channel::new(GameState::Ready)));
    let score_channel = Rc::new(RefCell::new(Channel::new(0u32)));

    // A presentation layer would subscribe the same way.
    state_channel
        .borrow_mut()
        .subscribe(|state| info!("state changed: {state:?}"));
    score_channel
        .borrow_mut()
        .subscribe(|score| info!("score changed: {score}"));

    let bird_entity = create_bird(&mut world);
    let game_entity = create_game(&mut world);
    register_systems(
        &mut world,
        game_entity,
        bird_entity,
        // Flap roughly three times a second for a few seconds, then drop.
        vec![0.2, 0.5, 0.8, 1.1, 1.4, 1.7, 2.0, 2.3, 2.6, 2.9, 3.2],
        &state_channel,
        &score_channel,
    );

    play_round(&mut game_loop, &mut world, game_entity);

    // Restart path: the loop already stopped; keep the game entity, clear
    // everything else, rebuild the system sequence, go again.
    info!("restarting");
    world.reset(game_entity);
    world.clear_systems();
    if let Some(game) = world.get_mut::<Game>(game_entity) {
        game.score = 0;
    }
    let bird_entity = create_bird(&mut world);
    register_systems(
        &mut world,
        game_entity,
        bird_entity,
        vec![0.3, 0.7, 1.1, 1.5],
        &state_channel,
        &score_channel,
    );

    play_round(&mut game_loop, &mut world, game_entity);
}
