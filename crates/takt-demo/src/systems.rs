//! The demo's gameplay systems. Registration order is load-bearing:
//! input → pipe spawner → gravity → movement → scoring → collision →
//! controller → render.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use log::{debug, error, info};
use rand::Rng;
use takt::notify::Channel;
use takt::prelude::*;

use crate::components::{
    AffectedByGravity, Bird, Color, Game, GameOver, GameState, Pipe, Position, Scored, Size,
    Sprite, Velocity, Viewport,
};
use crate::surface::Surface;

// ── Input ────────────────────────────────────────────────────────────────

/// Replays a scripted sequence of press timestamps against the bird,
/// standing in for an asynchronous keyboard/pointer source. Each press is
/// applied exactly once.
pub struct InputSystem {
    player: EntityId,
    script: Vec<f32>,
    cursor: usize,
    clock: f32,
    jump_strength: f32,
}

impl InputSystem {
    pub fn new(player: EntityId, mut script: Vec<f32>) -> Self {
        script.sort_by(|a, b| a.total_cmp(b));
        Self {
            player,
            script,
            cursor: 0,
            clock: 0.0,
            jump_strength: 350.0,
        }
    }
}

impl System for InputSystem {
    fn initialize(&mut self, _world: &mut World) {
        info!("input source attached ({} scripted presses)", self.script.len());
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.clock += dt;
        while self.cursor < self.script.len() && self.script[self.cursor] <= self.clock {
            self.cursor += 1;
            if let Some(velocity) = world.get_mut::<Velocity>(self.player) {
                velocity.0.y = -self.jump_strength;
            }
        }
    }

    fn destroy(&mut self) {
        info!("input source detached");
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.clock = 0.0;
    }
}

// ── Pipe spawning ────────────────────────────────────────────────────────

pub struct PipeSpawnerSystem {
    game_entity: EntityId,
    viewport: Vec2,
    pipe_width: f32,
    gap_height: f32,
    pipe_speed: f32,
    spawn_interval: f32,
    since_last_spawn: f32,
    min_pipe_height: f32,
}

impl PipeSpawnerSystem {
    pub fn new(game_entity: EntityId) -> Self {
        Self {
            game_entity,
            viewport: Vec2::ZERO,
            pipe_width: 80.0,
            gap_height: 220.0,
            pipe_speed: 150.0,
            spawn_interval: 2.5,
            // First pipe pair spawns on the first frame.
            since_last_spawn: 2.5,
            min_pipe_height: 50.0,
        }
    }

    fn spawn_pair(&self, world: &mut World) {
        let max_top = self.viewport.y - self.gap_height - self.min_pipe_height;
        let top_height = rand::thread_rng().gen_range(self.min_pipe_height..=max_top);
        let bottom_height = self.viewport.y - top_height - self.gap_height;
        let x = self.viewport.x;

        let top = world.spawn();
        world.insert(top, Position(Vec2::new(x, 0.0)));
        world.insert(top, Size(Vec2::new(self.pipe_width, top_height)));
        world.insert(top, Sprite { color: Color::Green });
        world.insert(top, Velocity(Vec2::new(-self.pipe_speed, 0.0)));
        world.insert(top, Pipe);

        let bottom = world.spawn();
        world.insert(bottom, Position(Vec2::new(x, top_height + self.gap_height)));
        world.insert(bottom, Size(Vec2::new(self.pipe_width, bottom_height)));
        world.insert(bottom, Sprite { color: Color::Green });
        world.insert(bottom, Velocity(Vec2::new(-self.pipe_speed, 0.0)));
        world.insert(bottom, Pipe);

        debug!("spawned pipe pair, gap at {top_height:.0}..{:.0}", top_height + self.gap_height);
    }
}

impl System for PipeSpawnerSystem {
    fn post_initialize(&mut self, world: &mut World) {
        // The render system publishes the viewport during its own
        // initialize, which runs after ours — hence the second phase.
        match world.get::<Viewport>(self.game_entity) {
            Some(viewport) => self.viewport = Vec2::new(viewport.width, viewport.height),
            None => error!("viewport missing; pipe spawner disabled"),
        }
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        if self.viewport == Vec2::ZERO {
            return;
        }
        self.since_last_spawn += dt;
        if self.since_last_spawn >= self.spawn_interval {
            self.since_last_spawn = 0.0;
            self.spawn_pair(world);
        }

        // Retire pipes that scrolled off the left edge.
        for id in world.entities_with::<(Pipe, Position, Size)>() {
            let gone = world
                .get::<Position>(id)
                .zip(world.get::<Size>(id))
                .is_some_and(|(pos, size)| pos.0.x + size.0.x < 0.0);
            if gone {
                world.despawn(id);
            }
        }
    }

    fn reset(&mut self) {
        self.since_last_spawn = self.spawn_interval;
    }
}

// ── Physics ──────────────────────────────────────────────────────────────

/// Integrates gravity into vertical velocity. Pixels per second squared.
pub struct GravitySystem {
    gravity: f32,
}

impl GravitySystem {
    pub fn new() -> Self {
        Self { gravity: 980.0 }
    }
}

impl System for GravitySystem {
    fn update(&mut self, world: &mut World, dt: f32) {
        for id in world.entities_with::<(Velocity, AffectedByGravity)>() {
            if let Some(velocity) = world.get_mut::<Velocity>(id) {
                velocity.0.y += self.gravity * dt;
            }
        }
    }
}

/// Integrates velocity into position. Runs after gravity so a frame
/// integrates the post-gravity velocity.
pub struct MovementSystem;

impl System for MovementSystem {
    fn update(&mut self, world: &mut World, dt: f32) {
        for id in world.entities_with::<(Position, Velocity)>() {
            let Some(velocity) = world.get::<Velocity>(id) else {
                continue;
            };
            let step = velocity.0 * dt;
            if let Some(position) = world.get_mut::<Position>(id) {
                position.0 += step;
            }
        }
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────

/// Credits a point when the bird's leading edge passes a pipe's trailing
/// edge; each pipe scores at most once.
pub struct ScoringSystem {
    game_entity: EntityId,
    bird_entity: EntityId,
}

impl ScoringSystem {
    pub fn new(game_entity: EntityId, bird_entity: EntityId) -> Self {
        Self {
            game_entity,
            bird_entity,
        }
    }
}

impl System for ScoringSystem {
    fn update(&mut self, world: &mut World, _dt: f32) {
        if world.get::<Game>(self.game_entity).map(|g| g.state) != Some(GameState::Running) {
            return;
        }
        let Some(bird_x) = world.get::<Position>(self.bird_entity).map(|p| p.0.x) else {
            return;
        };

        let mut earned = 0;
        for id in world.entities_with::<(Pipe, Position, Size)>() {
            if world.has::<Scored>(id) {
                continue;
            }
            let passed = world
                .get::<Position>(id)
                .zip(world.get::<Size>(id))
                .is_some_and(|(pos, size)| bird_x > pos.0.x + size.0.x);
            if passed {
                earned += 1;
                world.insert(id, Scored);
            }
        }
        if earned > 0 {
            if let Some(game) = world.get_mut::<Game>(self.game_entity) {
                game.score += earned;
            }
        }
    }
}

// ── Collision ────────────────────────────────────────────────────────────

/// Clamps the bird to the playfield and detects bird/pipe overlap; a hit
/// attaches [`GameOver`] to the bird for the controller to pick up.
pub struct CollisionSystem {
    game_entity: EntityId,
    viewport: Vec2,
}

impl CollisionSystem {
    pub fn new(game_entity: EntityId) -> Self {
        Self {
            game_entity,
            viewport: Vec2::ZERO,
        }
    }

    fn overlaps(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
        a_pos.x < b_pos.x + b_size.x
            && a_pos.x + a_size.x > b_pos.x
            && a_pos.y < b_pos.y + b_size.y
            && a_pos.y + a_size.y > b_pos.y
    }
}

impl System for CollisionSystem {
    fn post_initialize(&mut self, world: &mut World) {
        match world.get::<Viewport>(self.game_entity) {
            Some(viewport) => self.viewport = Vec2::new(viewport.width, viewport.height),
            None => error!("viewport missing; collision system disabled"),
        }
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        if self.viewport == Vec2::ZERO {
            return;
        }
        let birds = world.entities_with::<(Bird, Position, Velocity, Size)>();
        let Some(&bird) = birds.first() else {
            return;
        };
        let Some(size) = world.get::<Size>(bird).map(|s| s.0) else {
            return;
        };

        let mut hit = false;

        // Ground and ceiling.
        let ground = self.viewport.y - size.y;
        if let Some(position) = world.get_mut::<Position>(bird) {
            if position.0.y > ground {
                position.0.y = ground;
                hit = true;
            }
            if position.0.y < 0.0 {
                position.0.y = 0.0;
                hit = true;
            }
        }
        if hit {
            if let Some(velocity) = world.get_mut::<Velocity>(bird) {
                velocity.0.y = 0.0;
            }
        }

        // Pipes.
        let bird_pos = match world.get::<Position>(bird) {
            Some(p) => p.0,
            None => return,
        };
        if !hit {
            for id in world.entities_with::<(Pipe, Position, Size)>() {
                let collided = world
                    .get::<Position>(id)
                    .zip(world.get::<Size>(id))
                    .is_some_and(|(pos, sz)| Self::overlaps(bird_pos, size, pos.0, sz.0));
                if collided {
                    hit = true;
                    break;
                }
            }
        }

        if hit && !world.has::<GameOver>(bird) {
            world.insert(bird, GameOver);
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────────

/// Recomputes authoritative game state each frame and pushes it into the
/// notification channels (which only fan out actual changes).
pub struct GameControllerSystem {
    game_entity: EntityId,
    state_channel: Rc<RefCell<Channel<GameState>>>,
    score_channel: Rc<RefCell<Channel<u32>>>,
}

impl GameControllerSystem {
    pub fn new(
        game_entity: EntityId,
        state_channel: Rc<RefCell<Channel<GameState>>>,
        score_channel: Rc<RefCell<Channel<u32>>>,
    ) -> Self {
        Self {
            game_entity,
            state_channel,
            score_channel,
        }
    }
}

impl System for GameControllerSystem {
    fn update(&mut self, world: &mut World, _dt: f32) {
        let running =
            world.get::<Game>(self.game_entity).map(|g| g.state) == Some(GameState::Running);
        if running && !world.entities_with::<(Bird, GameOver)>().is_empty() {
            if let Some(game) = world.get_mut::<Game>(self.game_entity) {
                game.state = GameState::GameOver;
            }
            info!("game over");
        }

        if let Some(game) = world.get::<Game>(self.game_entity) {
            let (state, score) = (game.state, game.score);
            self.state_channel.borrow_mut().publish(state);
            self.score_channel.borrow_mut().publish(score);
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Clears the surface and draws one rectangle per visible entity, in query
/// order. Publishes the surface dimensions as the shared [`Viewport`] so
/// later phases can size the playfield.
pub struct RenderSystem {
    game_entity: EntityId,
    surface: Box<dyn Surface>,
}

impl RenderSystem {
    pub fn new(game_entity: EntityId, surface: Box<dyn Surface>) -> Self {
        Self {
            game_entity,
            surface,
        }
    }
}

impl System for RenderSystem {
    fn initialize(&mut self, world: &mut World) {
        world.insert(
            self.game_entity,
            Viewport {
                width: self.surface.width(),
                height: self.surface.height(),
            },
        );
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.surface.clear();
        for id in world.entities_with::<(Position, Size, Sprite)>() {
            let drawable = world
                .get::<Position>(id)
                .zip(world.get::<Size>(id))
                .zip(world.get::<Sprite>(id));
            if let Some(((pos, size), sprite)) = drawable {
                self.surface
                    .fill_rect(pos.0.x, pos.0.y, size.0.x, size.0.y, sprite.color);
            }
        }
    }
}
