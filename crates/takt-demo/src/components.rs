//! Component definitions for the demo game. Plain data records — all
//! behavior lives in the systems.

use std::fmt;

use glam::Vec2;

pub struct Position(pub Vec2);
pub struct Velocity(pub Vec2);
pub struct Size(pub Vec2);

/// Marks an entity whose vertical velocity the gravity system integrates.
pub struct AffectedByGravity;

/// The player avatar.
pub struct Bird;

/// An obstacle column.
pub struct Pipe;

/// Marks a pipe the player has already been credited for.
pub struct Scored;

/// Added to the bird when a fatal collision is detected; the controller
/// system reacts to it on the same frame.
pub struct GameOver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Yellow,
    Green,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Yellow => write!(f, "yellow"),
            Color::Green => write!(f, "green"),
        }
    }
}

pub struct Sprite {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ready,
    Running,
    GameOver,
}

/// Global game state, attached to the dedicated persistent game entity —
/// the survivor of every soft reset.
pub struct Game {
    pub state: GameState,
    pub score: u32,
}

/// Playfield dimensions, written by the render system during `initialize`
/// and read by other systems in `post_initialize`.
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}
