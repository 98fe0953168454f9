//! Space Game - a grid arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, update step, collisions, session phases)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input folding and service worker registration
//! - `persistence`: Key/value storage (LocalStorage on web, memory elsewhere)
//! - `tuning`: Difficulty tables

pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use leaderboard::Leaderboard;
pub use settings::{ControlMode, Dimension, MovementStyle, Settings};
pub use tuning::{Difficulty, DifficultyConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions in cells
    pub const GRID_COLS: u32 = 16;
    pub const GRID_ROWS: u32 = 24;

    /// Player movement box (inclusive, in cells)
    pub const PLAYER_MIN_X: f32 = 1.0;
    pub const PLAYER_MAX_X: f32 = GRID_COLS as f32 - 2.0;
    pub const PLAYER_MIN_Y: f32 = 6.0;
    pub const PLAYER_MAX_Y: f32 = GRID_ROWS as f32 - 2.0;

    /// Distance below which two entities touch (cells)
    pub const HIT_RADIUS: f32 = 0.7;

    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;

    /// Base points per kill, scaled by momentum
    pub const KILL_SCORE: f32 = 120.0;
    /// Kills needed per wave
    pub const KILLS_PER_WAVE: u32 = 12;

    /// Momentum multiplier bounds and dynamics
    pub const MOMENTUM_MIN: f32 = 1.0;
    pub const MOMENTUM_MAX: f32 = 4.0;
    pub const MOMENTUM_STEP: f32 = 0.1;
    /// Grace period after a kill before momentum starts decaying
    pub const MOMENTUM_HOLD_SECS: f32 = 1.6;
    /// Interval between decay steps
    pub const MOMENTUM_DECAY_SECS: f32 = 0.4;
    /// Grace period after the player is hit
    pub const MOMENTUM_HIT_HOLD_SECS: f32 = 0.8;

    /// Held-fire period on desktop and mobile
    pub const DESKTOP_FIRE_PERIOD: f32 = 0.2;
    pub const MOBILE_FIRE_PERIOD: f32 = 0.14;

    /// Chance for each enemy to shoot on a volley tick
    pub const ENEMY_FIRE_CHANCE: f64 = 0.35;
    /// Chance a descending enemy turns to chase sideways
    pub const ENEMY_TURN_CHANCE: f64 = 0.25;

    /// Pickups
    pub const PICKUP_CHANCE: f64 = 0.16;
    pub const PICKUP_FALL_SPEED: f32 = 1.6;

    /// Visual effect caps
    pub const MAX_PARTICLES: usize = 120;
    pub const BURST_PARTICLES: usize = 16;
    pub const MAX_SHOCKWAVES: usize = 32;

    /// Countdown before play starts
    pub const COUNTDOWN_FROM: u8 = 3;
    pub const COUNTDOWN_STEP_SECS: f32 = 0.55;
}

/// Clamp a position into the player's movement box
#[inline]
pub fn clamp_to_player_box(pos: Vec2) -> Vec2 {
    use consts::*;
    Vec2::new(
        pos.x.clamp(PLAYER_MIN_X, PLAYER_MAX_X),
        pos.y.clamp(PLAYER_MIN_Y, PLAYER_MAX_Y),
    )
}

/// Sanitize a raw input axis into [-1, 1]; NaN and infinities become 0
#[inline]
pub fn sanitize_axis(v: f32) -> f32 {
    if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
}
