//! Game state and core simulation types
//!
//! Everything a running game owns lives in `GameState`; a new game replaces it.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::{ControlMode, MovementStyle};
use crate::tuning::{Difficulty, DifficultyConfig};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    /// Title screen with difficulty/mode pickers
    Menu,
    /// Control hints, waiting for any key or tap
    Instructions,
    /// 3, 2, 1, Go! before play; `remaining == 0` is the "Go!" beat
    Countdown { remaining: u8, timer: f32 },
    /// Active gameplay
    Running,
    /// Game is paused (rendering continues)
    Paused,
    /// Run ended, awaiting name entry
    GameOver,
}

impl GamePhase {
    /// True while the update and collision steps advance
    pub fn is_simulating(&self) -> bool {
        matches!(self, GamePhase::Running)
    }
}

/// A positioned object with a variant payload
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<P = ()> {
    /// Position in cells (x = column, y = row)
    pub pos: Vec2,
    /// Velocity in cells per second
    pub vel: Vec2,
    pub alive: bool,
    pub payload: P,
}

impl<P> Entity<P> {
    pub fn new(pos: Vec2, vel: Vec2, payload: P) -> Self {
        Self {
            pos,
            vel,
            alive: true,
            payload,
        }
    }

    /// Advance position by velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Enemy movement state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyMotion {
    /// Grid step applied on the next enemy tick
    pub step: IVec2,
    /// Spread offset in [-1, 1] used when chasing sideways
    pub fan_index: f32,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    /// +1 life (capped)
    Heal,
    /// Clears all enemy shots
    Pulse,
}

impl PickupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupKind::Heal => "heal",
            PickupKind::Pulse => "pulse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupData {
    pub kind: PickupKind,
    /// Sway phase (radians)
    pub phase: f32,
}

/// Particle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleTint {
    /// Enemy destroyed - yellow/orange
    Spark,
    /// Player struck - red/orange
    Crash,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleData {
    /// Seconds left; doubles as opacity
    pub life: f32,
    /// Radius in pixels at cell size 26
    pub size: f32,
    pub tint: ParticleTint,
}

pub type Ship = Entity<()>;
pub type Enemy = Entity<EnemyMotion>;
pub type Shot = Entity<()>;
pub type Pickup = Entity<PickupData>;
pub type Particle = Entity<ParticleData>;

/// Expanding ring drawn on explosions
#[derive(Debug, Clone, PartialEq)]
pub struct Shockwave {
    pub pos: Vec2,
    /// Current radius (cells)
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    pub tint: ParticleTint,
}

impl Shockwave {
    pub fn is_alive(&self) -> bool {
        self.radius < self.max_radius && self.alpha > 0.02
    }
}

/// The player ship plus its run totals
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub ship: Ship,
    pub lives: u8,
    pub score: u64,
    /// Score multiplier in [MOMENTUM_MIN, MOMENTUM_MAX]
    pub momentum: f32,
    /// Seconds until the next momentum decay step
    pub momentum_timer: f32,
}

impl Player {
    pub fn spawn_position() -> Vec2 {
        Vec2::new(PLAYER_MAX_X, PLAYER_MAX_Y)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            ship: Ship::new(Self::spawn_position(), Vec2::ZERO, ()),
            lives: START_LIVES,
            score: 0,
            momentum: MOMENTUM_MIN,
            momentum_timer: 0.0,
        }
    }
}

/// Per-game timers (seconds accumulated since the last trigger)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timers {
    pub enemy_spawn: f32,
    pub enemy_fire: f32,
    pub player_fire: f32,
    pub player_step: f32,
    pub enemy_step: f32,
}

/// Something the frontend should react to (audio, announcer, haptics)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired,
    EnemyShot,
    EnemyDestroyed { pos: Vec2 },
    PlayerHit { lives_left: u8 },
    PickupDropped(PickupKind),
    PickupCollected(PickupKind),
    WaveAdvanced(u32),
    MomentumChanged(f32),
    CountdownTick(u8),
    Launch,
    Paused,
    Resumed,
    GameOver,
}

/// Rules fixed at game start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub difficulty: Difficulty,
    pub tuning: DifficultyConfig,
    pub mode: ControlMode,
    pub movement: MovementStyle,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(Difficulty::Normal, ControlMode::Desktop, MovementStyle::Grid)
    }
}

impl RunConfig {
    pub fn new(difficulty: Difficulty, mode: ControlMode, movement: MovementStyle) -> Self {
        Self {
            difficulty,
            tuning: difficulty.config(),
            mode,
            movement,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub config: RunConfig,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_shots: Vec<Shot>,
    pub enemy_shots: Vec<Shot>,
    pub pickups: Vec<Pickup>,
    /// Visual only
    pub particles: Vec<Particle>,
    /// Visual only
    pub shockwaves: Vec<Shockwave>,
    /// Spawn particle bursts on explosions
    pub particles_enabled: bool,
    /// Spawn shockwaves on explosions
    pub shockwaves_enabled: bool,
    pub timers: Timers,
    pub kills: u32,
    pub shots_fired: u32,
    pub wave: u32,
    /// Seconds of running (unpaused) play
    pub elapsed: f32,
    /// Simulation steps taken while running
    pub time_ticks: u64,
    /// Events since the frontend last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game on the menu
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, RunConfig::default())
    }

    pub fn with_config(seed: u64, config: RunConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: GamePhase::Menu,
            player: Player::default(),
            enemies: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            shockwaves: Vec::new(),
            particles_enabled: true,
            shockwaves_enabled: true,
            timers: Timers::default(),
            kills: 0,
            shots_fired: 0,
            wave: 1,
            elapsed: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove every dead entity and expired effect
    pub fn sweep(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.player_shots.retain(|s| s.alive);
        self.enemy_shots.retain(|s| s.alive);
        self.pickups.retain(|p| p.alive);
        self.particles.retain(|p| p.alive);
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
        self.shockwaves.retain(Shockwave::is_alive);
        if self.shockwaves.len() > MAX_SHOCKWAVES {
            let excess = self.shockwaves.len() - MAX_SHOCKWAVES;
            self.shockwaves.drain(..excess);
        }
    }

    /// True when no list holds a dead entity
    pub fn all_alive(&self) -> bool {
        self.enemies.iter().all(|e| e.alive)
            && self.player_shots.iter().all(|s| s.alive)
            && self.enemy_shots.iter().all(|s| s.alive)
            && self.pickups.iter().all(|p| p.alive)
            && self.particles.iter().all(|p| p.alive)
    }
}
