//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Input arrives as a polled `TickInput` snapshot

pub mod collision;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{resolve_collisions, within_hit_radius};
pub use session::GameStats;
pub use state::{
    Enemy, EnemyMotion, Entity, GameEvent, GamePhase, GameState, Particle, ParticleData,
    ParticleTint, Pickup, PickupData, PickupKind, Player, RunConfig, Shockwave, Shot,
};
pub use tick::{FrameClock, TickInput, tick};
