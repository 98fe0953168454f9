//! Collision detection and response
//!
//! Every pair is a plain radius check on cell coordinates. All qualifying
//! pairs resolve in the same pass, in no particular order; an entity that
//! died earlier in the pass is skipped.

use glam::Vec2;
use rand::Rng;

use super::session;
use super::state::{
    GameEvent, GamePhase, GameState, Particle, ParticleData, ParticleTint, Pickup, PickupData,
    PickupKind, Shockwave,
};
use crate::consts::*;

/// Max particle speed in a burst (cells/s)
const BURST_SPEED: f32 = 1.8;
/// Shockwave sizes (cells)
const HIT_RING_RADIUS: f32 = 1.2;
const CRASH_RING_RADIUS: f32 = 2.0;

/// True when two points are closer than `radius`
#[inline]
pub fn within_hit_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Resolve every collision for this step
pub fn resolve_collisions(state: &mut GameState) {
    player_shots_vs_enemies(state);
    enemy_shots_vs_player(state);
    enemies_vs_player(state);
    pickups_vs_player(state);
}

fn player_shots_vs_enemies(state: &mut GameState) {
    let mut destroyed = Vec::new();

    for shot in state.player_shots.iter_mut().filter(|s| s.alive) {
        for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
            if within_hit_radius(shot.pos, enemy.pos, HIT_RADIUS) {
                shot.kill();
                enemy.kill();
                destroyed.push(enemy.pos);
                break;
            }
        }
    }

    for pos in destroyed {
        on_enemy_destroyed(state, pos);
    }
}

fn enemy_shots_vs_player(state: &mut GameState) {
    let player_pos = state.player.ship.pos;
    let mut hits = 0;
    for shot in state.enemy_shots.iter_mut().filter(|s| s.alive) {
        if within_hit_radius(shot.pos, player_pos, HIT_RADIUS) {
            shot.kill();
            hits += 1;
        }
    }
    for _ in 0..hits {
        on_player_hit(state, false);
    }
}

fn enemies_vs_player(state: &mut GameState) {
    let player_pos = state.player.ship.pos;
    let mut crashes = 0;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if within_hit_radius(enemy.pos, player_pos, HIT_RADIUS) {
            enemy.kill();
            crashes += 1;
        }
    }
    for _ in 0..crashes {
        on_player_hit(state, true);
    }
}

fn pickups_vs_player(state: &mut GameState) {
    let player_pos = state.player.ship.pos;
    let mut collected = Vec::new();
    for pickup in state.pickups.iter_mut().filter(|p| p.alive) {
        if within_hit_radius(pickup.pos, player_pos, HIT_RADIUS) {
            pickup.kill();
            collected.push(pickup.payload.kind);
        }
    }

    for kind in collected {
        match kind {
            PickupKind::Heal => {
                // No revival once the run is over
                if state.player.lives > 0 {
                    state.player.lives = (state.player.lives + 1).min(MAX_LIVES);
                }
            }
            PickupKind::Pulse => {
                for shot in &mut state.enemy_shots {
                    shot.kill();
                }
            }
        }
        state.events.push(GameEvent::PickupCollected(kind));
    }
}

/// Score, effects, drop and momentum for one kill
fn on_enemy_destroyed(state: &mut GameState, pos: Vec2) {
    // Scored at the multiplier held before this kill
    let gained = (KILL_SCORE * state.player.momentum).floor() as u64;
    state.player.score += gained;
    state.kills += 1;

    spawn_burst(state, pos, ParticleTint::Spark);
    spawn_shockwave(state, pos, HIT_RING_RADIUS, ParticleTint::Spark);
    state.events.push(GameEvent::EnemyDestroyed { pos });

    if state.rng.random_bool(PICKUP_CHANCE) {
        let kind = if state.rng.random_bool(0.5) {
            PickupKind::Heal
        } else {
            PickupKind::Pulse
        };
        let phase = state.rng.random_range(0.0..std::f32::consts::TAU);
        state.pickups.push(Pickup::new(
            pos,
            Vec2::new(0.0, PICKUP_FALL_SPEED),
            PickupData { kind, phase },
        ));
        state.events.push(GameEvent::PickupDropped(kind));
    }

    let player = &mut state.player;
    player.momentum = quantize_momentum(player.momentum + MOMENTUM_STEP);
    player.momentum_timer = MOMENTUM_HOLD_SECS;
    state.events.push(GameEvent::MomentumChanged(player.momentum));
}

/// Apply one hit to the player; `crash` is a body collision with an enemy
fn on_player_hit(state: &mut GameState, crash: bool) {
    let pos = state.player.ship.pos;
    let ring = if crash {
        CRASH_RING_RADIUS
    } else {
        HIT_RING_RADIUS
    };
    spawn_burst(state, pos, ParticleTint::Crash);
    spawn_shockwave(state, pos, ring, ParticleTint::Crash);

    // Later hits in a finishing pass only destroy the offender
    if state.player.lives == 0 || state.phase == GamePhase::GameOver {
        return;
    }

    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.momentum = MOMENTUM_MIN;
    player.momentum_timer = MOMENTUM_HIT_HOLD_SECS;
    let lives_left = player.lives;

    state.events.push(GameEvent::PlayerHit { lives_left });
    state.events.push(GameEvent::MomentumChanged(MOMENTUM_MIN));

    if lives_left == 0 {
        session::enter_game_over(state);
    }
}

/// Clamp to the multiplier range and snap to one decimal
pub(crate) fn quantize_momentum(m: f32) -> f32 {
    ((m * 10.0).round() / 10.0).clamp(MOMENTUM_MIN, MOMENTUM_MAX)
}

fn spawn_burst(state: &mut GameState, pos: Vec2, tint: ParticleTint) {
    if !state.particles_enabled {
        return;
    }
    for _ in 0..BURST_PARTICLES {
        let vel = Vec2::new(
            state.rng.random_range(-BURST_SPEED..BURST_SPEED),
            state.rng.random_range(-BURST_SPEED..BURST_SPEED),
        );
        let data = ParticleData {
            life: state.rng.random_range(0.4..0.9),
            size: state.rng.random_range(1.5..3.5),
            tint,
        };
        state.particles.push(Particle::new(pos, vel, data));
    }
}

fn spawn_shockwave(state: &mut GameState, pos: Vec2, max_radius: f32, tint: ParticleTint) {
    if !state.shockwaves_enabled {
        return;
    }
    state.shockwaves.push(Shockwave {
        pos,
        radius: 0.1,
        max_radius,
        alpha: 1.0,
        tint,
    });
}
