//! Fixed timestep simulation tick
//!
//! One call advances the game by `dt` seconds: timers, movement, firing,
//! integration, bounds, momentum, then collisions and the sweep.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::collision::{quantize_momentum, resolve_collisions};
use super::session;
use super::state::{Enemy, EnemyMotion, GameEvent, GamePhase, GameState, Shot};
use crate::consts::*;
use crate::settings::MovementStyle;
use crate::{clamp_to_player_box, sanitize_axis};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired move direction, each axis in [-1, 1] (+y is down)
    pub direction: Vec2,
    /// Fire held (auto-fire)
    pub firing: bool,
    /// Fire went down since the last tick
    pub fire_pressed: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Direction with out-of-range and non-finite components cleaned up
    pub fn sanitized_direction(&self) -> Vec2 {
        Vec2::new(
            sanitize_axis(self.direction.x),
            sanitize_axis(self.direction.y),
        )
    }
}

/// Turns frame deltas into a whole number of fixed steps
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Add one frame's elapsed time and return how many `SIM_DT` steps to run.
    /// Time left over at the substep cap is dropped, never carried.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let steps = ((self.accumulator / SIM_DT) as u32).min(MAX_SUBSTEPS);
        self.accumulator -= steps as f32 * SIM_DT;
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Unconsumed time
    pub fn backlog(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        session::toggle_pause(state);
    }

    if let GamePhase::Countdown { .. } = state.phase {
        session::advance_countdown(state, dt);
    } else if state.phase.is_simulating() {
        step(state, input, dt);
    }
}

fn step(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.elapsed += dt;

    let direction = input.sanitized_direction();

    spawn_enemies(state, dt);
    enemy_volley(state, dt);
    player_fire(state, input, dt);
    move_player(state, direction, dt);
    step_enemies(state, dt);
    integrate(state, dt);
    mark_out_of_bounds(state);
    decay_momentum(state, dt);

    resolve_collisions(state);
    update_wave(state);
    state.sweep();
}

fn spawn_enemies(state: &mut GameState, dt: f32) {
    let interval = state.config.tuning.enemy_spawn_secs();
    state.timers.enemy_spawn += dt;
    if state.timers.enemy_spawn < interval {
        return;
    }
    state.timers.enemy_spawn -= interval;

    let col = state.rng.random_range(1..GRID_COLS - 1) as f32;
    let fan_index = state.rng.random_range(-1.0..=1.0);
    state.enemies.push(Enemy::new(
        Vec2::new(col, 0.0),
        Vec2::ZERO,
        EnemyMotion {
            step: IVec2::new(0, 1),
            fan_index,
        },
    ));
}

fn enemy_volley(state: &mut GameState, dt: f32) {
    let tuning = state.config.tuning;
    state.timers.enemy_fire += dt;
    if state.timers.enemy_fire < tuning.enemy_fire_secs() {
        return;
    }
    state.timers.enemy_fire = 0.0;

    let player_x = state.player.ship.pos.x;
    let speed = tuning.enemy_shot_speed();
    let mut fired = false;

    for enemy in state.enemies.iter().filter(|e| e.alive) {
        if !state.rng.random_bool(ENEMY_FIRE_CHANCE) {
            continue;
        }
        let lean = (player_x - enemy.pos.x).clamp(-1.0, 1.0) * tuning.bias;
        state.enemy_shots.push(Shot::new(
            enemy.pos + Vec2::new(0.0, 0.5),
            Vec2::new(lean, speed),
            (),
        ));
        fired = true;
    }

    if fired {
        state.events.push(GameEvent::EnemyShot);
    }
}

fn player_fire(state: &mut GameState, input: &TickInput, dt: f32) {
    let period = state.config.mode.fire_period();

    if input.fire_pressed {
        state.timers.player_fire = 0.0;
        fire_player_shot(state);
    } else if input.firing {
        state.timers.player_fire += dt;
        if state.timers.player_fire >= period {
            state.timers.player_fire -= period;
            fire_player_shot(state);
        }
    } else {
        state.timers.player_fire = 0.0;
    }
}

fn fire_player_shot(state: &mut GameState) {
    let speed = state.config.tuning.player_shot_speed();
    state.player_shots.push(Shot::new(
        state.player.ship.pos - Vec2::new(0.0, 1.0),
        Vec2::new(0.0, -speed),
        (),
    ));
    state.shots_fired += 1;
    state.events.push(GameEvent::ShotFired);
}

/// One grid step from a direction: the dominant axis wins, ties go to x
pub fn grid_step(direction: Vec2) -> IVec2 {
    if direction == Vec2::ZERO {
        IVec2::ZERO
    } else if direction.x.abs() >= direction.y.abs() {
        IVec2::new(direction.x.signum() as i32, 0)
    } else {
        IVec2::new(0, direction.y.signum() as i32)
    }
}

fn move_player(state: &mut GameState, direction: Vec2, dt: f32) {
    let tuning = state.config.tuning;
    let ship = &mut state.player.ship;

    match state.config.movement {
        MovementStyle::Grid => {
            let interval = tuning.player_step_secs();
            // Saturate so a fresh press moves at once
            state.timers.player_step = (state.timers.player_step + dt).min(interval);
            ship.vel = Vec2::ZERO;

            let step = grid_step(direction);
            if step == IVec2::ZERO || state.timers.player_step < interval {
                return;
            }
            state.timers.player_step = 0.0;
            ship.pos = clamp_to_player_box(ship.pos + step.as_vec2());
        }
        MovementStyle::Continuous => {
            ship.vel = direction.normalize_or_zero() * tuning.continuous_speed();
            ship.pos = clamp_to_player_box(ship.pos + ship.vel * dt);
        }
    }
}

fn step_enemies(state: &mut GameState, dt: f32) {
    let tuning = state.config.tuning;
    state.timers.enemy_step += dt;
    if state.timers.enemy_step < tuning.enemy_step_secs() {
        return;
    }
    state.timers.enemy_step = 0.0;

    let player_x = state.player.ship.pos.x;
    let max_col = GRID_COLS as f32 - 2.0;

    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        let motion = &mut enemy.payload;
        if motion.step.y != 0 {
            enemy.pos.y += motion.step.y as f32;

            if state.rng.random_bool(ENEMY_TURN_CHANCE) {
                let target = (player_x + motion.fan_index * tuning.fan_spread).round();
                let dx = target - enemy.pos.x;
                let side = if dx > 0.0 {
                    1
                } else if dx < 0.0 {
                    -1
                } else if state.rng.random_bool(0.5) {
                    1
                } else {
                    -1
                };
                motion.step = IVec2::new(side, 0);
            }
        } else {
            enemy.pos.x = (enemy.pos.x + motion.step.x as f32).clamp(1.0, max_col);
            motion.step = IVec2::new(0, 1);
        }
    }
}

fn integrate(state: &mut GameState, dt: f32) {
    for shot in state
        .player_shots
        .iter_mut()
        .chain(state.enemy_shots.iter_mut())
    {
        shot.integrate(dt);
    }

    for pickup in &mut state.pickups {
        pickup.integrate(dt);
        pickup.payload.phase += dt * 6.0;
        // 0.01 cells per 60 Hz frame
        pickup.pos.x += pickup.payload.phase.sin() * 0.01 * dt * 60.0;
    }

    let shrink = 0.98f32.powf(dt * 60.0);
    for particle in &mut state.particles {
        particle.integrate(dt);
        particle.payload.life -= dt;
        particle.payload.size *= shrink;
        if particle.payload.life <= 0.0 {
            particle.kill();
        }
    }

    let fade = 0.96f32.powf(dt * 60.0);
    for wave in &mut state.shockwaves {
        wave.radius += wave.max_radius * 2.5 * dt;
        wave.alpha *= fade;
    }
}

fn mark_out_of_bounds(state: &mut GameState) {
    let rows = GRID_ROWS as f32;
    let cols = GRID_COLS as f32;

    for shot in &mut state.player_shots {
        if shot.pos.y <= -1.0 {
            shot.kill();
        }
    }
    for shot in &mut state.enemy_shots {
        if shot.pos.y >= rows + 1.0 || shot.pos.x < -1.0 || shot.pos.x > cols + 1.0 {
            shot.kill();
        }
    }
    for enemy in &mut state.enemies {
        if enemy.pos.y >= rows + 1.0 {
            enemy.kill();
        }
    }
    for pickup in &mut state.pickups {
        if pickup.pos.y >= rows {
            pickup.kill();
        }
    }
}

fn decay_momentum(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    if player.momentum <= MOMENTUM_MIN {
        return;
    }
    player.momentum_timer -= dt;
    if player.momentum_timer > 0.0 {
        return;
    }
    player.momentum = quantize_momentum(player.momentum - MOMENTUM_STEP);
    player.momentum_timer = MOMENTUM_DECAY_SECS;
    state
        .events
        .push(GameEvent::MomentumChanged(player.momentum));
}

/// Wave number for a kill count
pub fn wave_for_kills(kills: u32) -> u32 {
    kills / KILLS_PER_WAVE + 1
}

fn update_wave(state: &mut GameState) {
    let wave = wave_for_kills(state.kills);
    if wave != state.wave {
        state.wave = wave;
        state.events.push(GameEvent::WaveAdvanced(wave));
        log::info!("Wave {}", wave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ControlMode;
    use crate::sim::state::{Pickup, PickupData, PickupKind, RunConfig};
    use crate::tuning::Difficulty;
    use proptest::prelude::*;

    fn running(movement: MovementStyle) -> GameState {
        let config = RunConfig::new(Difficulty::Normal, ControlMode::Desktop, movement);
        let mut state = GameState::with_config(12345, config);
        state.phase = GamePhase::Running;
        state
    }

    fn run_for(state: &mut GameState, input: &TickInput, secs: f32) {
        let steps = (secs / SIM_DT).round() as u32;
        for _ in 0..steps {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_frame_clock_backlog_stays_bounded() {
        let mut clock = FrameClock::default();
        // A long run of 10 fps frames
        for _ in 0..600 {
            assert_eq!(clock.advance(0.1), MAX_SUBSTEPS);
            assert!(clock.backlog() <= SIM_DT + 1e-6);
        }
        // Frame rate recovers: no fast-forward burst
        let steps = clock.advance(1.0 / 60.0);
        assert!(steps <= 3, "ran {} steps after recovery", steps);
    }

    #[test]
    fn test_frame_clock_steady_rate() {
        let mut clock = FrameClock::default();
        let total: u32 = (0..60).map(|_| clock.advance(1.0 / 60.0)).sum();
        assert!((119..=120).contains(&total));
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_menu_does_not_simulate() {
        let mut state = GameState::new(1);
        run_for(&mut state, &TickInput::default(), 2.0);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_tick_pause() {
        let mut state = running(MovementStyle::Grid);
        run_for(&mut state, &TickInput::default(), 1.0);
        assert!(!state.enemies.is_empty());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen_ticks = state.time_ticks;
        let frozen_enemies: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        let firing = TickInput {
            firing: true,
            direction: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        run_for(&mut state, &firing, 1.0);
        assert_eq!(state.time_ticks, frozen_ticks);
        assert_eq!(
            state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(),
            frozen_enemies
        );
        assert!(state.player_shots.is_empty());

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_countdown_reaches_running() {
        let mut state = GameState::new(9);
        session::start(&mut state, &crate::Settings::default());
        session::proceed(&mut state);
        assert!(matches!(state.phase, GamePhase::Countdown { remaining: 3, .. }));

        // Pause is ignored during the countdown
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert!(matches!(state.phase, GamePhase::Countdown { .. }));

        run_for(&mut state, &TickInput::default(), 4.0 * COUNTDOWN_STEP_SECS + 0.1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_fire_pressed_fires_immediately() {
        let mut state = running(MovementStyle::Grid);
        let press = TickInput {
            fire_pressed: true,
            firing: true,
            ..Default::default()
        };
        tick(&mut state, &press, SIM_DT);
        assert_eq!(state.shots_fired, 1);
        let shot = &state.player_shots[0];
        assert_eq!(shot.pos.x, state.player.ship.pos.x);
        assert!(shot.vel.y < 0.0);
        assert!(state.events.contains(&GameEvent::ShotFired));
    }

    #[test]
    fn test_held_fire_rate_by_mode() {
        let hold = TickInput {
            firing: true,
            ..Default::default()
        };

        let mut desktop = running(MovementStyle::Grid);
        run_for(&mut desktop, &hold, 1.0);
        // 1.0 / 0.2
        assert!((4..=5).contains(&desktop.shots_fired));

        let config = RunConfig::new(Difficulty::Normal, ControlMode::Mobile, MovementStyle::Grid);
        let mut mobile = GameState::with_config(12345, config);
        mobile.phase = GamePhase::Running;
        run_for(&mut mobile, &hold, 1.0);
        // 1.0 / 0.14
        assert!((6..=7).contains(&mobile.shots_fired));
    }

    #[test]
    fn test_grid_step_dominant_axis() {
        assert_eq!(grid_step(Vec2::ZERO), IVec2::ZERO);
        assert_eq!(grid_step(Vec2::new(0.3, -0.9)), IVec2::new(0, -1));
        assert_eq!(grid_step(Vec2::new(-0.8, 0.2)), IVec2::new(-1, 0));
        // Ties go to x
        assert_eq!(grid_step(Vec2::new(1.0, 1.0)), IVec2::new(1, 0));
    }

    /// Run with hostiles removed so the ship survives
    fn run_quiet(state: &mut GameState, input: &TickInput, secs: f32) {
        let steps = (secs / SIM_DT).round() as u32;
        for _ in 0..steps {
            tick(state, input, SIM_DT);
            state.enemies.clear();
            state.enemy_shots.clear();
        }
    }

    #[test]
    fn test_grid_movement_clamps_to_box() {
        let mut state = running(MovementStyle::Grid);
        run_quiet(&mut state, &TickInput::default(), 0.5);

        let up = TickInput {
            direction: Vec2::new(0.0, -1.0),
            ..Default::default()
        };
        // A fresh press moves at once, then waits a full step
        tick(&mut state, &up, SIM_DT);
        assert_eq!(state.player.ship.pos.y, PLAYER_MAX_Y - 1.0);
        tick(&mut state, &up, SIM_DT);
        assert_eq!(state.player.ship.pos.y, PLAYER_MAX_Y - 1.0);

        let left = TickInput {
            direction: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        run_quiet(&mut state, &left, 5.0);
        assert_eq!(state.player.ship.pos.x, PLAYER_MIN_X);
        assert_eq!(state.player.ship.pos.y, PLAYER_MAX_Y - 1.0);
    }

    #[test]
    fn test_continuous_movement() {
        let mut state = running(MovementStyle::Continuous);
        let start = state.player.ship.pos;
        let left = TickInput {
            direction: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        run_quiet(&mut state, &left, 0.1);
        let expected = start.x - state.config.tuning.continuous_speed() * 0.1;
        assert!((state.player.ship.pos.x - expected).abs() < 0.05);

        run_quiet(&mut state, &left, 5.0);
        assert_eq!(state.player.ship.pos.x, PLAYER_MIN_X);
    }

    #[test]
    fn test_garbage_direction_is_ignored() {
        let mut state = running(MovementStyle::Continuous);
        let start = state.player.ship.pos;
        let junk = TickInput {
            direction: Vec2::new(f32::NAN, f32::INFINITY),
            ..Default::default()
        };
        run_for(&mut state, &junk, 0.5);
        assert_eq!(state.player.ship.pos, start);
    }

    #[test]
    fn test_enemies_spawn_and_descend() {
        let mut state = running(MovementStyle::Grid);
        run_for(&mut state, &TickInput::default(), 2.0);
        assert!(!state.enemies.is_empty());
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= 1.0 && enemy.pos.x <= GRID_COLS as f32 - 2.0);
            assert!(enemy.pos.y >= 0.0);
        }
        assert!(state.enemies.iter().any(|e| e.pos.y > 0.0));
    }

    #[test]
    fn test_enemy_shot_leans_toward_player() {
        let mut state = running(MovementStyle::Grid);
        state.enemies.push(Enemy::new(
            Vec2::new(3.0, 2.0),
            Vec2::ZERO,
            EnemyMotion {
                step: IVec2::new(0, 1),
                fan_index: 0.0,
            },
        ));
        // Fire many volleys; at least one shot is almost certain
        for _ in 0..40 {
            state.timers.enemy_fire = 10.0;
            enemy_volley(&mut state, 0.0);
        }
        let shot = state.enemy_shots.first().expect("no enemy shot fired");
        assert_eq!(shot.pos, Vec2::new(3.0, 2.5));
        assert!((shot.vel.x - state.config.tuning.bias).abs() < 1e-6);
        assert!((shot.vel.y - state.config.tuning.enemy_shot_speed()).abs() < 1e-6);
    }

    #[test]
    fn test_momentum_decays_back_to_min() {
        let mut state = running(MovementStyle::Grid);
        state.player.momentum = 1.5;
        state.player.momentum_timer = MOMENTUM_HOLD_SECS;

        // Still held just before the grace period ends
        step_decay_only(&mut state, MOMENTUM_HOLD_SECS - 0.05);
        assert_eq!(state.player.momentum, 1.5);

        // Then 0.1 every 0.4s
        step_decay_only(&mut state, 0.1);
        assert_eq!(state.player.momentum, 1.4);
        step_decay_only(&mut state, 5.0 * MOMENTUM_DECAY_SECS);
        assert_eq!(state.player.momentum, MOMENTUM_MIN);
    }

    #[test]
    fn test_kill_raises_momentum_then_decays_to_min() {
        let mut state = running(MovementStyle::Grid);
        assert_eq!(state.player.momentum, MOMENTUM_MIN);

        // Within reach whether or not the enemy steps down this tick
        let target = Vec2::new(5.0, 10.0);
        let motion = EnemyMotion {
            step: IVec2::new(0, 1),
            fan_index: 0.0,
        };
        state.enemies.push(Enemy::new(target, Vec2::ZERO, motion));
        state
            .player_shots
            .push(Shot::new(target + Vec2::new(0.0, 0.5), Vec2::ZERO, ()));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.kills, 1);
        assert_eq!(state.player.momentum, 1.1);

        run_quiet(&mut state, &TickInput::default(), MOMENTUM_HOLD_SECS - 0.1);
        assert_eq!(state.player.momentum, 1.1);

        run_quiet(&mut state, &TickInput::default(), 0.2 + MOMENTUM_DECAY_SECS);
        assert_eq!(state.player.momentum, MOMENTUM_MIN);
        assert_eq!(state.kills, 1);
    }

    fn step_decay_only(state: &mut GameState, secs: f32) {
        let steps = (secs / SIM_DT).round() as u32;
        for _ in 0..steps {
            decay_momentum(state, SIM_DT);
        }
    }

    #[test]
    fn test_bounds_remove_stray_entities() {
        let mut state = running(MovementStyle::Grid);
        state.player_shots.push(Shot::new(Vec2::new(3.0, -1.5), Vec2::ZERO, ()));
        state
            .enemy_shots
            .push(Shot::new(Vec2::new(3.0, GRID_ROWS as f32 + 2.0), Vec2::ZERO, ()));
        state.enemy_shots.push(Shot::new(Vec2::new(-3.0, 4.0), Vec2::ZERO, ()));
        state.pickups.push(Pickup::new(
            Vec2::new(3.0, GRID_ROWS as f32),
            Vec2::ZERO,
            PickupData {
                kind: PickupKind::Heal,
                phase: 0.0,
            },
        ));

        mark_out_of_bounds(&mut state);
        state.sweep();

        assert!(state.player_shots.is_empty());
        assert!(state.enemy_shots.is_empty());
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_wave_for_kills() {
        assert_eq!(wave_for_kills(0), 1);
        assert_eq!(wave_for_kills(11), 1);
        assert_eq!(wave_for_kills(12), 2);
        assert_eq!(wave_for_kills(25), 3);
    }

    #[test]
    fn test_determinism() {
        let input = TickInput {
            firing: true,
            direction: Vec2::new(-1.0, -1.0),
            ..Default::default()
        };
        let mut a = running(MovementStyle::Grid);
        let mut b = running(MovementStyle::Grid);
        run_for(&mut a, &input, 5.0);
        run_for(&mut b, &input, 5.0);
        assert_eq!(a.player, b.player);
        assert_eq!(a.kills, b.kills);
        assert_eq!(a.enemies, b.enemies);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_lists_hold_only_alive_after_each_step(
            seed in any::<u64>(),
            dx in -1.5f32..1.5,
            dy in -1.5f32..1.5,
            firing in any::<bool>(),
            steps in 1usize..600,
        ) {
            let mut state = GameState::new(seed);
            state.phase = GamePhase::Running;
            let input = TickInput {
                direction: Vec2::new(dx, dy),
                firing,
                ..Default::default()
            };
            for _ in 0..steps {
                tick(&mut state, &input, SIM_DT);
                prop_assert!(state.all_alive());
                prop_assert!(state.particles.len() <= MAX_PARTICLES);
                prop_assert!(state.player.momentum >= MOMENTUM_MIN);
                prop_assert!(state.player.momentum <= MOMENTUM_MAX);
                prop_assert!(state.player.lives <= MAX_LIVES);
                let p = state.player.ship.pos;
                prop_assert!(p.x >= PLAYER_MIN_X && p.x <= PLAYER_MAX_X);
                prop_assert!(p.y >= PLAYER_MIN_Y && p.y <= PLAYER_MAX_Y);
            }
        }
    }
}
