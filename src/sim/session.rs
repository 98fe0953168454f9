//! Session state machine
//!
//! Menu -> Instructions -> Countdown -> Running <-> Paused -> GameOver -> Menu.
//! Transitions called in the wrong phase are ignored and return `false`.

use rand::Rng;

use super::state::{GameEvent, GamePhase, GameState, RunConfig};
use crate::consts::*;
use crate::leaderboard::Leaderboard;
use crate::settings::Settings;

/// Final numbers shown on the game-over panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameStats {
    pub kills: u32,
    /// Seconds survived
    pub elapsed: f32,
    pub lives: u8,
    pub score: u64,
    pub shots_fired: u32,
    pub wave: u32,
}

impl GameStats {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            kills: state.kills,
            elapsed: state.elapsed,
            lives: state.player.lives,
            score: state.player.score,
            shots_fired: state.shots_fired,
            wave: state.wave,
        }
    }
}

/// Begin a new game with the menu choices, showing the instructions first
pub fn start(state: &mut GameState, settings: &Settings) -> bool {
    if !matches!(state.phase, GamePhase::Menu | GamePhase::GameOver) {
        return false;
    }

    let seed = state.rng.random::<u64>();
    let config = RunConfig::new(settings.difficulty, settings.mode, settings.movement);
    *state = GameState::with_config(seed, config);
    state.particles_enabled = settings.particles;
    state.shockwaves_enabled = settings.shockwaves_enabled();
    state.phase = GamePhase::Instructions;

    log::info!(
        "New game: difficulty={}, mode={}, movement={}",
        settings.difficulty.as_str(),
        settings.mode.as_str(),
        settings.movement.as_str()
    );
    true
}

/// Leave the instructions and start the countdown
pub fn proceed(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Instructions {
        return false;
    }
    state.phase = GamePhase::Countdown {
        remaining: COUNTDOWN_FROM,
        timer: COUNTDOWN_STEP_SECS,
    };
    state.events.push(GameEvent::CountdownTick(COUNTDOWN_FROM));
    true
}

/// Advance the countdown; `remaining == 0` holds "Go!" for one more step
pub fn advance_countdown(state: &mut GameState, dt: f32) {
    let GamePhase::Countdown { remaining, timer } = state.phase else {
        return;
    };

    let timer = timer - dt;
    if timer > 0.0 {
        state.phase = GamePhase::Countdown { remaining, timer };
        return;
    }

    if remaining == 0 {
        state.phase = GamePhase::Running;
        log::info!("Launch");
        return;
    }

    let remaining = remaining - 1;
    state.phase = GamePhase::Countdown {
        remaining,
        timer: timer + COUNTDOWN_STEP_SECS,
    };
    state.events.push(if remaining > 0 {
        GameEvent::CountdownTick(remaining)
    } else {
        GameEvent::Launch
    });
}

/// Pause key: Running <-> Paused
pub fn toggle_pause(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Running => pause(state),
        GamePhase::Paused => resume(state),
        _ => false,
    }
}

/// Freeze the sim (also used when the tab is hidden)
pub fn pause(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    state.phase = GamePhase::Paused;
    state.events.push(GameEvent::Paused);
    true
}

pub fn resume(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Paused {
        return false;
    }
    state.phase = GamePhase::Running;
    state.events.push(GameEvent::Resumed);
    true
}

/// Out of lives
pub(crate) fn enter_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver);
    let stats = GameStats::from_state(state);
    log::info!(
        "Game over: score={}, kills={}, time={:.1}s, wave={}",
        stats.score,
        stats.kills,
        stats.elapsed,
        stats.wave
    );
}

/// Record the finished run and go back to the menu. Returns the rank reached.
pub fn submit_score(state: &mut GameState, leaderboard: &mut Leaderboard, name: &str) -> Option<usize> {
    if state.phase != GamePhase::GameOver {
        return None;
    }
    let rank = leaderboard.add_score(name, state.player.score, state.kills);
    return_to_menu(state);
    rank
}

/// Abandon or dismiss the current run
pub fn return_to_menu(state: &mut GameState) {
    state.phase = GamePhase::Menu;
}
