//! DOM ids and text for the HUD, overlays and screen-reader announcer
//!
//! Everything here is plain string building so the frontend only has to
//! copy values into elements.

use crate::leaderboard::Leaderboard;
use crate::settings::{ControlMode, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, GameStats, PickupKind};

/// Element ids in `index.html`
pub mod ids {
    pub const MENU: &str = "menu";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const INSTRUCTIONS_TEXT: &str = "instructionsText";
    pub const COUNTDOWN: &str = "countdown";
    pub const PAUSE_OVERLAY: &str = "pauseOverlay";
    pub const RESUME_BTN: &str = "resumeBtn";
    pub const GAME_OVER: &str = "gameOver";
    pub const END_MSG: &str = "endMsg";
    pub const STAT_KILLS: &str = "statKills";
    pub const STAT_TIME: &str = "statTimeOver";
    pub const STAT_LIVES: &str = "statLives";
    pub const STAT_SCORE: &str = "statScore";
    pub const RANK_HINT: &str = "rankHint";
    pub const PANEL: &str = "panel";
    pub const LIVES: &str = "lives";
    pub const SHOTS: &str = "shots";
    pub const TIME: &str = "time";
    pub const WAVE: &str = "wave";
    pub const MOMENTUM: &str = "momentum";
    pub const SCORE: &str = "score";
    pub const ANNOUNCER: &str = "ariaAnnouncer";
    pub const PLAYER_NAME: &str = "playerName";
    pub const SAVE_SCORE: &str = "saveScore";
    pub const LEADERBOARD: &str = "leaderboard";
    pub const PAUSE_BTN: &str = "pauseBtn";
    pub const START_GAME: &str = "startGame";
    pub const CANVAS: &str = "gameCanvas";
    pub const CONTAINER: &str = "container";

    /// Every full-screen overlay, shown one at a time
    pub const OVERLAYS: [&str; 5] = [MENU, INSTRUCTIONS, COUNTDOWN, PAUSE_OVERLAY, GAME_OVER];
}

/// Radio group names on the menu
pub mod radios {
    pub const DIFFICULTY: &str = "difficulty";
    pub const MODE: &str = "mode";
    pub const MOVEMENT: &str = "movement";
    pub const DIMENSION: &str = "dimension";
}

/// Audio and effect controls on the menu
pub mod options {
    pub const MASTER_VOLUME: &str = "optMasterVolume";
    pub const SFX_VOLUME: &str = "optSfxVolume";
    pub const MUTED: &str = "optMuted";
    pub const PARTICLES: &str = "optParticles";
    pub const REDUCED_MOTION: &str = "optReducedMotion";
    pub const VIBRATION: &str = "optVibration";
}

/// Checkbox id paired with the flag it edits
pub fn option_flags(settings: &mut Settings) -> [(&'static str, &mut bool); 4] {
    [
        (options::MUTED, &mut settings.muted),
        (options::PARTICLES, &mut settings.particles),
        (options::REDUCED_MOTION, &mut settings.reduced_motion),
        (options::VIBRATION, &mut settings.vibration),
    ]
}

/// Slider id paired with the volume it edits
pub fn option_volumes(settings: &mut Settings) -> [(&'static str, &mut f32); 2] {
    [
        (options::MASTER_VOLUME, &mut settings.master_volume),
        (options::SFX_VOLUME, &mut settings.sfx_volume),
    ]
}

/// Slider text (0-100) to a volume in [0, 1]
pub fn parse_volume(value: &str) -> Option<f32> {
    let percent: f32 = value.trim().parse().ok()?;
    percent.is_finite().then(|| (percent / 100.0).clamp(0.0, 1.0))
}

pub fn volume_value(volume: f32) -> String {
    format!("{}", (volume.clamp(0.0, 1.0) * 100.0).round() as u32)
}

/// Class that hides an element
pub const HIDDEN_CLASS: &str = "hidden";

/// Overlay to show for a phase (`None` while playing)
pub fn overlay_for(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Menu => Some(ids::MENU),
        GamePhase::Instructions => Some(ids::INSTRUCTIONS),
        GamePhase::Countdown { .. } => Some(ids::COUNTDOWN),
        GamePhase::Running => None,
        GamePhase::Paused => Some(ids::PAUSE_OVERLAY),
        GamePhase::GameOver => Some(ids::GAME_OVER),
    }
}

pub fn format_momentum(momentum: f32) -> String {
    format!("{:.1}x", momentum)
}

pub fn format_seconds(secs: f32) -> String {
    format!("{:.1}", secs.max(0.0))
}

/// Big countdown digit, then "Go!"
pub fn countdown_label(remaining: u8) -> String {
    if remaining == 0 {
        "Go!".to_string()
    } else {
        remaining.to_string()
    }
}

pub fn pause_button_label(phase: GamePhase) -> &'static str {
    if phase == GamePhase::Paused {
        "Resume"
    } else {
        "Pause"
    }
}

pub fn instructions_text(mode: ControlMode) -> &'static str {
    match mode {
        ControlMode::Mobile => {
            "Drag to steer; hold anywhere to auto-fire. Dodge incoming fire and collect drops."
        }
        ControlMode::Desktop => {
            "Use WASD or arrow keys to move, press SPACE to shoot. Toggle pause with P or Esc."
        }
    }
}

pub fn end_message(score: u64) -> &'static str {
    if score > 0 {
        "Mission Complete"
    } else {
        "Mission Failed"
    }
}

/// Side panel values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub lives: String,
    pub shots: String,
    pub time: String,
    pub wave: String,
    pub momentum: String,
    pub score: String,
}

impl HudText {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            lives: state.player.lives.to_string(),
            shots: state.shots_fired.to_string(),
            time: format_seconds(state.elapsed),
            wave: state.wave.to_string(),
            momentum: format_momentum(state.player.momentum),
            score: state.player.score.to_string(),
        }
    }

    /// (element id, text) pairs
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            (ids::LIVES, self.lives.as_str()),
            (ids::SHOTS, self.shots.as_str()),
            (ids::TIME, self.time.as_str()),
            (ids::WAVE, self.wave.as_str()),
            (ids::MOMENTUM, self.momentum.as_str()),
            (ids::SCORE, self.score.as_str()),
        ]
    }
}

/// Game-over panel values
pub fn stats_fields(stats: &GameStats) -> [(&'static str, String); 5] {
    [
        (ids::END_MSG, end_message(stats.score).to_string()),
        (ids::STAT_KILLS, stats.kills.to_string()),
        (ids::STAT_TIME, format_seconds(stats.elapsed)),
        (ids::STAT_LIVES, stats.lives.to_string()),
        (ids::STAT_SCORE, stats.score.to_string()),
    ]
}

/// Leaderboard heading
pub const LEADERBOARD_TITLE: &str = "Hall of Fame";

/// Game-over line about where the score will land
pub fn rank_hint(board: &Leaderboard, score: u64) -> &'static str {
    if score == 0 || !board.qualifies(score) {
        return "";
    }
    match board.top_score() {
        Some(top) if score <= top => "You made the Hall of Fame",
        _ => "New best score!",
    }
}

/// ("1. Name", "score") per row
pub fn leaderboard_rows(board: &Leaderboard) -> Vec<(String, String)> {
    board
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| (format!("{}. {}", i + 1, e.name), e.score.to_string()))
        .collect()
}

/// Screen-reader line for an event, if it deserves one
pub fn announcement(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::Launch => "Game started".to_string(),
        GameEvent::CountdownTick(n) => n.to_string(),
        GameEvent::PickupCollected(PickupKind::Heal) => "Life boosted".to_string(),
        GameEvent::PickupCollected(PickupKind::Pulse) => "Pulse wave clears the lane".to_string(),
        GameEvent::PlayerHit { lives_left } => match lives_left {
            0 => "Ship destroyed".to_string(),
            1 => "Hit! 1 life left".to_string(),
            n => format!("Hit! {} lives left", n),
        },
        GameEvent::WaveAdvanced(n) => format!("Wave {}", n),
        GameEvent::Paused => "Paused".to_string(),
        GameEvent::Resumed => "Resumed".to_string(),
        GameEvent::GameOver => "Game over".to_string(),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_hud_formatting() {
        let mut state = GameState::new(1);
        state.player.momentum = 1.3;
        state.elapsed = 12.345;
        state.shots_fired = 7;
        state.player.score = 360;
        let hud = HudText::from_state(&state);
        assert_eq!(hud.momentum, "1.3x");
        assert_eq!(hud.time, "12.3");
        assert_eq!(hud.shots, "7");
        assert_eq!(hud.lives, "3");
        assert_eq!(hud.wave, "1");
        assert_eq!(hud.fields()[5], (ids::SCORE, "360"));
    }

    #[test]
    fn test_overlay_per_phase() {
        assert_eq!(overlay_for(GamePhase::Menu), Some(ids::MENU));
        assert_eq!(overlay_for(GamePhase::Running), None);
        assert_eq!(
            overlay_for(GamePhase::Countdown {
                remaining: 2,
                timer: 0.1
            }),
            Some(ids::COUNTDOWN)
        );
        assert_eq!(overlay_for(GamePhase::GameOver), Some(ids::GAME_OVER));
        for phase in [GamePhase::Menu, GamePhase::Paused, GamePhase::Instructions] {
            let id = overlay_for(phase).unwrap();
            assert!(ids::OVERLAYS.contains(&id));
        }
    }

    #[test]
    fn test_countdown_and_pause_labels() {
        assert_eq!(countdown_label(3), "3");
        assert_eq!(countdown_label(0), "Go!");
        assert_eq!(pause_button_label(GamePhase::Paused), "Resume");
        assert_eq!(pause_button_label(GamePhase::Running), "Pause");
    }

    #[test]
    fn test_end_message() {
        assert_eq!(end_message(0), "Mission Failed");
        assert_eq!(end_message(120), "Mission Complete");
    }

    #[test]
    fn test_stats_fields() {
        let stats = GameStats {
            kills: 4,
            elapsed: 31.06,
            lives: 0,
            score: 540,
            shots_fired: 30,
            wave: 1,
        };
        let fields = stats_fields(&stats);
        assert_eq!(fields[0], (ids::END_MSG, "Mission Complete".to_string()));
        assert_eq!(fields[2], (ids::STAT_TIME, "31.1".to_string()));
        assert_eq!(fields[3], (ids::STAT_LIVES, "0".to_string()));
    }

    #[test]
    fn test_leaderboard_rows() {
        let mut board = Leaderboard::new();
        board.add_score("Zed", 240, 2);
        board.add_score("", 480, 4);
        assert_eq!(
            leaderboard_rows(&board),
            vec![
                ("1. Pilot".to_string(), "480".to_string()),
                ("2. Zed".to_string(), "240".to_string()),
            ]
        );
    }

    #[test]
    fn test_menu_options_edit_settings() {
        let mut settings = Settings::default();
        for (id, flag) in option_flags(&mut settings) {
            if id == options::MUTED || id == options::PARTICLES {
                *flag = !*flag;
            }
        }
        for (id, volume) in option_volumes(&mut settings) {
            if id == options::SFX_VOLUME {
                *volume = parse_volume("40").unwrap();
            }
        }
        assert!(settings.muted);
        assert!(!settings.particles);
        assert!(!settings.shockwaves_enabled());
        assert!((settings.sfx_volume - 0.4).abs() < 1e-6);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_slider_text() {
        assert_eq!(parse_volume("80"), Some(0.8));
        assert_eq!(parse_volume(" 150 "), Some(1.0));
        assert_eq!(parse_volume("-5"), Some(0.0));
        assert_eq!(parse_volume("loud"), None);
        assert_eq!(parse_volume("NaN"), None);
        assert_eq!(volume_value(0.8), "80");
        assert_eq!(volume_value(2.0), "100");
    }

    #[test]
    fn test_rank_hint() {
        let mut board = Leaderboard::new();
        assert_eq!(rank_hint(&board, 0), "");
        assert_eq!(rank_hint(&board, 120), "New best score!");

        for i in 1..=8 {
            board.add_score("Ace", i * 100, 1);
        }
        assert_eq!(rank_hint(&board, 900), "New best score!");
        assert_eq!(rank_hint(&board, 450), "You made the Hall of Fame");
        // Ties with the last entry fall off
        assert_eq!(rank_hint(&board, 100), "");
    }

    #[test]
    fn test_announcements() {
        assert_eq!(
            announcement(&GameEvent::PickupCollected(PickupKind::Heal)).as_deref(),
            Some("Life boosted")
        );
        assert_eq!(
            announcement(&GameEvent::PlayerHit { lives_left: 2 }).as_deref(),
            Some("Hit! 2 lives left")
        );
        assert_eq!(
            announcement(&GameEvent::Launch).as_deref(),
            Some("Game started")
        );
        assert_eq!(announcement(&GameEvent::ShotFired), None);
        assert_eq!(
            announcement(&GameEvent::EnemyDestroyed { pos: Vec2::ZERO }),
            None
        );
    }

    #[test]
    fn test_instructions_per_mode() {
        assert!(instructions_text(ControlMode::Desktop).contains("SPACE"));
        assert!(instructions_text(ControlMode::Mobile).contains("Drag"));
    }
}
