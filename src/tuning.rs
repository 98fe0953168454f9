//! Difficulty tables
//!
//! Every timing in the sim derives from one of these rows. `slow_factor`
//! stretches step intervals and shot travel; higher is gentler.

use serde::{Deserialize, Serialize};

/// Difficulty level picked on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a radio-button value
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                slow_factor: 2.0,
                bias: 0.2,
                fan_spread: 0.4,
                enemy_fire_ms: 420.0,
                player_speed: 8.0,
                enemy_speed: 3.0,
            },
            Difficulty::Normal => DifficultyConfig {
                slow_factor: 1.3,
                bias: 0.35,
                fan_spread: 0.75,
                enemy_fire_ms: 260.0,
                player_speed: 10.0,
                enemy_speed: 4.0,
            },
            Difficulty::Hard => DifficultyConfig {
                slow_factor: 1.05,
                bias: 0.5,
                fan_spread: 1.0,
                enemy_fire_ms: 180.0,
                player_speed: 11.0,
                enemy_speed: 5.0,
            },
        }
    }
}

/// Tuning row for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Global slow-down applied to steps and shot speeds
    pub slow_factor: f32,
    /// How strongly enemy shots lean toward the player's column
    pub bias: f32,
    /// Horizontal spread of chasing enemies around the player
    pub fan_spread: f32,
    /// Interval between enemy volleys
    pub enemy_fire_ms: f32,
    /// Continuous-movement speed (cells/s before slow-down)
    pub player_speed: f32,
    /// Enemy pace; 4 is the reference
    pub enemy_speed: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

impl DifficultyConfig {
    /// Seconds between grid steps of the player ship
    pub fn player_step_secs(&self) -> f32 {
        0.18 * self.slow_factor
    }

    /// Seconds between enemy grid steps
    pub fn enemy_step_secs(&self) -> f32 {
        0.26 * self.slow_factor / (self.enemy_speed / 4.0)
    }

    /// Seconds between enemy spawns
    pub fn enemy_spawn_secs(&self) -> f32 {
        0.62 / self.slow_factor
    }

    /// Seconds between enemy volleys
    pub fn enemy_fire_secs(&self) -> f32 {
        self.enemy_fire_ms / 1000.0
    }

    /// Upward speed of player shots (cells/s)
    pub fn player_shot_speed(&self) -> f32 {
        12.0 / self.slow_factor
    }

    /// Downward speed of enemy shots (cells/s)
    pub fn enemy_shot_speed(&self) -> f32 {
        (4.2 + self.enemy_speed) / self.slow_factor
    }

    /// Ship speed in continuous movement mode (cells/s)
    pub fn continuous_speed(&self) -> f32 {
        self.player_speed / self.slow_factor
    }
}
