//! Game settings and preferences
//!
//! Persisted separately from the leaderboard under `sg_settings`.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StoreError};
use crate::tuning::Difficulty;

/// Input device the player picked on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Keyboard: arrows/WASD and Space
    #[default]
    Desktop,
    /// Pointer: steer relative to the ship anchor, hold to auto-fire
    Mobile,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Desktop => "desktop",
            ControlMode::Mobile => "mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "desktop" => Some(ControlMode::Desktop),
            "mobile" => Some(ControlMode::Mobile),
            _ => None,
        }
    }

    /// Held-fire period for this mode (seconds)
    pub fn fire_period(&self) -> f32 {
        use crate::consts::{DESKTOP_FIRE_PERIOD, MOBILE_FIRE_PERIOD};
        match self {
            ControlMode::Desktop => DESKTOP_FIRE_PERIOD,
            ControlMode::Mobile => MOBILE_FIRE_PERIOD,
        }
    }
}

/// How the ship follows the input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovementStyle {
    /// Discrete cell steps on a timer
    #[default]
    Grid,
    /// Smooth velocity, clamped to the movement box
    Continuous,
}

impl MovementStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementStyle::Grid => "grid",
            MovementStyle::Continuous => "continuous",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Some(MovementStyle::Grid),
            "continuous" | "smooth" => Some(MovementStyle::Continuous),
            _ => None,
        }
    }
}

/// Playfield projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Dimension {
    /// Straight top-down grid
    #[default]
    #[serde(rename = "2d")]
    Flat,
    /// Perspective tilt, far rows shrink toward a vanishing point
    #[serde(rename = "3d")]
    Depth,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Flat => "2d",
            Dimension::Depth => "3d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "2d" | "flat" => Some(Dimension::Flat),
            "3d" | "depth" => Some(Dimension::Depth),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: ControlMode,
    pub movement: MovementStyle,
    pub dimension: Dimension,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Effects ===
    /// Explosion particles and shockwaves
    pub particles: bool,
    /// Minimize pulsing and shockwaves
    pub reduced_motion: bool,
    /// Vibrate on hit (mobile)
    pub vibration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            mode: ControlMode::Desktop,
            movement: MovementStyle::Grid,
            dimension: Dimension::Flat,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            particles: true,
            reduced_motion: false,
            vibration: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "sg_settings";

    /// Effective sound volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Whether explosions should spawn shockwave rings
    pub fn shockwaves_enabled(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Load settings, falling back to defaults on missing or malformed data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let settings: Settings = persistence::load_json(store, Self::STORAGE_KEY);
        log::info!(
            "Settings: difficulty={}, mode={}, movement={}",
            settings.difficulty.as_str(),
            settings.mode.as_str(),
            settings.movement.as_str()
        );
        settings
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
