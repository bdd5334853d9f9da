//! Game settings and physics tuning
//!
//! Loaded from a JSON file next to the executable. Every field has a default,
//! so partial files are fine and a missing file falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors while reading a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Player physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Angular acceleration from held horizontal input (rad/s²)
    pub run_accel: f32,
    /// Angular velocity decay rate with no input (1/s)
    pub run_decay: f32,
    /// Angular speed limit (rad/s)
    pub max_angular_vel: f32,
    /// Outward radial velocity given on jump
    pub jump_impulse: f32,
    /// Seconds before a held jump turns into a fall
    pub jump_time: f32,
    pub jump_grav: f32,
    pub fall_grav: f32,
    /// Gravity after releasing jump early
    pub cut_grav: f32,
    /// Radial velocity given when a new body captures the player
    pub capture_nudge: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_accel: PLR_RUN_ACCEL,
            run_decay: PLR_RUN_DECAY,
            max_angular_vel: PLR_MAX_ANGULAR_VEL,
            jump_impulse: PLR_JUMP_IMPULSE,
            jump_time: PLR_JUMP_TIME,
            jump_grav: PLR_JUMP_GRAV,
            fall_grav: PLR_FALL_GRAV,
            cut_grav: PLR_CUT_GRAV,
            capture_nudge: PLR_CAPTURE_NUDGE,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: u32,
    pub window_height: u32,
    /// Target frames per second
    pub refresh_rate: f32,

    // === Debug ===
    /// Draw orbit guides and the reacquisition ray
    pub show_debug: bool,

    // === Gameplay ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            refresh_rate: 60.0,
            show_debug: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "options.json";

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.log_values();
                settings
            }
            Err(e) => {
                log::warn!("{e} ({}), using defaults", path.display());
                let settings = Self::default();
                settings.log_values();
                settings
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seconds per frame at the target refresh rate
    pub fn frame_time(&self) -> f32 {
        if self.refresh_rate > 0.0 {
            1.0 / self.refresh_rate
        } else {
            1.0 / 60.0
        }
    }

    fn log_values(&self) {
        log::info!("resolution: {}x{}", self.window_width, self.window_height);
        log::info!("refresh rate: {}", self.refresh_rate);
    }
}
