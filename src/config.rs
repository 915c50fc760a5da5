//! Gameplay tuning parameters
//!
//! A flat record of numbers. Nothing here is validated: a tuning UI that
//! feeds absurd values gets absurd (but non-crashing) gameplay.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{GROUND_Y, MAX_FRAME_MS};
use crate::error::ConfigError;

/// Simulation tuning, in pixels and reference frames (1 frame = 1/60 s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Actor ===
    /// Downward acceleration per reference frame
    pub gravity: f32,
    /// Velocity written on flap (negative = up)
    pub flap_strength: f32,
    /// Maximum downward speed
    pub terminal_velocity: f32,
    /// Clamp velocity to `terminal_velocity` before integrating position
    pub clamp_terminal_velocity: bool,

    // === Obstacles ===
    /// Horizontal scroll speed per reference frame
    pub obstacle_speed: f32,
    /// Height of the traversable gap
    pub gap_height: f32,
    /// Obstacle width
    pub obstacle_width: f32,
    /// Horizontal distance between obstacle spawns
    pub obstacle_spacing: f32,
    /// Minimum clearance between a gap and the ceiling / ground
    pub gap_margin: f32,
    /// Scoring line relative to the obstacle's trailing edge
    pub pass_offset: f32,

    // === Pickups ===
    /// Chance a new obstacle carries a pickup in its gap
    pub pickup_spawn_chance: f32,
    /// Chance a spawned pickup is rare
    pub rare_chance: f32,
    /// Minimum horizontal distance between pickups
    pub pickup_min_distance: f32,

    // === Scoring ===
    /// Combo count at which the multiplier kicks in
    pub combo_threshold: u32,
    /// Pickup score multiplier once the combo threshold is reached
    pub combo_multiplier: u32,

    // === Pacing ===
    /// Upper bound on elapsed time per scheduled frame (ms)
    pub max_frame_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_strength: -8.0,
            terminal_velocity: 10.0,
            clamp_terminal_velocity: true,

            obstacle_speed: 2.5,
            gap_height: 150.0,
            obstacle_width: 60.0,
            obstacle_spacing: 220.0,
            gap_margin: 50.0,
            // Trailing edge - 30 is the midpoint of a default-width obstacle
            pass_offset: -30.0,

            pickup_spawn_chance: 0.65,
            rare_chance: 0.1,
            pickup_min_distance: 100.0,

            combo_threshold: 3,
            combo_multiplier: 2,

            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

impl SimConfig {
    /// Range of valid gap centers `(min, max)`, clear of ceiling and ground.
    ///
    /// When the gap does not fit, both ends collapse to the middle of the
    /// playable height.
    pub fn gap_center_range(&self) -> (f32, f32) {
        let half_gap = self.gap_height / 2.0;
        let min = self.gap_margin + half_gap;
        let max = GROUND_Y - self.gap_margin - half_gap;
        if min > max {
            let mid = GROUND_Y / 2.0;
            (mid, mid)
        } else {
            (min, max)
        }
    }

    /// Multiplier for a combo count
    pub fn multiplier_for(&self, combo: u32) -> u32 {
        if combo >= self.combo_threshold {
            self.combo_multiplier
        } else {
            1
        }
    }

    /// Load from a JSON file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from a JSON file, falling back to defaults if it is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::info!("Using default config ({})", e);
                Self::default()
            }
        }
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Parse)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }
        std::fs::write(path, json).map_err(ConfigError::Write)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
