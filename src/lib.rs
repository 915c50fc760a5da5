//! Sky Hopper - a flappy-style side-scroller core
//!
//! Core modules:
//! - `sim`: Simulation (physics, obstacle generation, collisions, scoring)
//! - `scheduler`: Frame pacing decoupled from display refresh
//! - `session`: Game state machine, score/combo bookkeeping, collaborator wiring
//! - `stats` / `leaderboard` / `audio`: Collaborator contracts and default implementations
//! - `platform`: Native and browser host drivers

pub mod audio;
pub mod config;
pub mod error;
pub mod input;
pub mod leaderboard;
pub mod platform;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod stats;

pub use config::SimConfig;
pub use error::{ConfigError, LeaderboardError, StorageError};
pub use scheduler::{FrameScheduler, FrameToken};
pub use session::{Collaborators, Session};

/// Playfield and timing constants
pub mod consts {
    /// Reference frame duration in milliseconds (60 Hz). Elapsed time is
    /// normalized against this to produce the dimensionless `dt`.
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Longest elapsed time a single scheduled frame may report (~30 Hz floor)
    pub const MAX_FRAME_MS: f64 = 32.0;

    /// Playfield dimensions (logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Ground strip reserved at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 80.0;
    /// Y coordinate of the ground plane (top of the ground strip)
    pub const GROUND_Y: f32 = PLAYFIELD_HEIGHT - GROUND_HEIGHT;
    /// Ground texture tile width, used to wrap the scroll offset
    pub const GROUND_TILE_WIDTH: f32 = 24.0;

    /// Actor defaults - x is fixed during play, position is the sprite center
    pub const ACTOR_X: f32 = 80.0;
    pub const ACTOR_WIDTH: f32 = 34.0;
    pub const ACTOR_HEIGHT: f32 = 24.0;
    /// Collision circle, smaller than the sprite box
    pub const ACTOR_HITBOX_RADIUS: f32 = 12.0;

    /// Rotation mapping (degrees)
    pub const ROTATION_NOSE_DOWN: f32 = 90.0;
    pub const ROTATION_NOSE_UP: f32 = -30.0;
    pub const ROTATION_FALL_SCALE: f32 = 3.0;
    pub const ROTATION_RISE_SCALE: f32 = 2.0;

    /// Pickup defaults
    pub const PICKUP_RADIUS: f32 = 10.0;
    pub const PICKUP_VALUE_NORMAL: u32 = 1;
    pub const PICKUP_VALUE_RARE: u32 = 3;

    /// Attract-mode hover
    pub const IDLE_BOB_SPEED: f32 = 3.5;
    pub const IDLE_BOB_HEIGHT: f32 = 8.0;
}

/// Normalize elapsed milliseconds to multiples of the reference frame
#[inline]
pub fn frame_scale(elapsed_ms: f32) -> f32 {
    if elapsed_ms <= 0.0 {
        0.0
    } else {
        elapsed_ms / consts::REFERENCE_FRAME_MS
    }
}
