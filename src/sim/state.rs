//! Entity records and simulation state
//!
//! Plain data. Behavior lives in `physics`, `collision`, `scoring` and `tick`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::spawn_obstacle;
use super::rng::RandomSource;
use crate::config::SimConfig;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entry screen, ambient animation running
    Start,
    /// Simulation active, input drives impulses
    Playing,
    /// Simulation frozen, scores finalized
    GameOver,
}

/// The player-controlled entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Sprite center. x stays fixed during play.
    pub pos: Vec2,
    /// Vertical velocity, positive = falling
    pub vel: f32,
    /// Cosmetic rotation in degrees, derived from velocity
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// Collision circle radius, centered on the sprite
    pub hitbox_radius: f32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: Vec2::new(ACTOR_X, Self::HOME_Y),
            vel: 0.0,
            rotation: 0.0,
            width: ACTOR_WIDTH,
            height: ACTOR_HEIGHT,
            hitbox_radius: ACTOR_HITBOX_RADIUS,
        }
    }
}

impl Actor {
    /// Spawn height: middle of the space above the ground
    pub const HOME_Y: f32 = GROUND_Y / 2.0;

    #[inline]
    pub fn hitbox_top(&self) -> f32 {
        self.pos.y - self.hitbox_radius
    }

    #[inline]
    pub fn hitbox_bottom(&self) -> f32 {
        self.pos.y + self.hitbox_radius
    }

    #[inline]
    pub fn hitbox_left(&self) -> f32 {
        self.pos.x - self.hitbox_radius
    }

    #[inline]
    pub fn hitbox_right(&self) -> f32 {
        self.pos.x + self.hitbox_radius
    }
}

/// A gapped obstacle ("pipe")
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Vertical center of the traversable gap
    pub gap_center: f32,
    /// Set once, when the actor crosses the scoring line
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_center: f32) -> Self {
        Self {
            x,
            gap_center,
            passed: false,
        }
    }

    /// Right edge
    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    #[inline]
    pub fn gap_top(&self, gap_height: f32) -> f32 {
        self.gap_center - gap_height / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self, gap_height: f32) -> f32 {
        self.gap_center + gap_height / 2.0
    }
}

/// Pickup rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickupKind {
    /// Coin
    #[default]
    Normal,
    /// Diamond
    Rare,
}

impl PickupKind {
    pub fn value(&self) -> u32 {
        match self {
            PickupKind::Normal => PICKUP_VALUE_NORMAL,
            PickupKind::Rare => PICKUP_VALUE_RARE,
        }
    }
}

/// A collectible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
    pub value: u32,
    /// Terminal. A collected pickup is dropped on the next advance.
    pub collected: bool,
}

impl Pickup {
    pub fn new(pos: Vec2, kind: PickupKind) -> Self {
        Self {
            pos,
            kind,
            value: kind.value(),
            collected: false,
        }
    }
}

/// What the actor ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Ground,
    Ceiling,
    Obstacle,
}

/// Scores reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub pipe_score: u32,
    pub coin_score: u32,
    /// Rare pickups collected
    pub diamonds: u32,
    pub max_combo: u32,
}

impl RunSummary {
    /// Combined score (pipes + coins)
    pub fn total(&self) -> u64 {
        u64::from(self.pipe_score) + u64::from(self.coin_score)
    }
}

/// Events emitted for presentation, audio and HUD consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Flapped,
    /// An obstacle was passed
    Scored { pipe_score: u32 },
    /// One batch of pickups collected in a single tick
    PickupsCollected {
        count: u32,
        rare: u32,
        value: u32,
        combo: u32,
        multiplier: u32,
        awarded: u32,
    },
    Collided(CollisionKind),
    GameOver(RunSummary),
    /// Lifetime best total improved
    HighScore { best_total: u64 },
    AchievementUnlocked { threshold: u64 },
}

/// Complete simulation state, owned by the session controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub actor: Actor,
    /// Creation order == left-to-right screen order
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    /// Cosmetic ground scroll, wraps at `GROUND_TILE_WIDTH`
    pub ground_offset: f32,
    /// Seconds spent in the ambient animation
    pub idle_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    /// Fresh state: new actor, one obstacle at the right edge, no pickups
    pub fn new(config: &SimConfig, rng: &mut dyn RandomSource) -> Self {
        Self {
            actor: Actor::default(),
            obstacles: vec![spawn_obstacle(PLAYFIELD_WIDTH, config, rng)],
            pickups: Vec::new(),
            ground_offset: 0.0,
            idle_time: 0.0,
            time_ticks: 0,
        }
    }
}
