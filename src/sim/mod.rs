//! Simulation module
//!
//! All gameplay logic lives here, with no rendering or platform dependencies:
//! - Elapsed time normalized to 60 Hz reference frames
//! - Randomness only through an injected [`RandomSource`]
//! - State passed in and returned, never shared

pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod rng;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{detect_collision, hits_ceiling, hits_ground, hits_obstacle};
pub use physics::{ObstacleAdvance, advance_obstacles, advance_pickups, flap, integrate};
pub use rng::{PcgRandom, RandomSource, ScriptedRandom};
pub use scoring::{CollectedPickup, PickupBatch, collect_pickups, detect_passes};
pub use state::{
    Actor, CollisionKind, GameEvent, GamePhase, Obstacle, Pickup, PickupKind, RunSummary, SimState,
};
pub use tick::{TickOutcome, idle_tick, tick};
