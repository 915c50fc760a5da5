//! One simulation tick
//!
//! Composes the physics, collision and scoring passes in a fixed order and
//! reports what happened. Takes the state by value and hands back the next one.

use super::collision::detect_collision;
use super::physics::{advance_obstacles, advance_pickups, integrate, maybe_spawn_pickup};
use super::rng::RandomSource;
use super::scoring::{PickupBatch, collect_pickups, detect_passes};
use super::state::{Actor, CollisionKind, SimState};
use crate::config::SimConfig;
use crate::consts::*;
use crate::frame_scale;

/// Everything a tick produced, for the session controller to score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Obstacles passed this tick
    pub passed: u32,
    /// Pickups collected this tick
    pub batch: PickupBatch,
    /// Set when the run ends this tick
    pub collision: Option<CollisionKind>,
}

/// Advance the active simulation by `elapsed_ms`.
///
/// Order: actor, obstacles (shift, filter, spawn), pickups, collision, then
/// scoring. A colliding tick reports no scoring.
pub fn tick(
    mut state: SimState,
    config: &SimConfig,
    elapsed_ms: f32,
    rng: &mut dyn RandomSource,
) -> (SimState, TickOutcome) {
    state.time_ticks += 1;
    state.actor = integrate(state.actor, config, elapsed_ms);

    let advance = advance_obstacles(state.obstacles, config, elapsed_ms, rng);
    state.obstacles = advance.obstacles;

    state.pickups = advance_pickups(state.pickups, config, elapsed_ms);
    if let Some(spawned) = advance.spawned {
        if let Some(pickup) = maybe_spawn_pickup(&state.pickups, &spawned, config, rng) {
            log::trace!("Pickup {:?} spawned at {:?}", pickup.kind, pickup.pos);
            state.pickups.push(pickup);
        }
    }

    scroll_ground(&mut state, config, elapsed_ms);

    if let Some(kind) = detect_collision(&state.actor, &state.obstacles, config) {
        return (
            state,
            TickOutcome {
                collision: Some(kind),
                ..Default::default()
            },
        );
    }

    let passed = detect_passes(&mut state.obstacles, &state.actor, config);
    let batch = collect_pickups(&mut state.pickups, &state.actor);

    (
        state,
        TickOutcome {
            passed,
            batch,
            collision: None,
        },
    )
}

/// Ambient animation for the entry screen: hover in place, scroll the ground
pub fn idle_tick(mut state: SimState, config: &SimConfig, elapsed_ms: f32) -> SimState {
    if elapsed_ms <= 0.0 {
        return state;
    }
    state.idle_time += elapsed_ms / 1000.0;
    state.actor.pos.y = Actor::HOME_Y + (state.idle_time * IDLE_BOB_SPEED).sin() * IDLE_BOB_HEIGHT;
    state.actor.vel = 0.0;
    state.actor.rotation = 0.0;
    scroll_ground(&mut state, config, elapsed_ms);
    state
}

fn scroll_ground(state: &mut SimState, config: &SimConfig, elapsed_ms: f32) {
    let shift = config.obstacle_speed * frame_scale(elapsed_ms);
    state.ground_offset = (state.ground_offset + shift).rem_euclid(GROUND_TILE_WIDTH);
}
