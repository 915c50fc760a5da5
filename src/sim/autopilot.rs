//! Simple autopilot for demo/attract play
//!
//! Aims for the center of the next gap and flaps whenever the actor sinks
//! below it.

use super::state::SimState;
use crate::config::SimConfig;
use crate::consts::GROUND_Y;

/// How far below the target the actor may sink before flapping
const FLAP_BIAS: f32 = 10.0;

/// Height the autopilot is steering toward
pub fn target_height(state: &SimState, config: &SimConfig) -> f32 {
    let actor = &state.actor;
    state
        .obstacles
        .iter()
        .find(|o| o.trailing_edge(config.obstacle_width) >= actor.hitbox_left())
        .map(|o| o.gap_center)
        .unwrap_or(GROUND_Y / 2.0)
}

/// True when the actor should flap this frame
pub fn should_flap(state: &SimState, config: &SimConfig) -> bool {
    let actor = &state.actor;
    actor.vel >= 0.0 && actor.pos.y > target_height(state, config) + FLAP_BIAS
}
