//! Collision detection for the actor's hitbox circle
//!
//! All comparisons are inclusive: touching a boundary exactly is a hit.

use super::state::{Actor, CollisionKind, Obstacle};
use crate::config::SimConfig;
use crate::consts::GROUND_Y;

/// Hitbox touches or crosses the ground plane
#[inline]
pub fn hits_ground(actor: &Actor) -> bool {
    actor.hitbox_bottom() >= GROUND_Y
}

/// Hitbox touches or crosses the top of the playfield
#[inline]
pub fn hits_ceiling(actor: &Actor) -> bool {
    actor.hitbox_top() <= 0.0
}

/// Actor overlaps the obstacle's columns and is not strictly inside its gap
pub fn hits_obstacle(actor: &Actor, obstacle: &Obstacle, config: &SimConfig) -> bool {
    let overlaps_x = actor.hitbox_right() >= obstacle.x
        && actor.hitbox_left() <= obstacle.trailing_edge(config.obstacle_width);
    if !overlaps_x {
        return false;
    }

    let inside_gap = actor.hitbox_top() > obstacle.gap_top(config.gap_height)
        && actor.hitbox_bottom() < obstacle.gap_bottom(config.gap_height);
    !inside_gap
}

/// First collision found, checking ground, ceiling, then obstacles left to right
pub fn detect_collision(
    actor: &Actor,
    obstacles: &[Obstacle],
    config: &SimConfig,
) -> Option<CollisionKind> {
    if hits_ground(actor) {
        return Some(CollisionKind::Ground);
    }
    if hits_ceiling(actor) {
        return Some(CollisionKind::Ceiling);
    }
    obstacles
        .iter()
        .any(|o| hits_obstacle(actor, o, config))
        .then_some(CollisionKind::Obstacle)
}
