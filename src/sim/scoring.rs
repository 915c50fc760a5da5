//! Scoring events: obstacle passes and pickup collection
//!
//! These only report what happened this tick. Combo and multiplier rules
//! belong to the session controller.

use super::state::{Actor, Obstacle, Pickup, PickupKind};
use crate::config::SimConfig;
use crate::consts::PICKUP_RADIUS;

/// Mark obstacles the actor has just cleared. Returns how many flipped.
///
/// An obstacle scores once, when the actor center moves strictly past its
/// trailing edge plus `pass_offset`.
pub fn detect_passes(obstacles: &mut [Obstacle], actor: &Actor, config: &SimConfig) -> u32 {
    let mut passed = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.passed) {
        let line = obstacle.trailing_edge(config.obstacle_width) + config.pass_offset;
        if actor.pos.x > line {
            obstacle.passed = true;
            passed += 1;
        }
    }
    passed
}

/// One pickup taken this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectedPickup {
    pub kind: PickupKind,
    pub value: u32,
}

/// Everything collected in a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickupBatch {
    pub items: Vec<CollectedPickup>,
}

impl PickupBatch {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Sum of raw values, before any multiplier
    pub fn value(&self) -> u32 {
        self.items.iter().map(|p| p.value).sum()
    }

    pub fn rare_count(&self) -> u32 {
        self.items
            .iter()
            .filter(|p| p.kind == PickupKind::Rare)
            .count() as u32
    }
}

/// Collect every uncollected pickup within reach (circle-circle, inclusive)
pub fn collect_pickups(pickups: &mut [Pickup], actor: &Actor) -> PickupBatch {
    let reach = actor.hitbox_radius + PICKUP_RADIUS;
    let reach_sq = reach * reach;

    let items = pickups
        .iter_mut()
        .filter(|p| !p.collected && p.pos.distance_squared(actor.pos) <= reach_sq)
        .map(|p| {
            p.collected = true;
            CollectedPickup {
                kind: p.kind,
                value: p.value,
            }
        })
        .collect();

    PickupBatch { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ACTOR_X;
    use glam::Vec2;
    use proptest::prelude::*;

    #[test]
    fn test_pass_is_strict_and_once() {
        let config = SimConfig::default();
        let actor = Actor::default();
        // Scoring line sits exactly on the actor center
        let x = actor.pos.x - config.obstacle_width - config.pass_offset;
        let mut obstacles = [Obstacle::new(x, 200.0)];

        assert_eq!(detect_passes(&mut obstacles, &actor, &config), 0);
        assert!(!obstacles[0].passed);

        obstacles[0].x -= 0.5;
        assert_eq!(detect_passes(&mut obstacles, &actor, &config), 1);
        assert!(obstacles[0].passed);

        obstacles[0].x -= 50.0;
        assert_eq!(detect_passes(&mut obstacles, &actor, &config), 0);
        assert!(obstacles[0].passed);
    }

    #[test]
    fn test_collect_two_in_one_batch() {
        let actor = Actor::default();
        let mut pickups = [
            Pickup::new(actor.pos + Vec2::new(5.0, 0.0), PickupKind::Normal),
            Pickup::new(actor.pos + Vec2::new(0.0, -8.0), PickupKind::Rare),
            Pickup::new(actor.pos + Vec2::new(120.0, 0.0), PickupKind::Normal),
        ];

        let batch = collect_pickups(&mut pickups, &actor);
        assert_eq!(batch.count(), 2);
        assert_eq!(
            batch.items,
            vec![
                CollectedPickup { kind: PickupKind::Normal, value: 1 },
                CollectedPickup { kind: PickupKind::Rare, value: 3 },
            ]
        );
        assert_eq!(batch.value(), 4);
        assert_eq!(batch.rare_count(), 1);
        assert!(pickups[0].collected && pickups[1].collected);
        assert!(!pickups[2].collected);

        // Already collected pickups are not collected twice
        assert!(collect_pickups(&mut pickups, &actor).is_empty());
    }

    #[test]
    fn test_collect_reach_is_inclusive() {
        let actor = Actor::default();
        let reach = actor.hitbox_radius + PICKUP_RADIUS;
        let edge = Vec2::new(ACTOR_X + reach, actor.pos.y);
        let mut pickups = [Pickup::new(edge, PickupKind::Normal)];
        assert_eq!(collect_pickups(&mut pickups, &actor).count(), 1);

        let beyond = Vec2::new(ACTOR_X + reach + 0.01, actor.pos.y);
        let mut far = [Pickup::new(beyond, PickupKind::Normal)];
        assert!(collect_pickups(&mut far, &actor).is_empty());
    }

    proptest! {
        #[test]
        fn prop_passed_flag_monotonic(steps in proptest::collection::vec(0.0f32..20.0, 1..200)) {
            let config = SimConfig::default();
            let actor = Actor::default();
            let mut obstacles = [Obstacle::new(400.0, 200.0)];
            let mut total = 0;
            let mut was_passed = false;
            for shift in steps {
                obstacles[0].x -= shift;
                total += detect_passes(&mut obstacles, &actor, &config);
                let line = obstacles[0].trailing_edge(config.obstacle_width) + config.pass_offset;
                if obstacles[0].passed && !was_passed {
                    prop_assert!(actor.pos.x > line);
                }
                prop_assert!(!was_passed || obstacles[0].passed);
                was_passed = obstacles[0].passed;
            }
            prop_assert!(total <= 1);
        }
    }
}
