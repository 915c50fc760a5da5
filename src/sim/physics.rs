//! Per-tick motion
//!
//! Pure functions: state in, state out. Elapsed time is normalized to
//! reference frames (`dt`, 1.0 = 1/60 s) so tunables read as "per frame".

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Actor, Obstacle, Pickup, PickupKind};
use crate::config::SimConfig;
use crate::consts::*;
use crate::frame_scale;

/// Apply gravity, integrate position, derive rotation.
///
/// Velocity is clamped to terminal velocity before the position update when
/// `clamp_terminal_velocity` is set; otherwise it grows without bound.
pub fn integrate(actor: Actor, config: &SimConfig, elapsed_ms: f32) -> Actor {
    let dt = frame_scale(elapsed_ms);
    if dt == 0.0 {
        return actor;
    }

    let mut vel = actor.vel + config.gravity * dt;
    if config.clamp_terminal_velocity {
        vel = vel.min(config.terminal_velocity);
    }

    Actor {
        pos: Vec2::new(actor.pos.x, actor.pos.y + vel * dt),
        vel,
        rotation: rotation_for(vel),
        ..actor
    }
}

/// Nose-down while falling, nose-up while rising, both capped
pub fn rotation_for(vel: f32) -> f32 {
    if vel > 0.0 {
        (vel * ROTATION_FALL_SCALE).min(ROTATION_NOSE_DOWN)
    } else {
        (vel * ROTATION_RISE_SCALE).max(ROTATION_NOSE_UP)
    }
}

/// Overwrite velocity with the flap impulse. Horizontal position is untouched.
pub fn flap(actor: Actor, config: &SimConfig) -> Actor {
    Actor {
        vel: config.flap_strength,
        ..actor
    }
}

/// New obstacle at `x` with a uniformly random gap center inside the safe band
pub fn spawn_obstacle(x: f32, config: &SimConfig, rng: &mut dyn RandomSource) -> Obstacle {
    let (min, max) = config.gap_center_range();
    Obstacle::new(x, rng.range(min, max))
}

/// Result of advancing the obstacle set
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleAdvance {
    pub obstacles: Vec<Obstacle>,
    /// Obstacle appended this tick, if any
    pub spawned: Option<Obstacle>,
}

/// Scroll obstacles left, drop the ones fully off-screen, then append one at
/// the right edge if the rightmost has moved past the spacing threshold.
///
/// Spacing is measured against already-shifted positions.
pub fn advance_obstacles(
    mut obstacles: Vec<Obstacle>,
    config: &SimConfig,
    elapsed_ms: f32,
    rng: &mut dyn RandomSource,
) -> ObstacleAdvance {
    let shift = config.obstacle_speed * frame_scale(elapsed_ms);

    for obstacle in &mut obstacles {
        obstacle.x -= shift;
    }

    obstacles.retain(|o| o.x > -config.obstacle_width);

    let needs_spawn = obstacles
        .last()
        .is_none_or(|last| last.x < PLAYFIELD_WIDTH - config.obstacle_spacing);

    let spawned = if needs_spawn {
        let obstacle = spawn_obstacle(PLAYFIELD_WIDTH, config, rng);
        obstacles.push(obstacle);
        Some(obstacle)
    } else {
        None
    };

    ObstacleAdvance { obstacles, spawned }
}

/// Roll for a pickup in a freshly spawned obstacle's gap.
///
/// Skipped when another pickup sits within `pickup_min_distance` horizontally.
pub fn maybe_spawn_pickup(
    existing: &[Pickup],
    obstacle: &Obstacle,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Option<Pickup> {
    if !rng.chance(config.pickup_spawn_chance) {
        return None;
    }

    let pos = Vec2::new(obstacle.x + config.obstacle_width / 2.0, obstacle.gap_center);
    let crowded = existing
        .iter()
        .any(|p| (p.pos.x - pos.x).abs() < config.pickup_min_distance);
    if crowded {
        return None;
    }

    let kind = if rng.chance(config.rare_chance) {
        PickupKind::Rare
    } else {
        PickupKind::Normal
    };
    Some(Pickup::new(pos, kind))
}

/// Scroll pickups left; drop collected and off-screen ones
pub fn advance_pickups(
    mut pickups: Vec<Pickup>,
    config: &SimConfig,
    elapsed_ms: f32,
) -> Vec<Pickup> {
    let shift = config.obstacle_speed * frame_scale(elapsed_ms);
    for pickup in &mut pickups {
        pickup.pos.x -= shift;
    }
    pickups.retain(|p| !p.collected && p.pos.x + PICKUP_RADIUS > 0.0);
    pickups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{PcgRandom, ScriptedRandom};
    use proptest::prelude::*;

    fn ms(frames: f32) -> f32 {
        frames * REFERENCE_FRAME_MS
    }

    #[test]
    fn test_integrate_one_frame() {
        let config = SimConfig::default();
        let actor = integrate(Actor::default(), &config, ms(1.0));
        assert!((actor.vel - config.gravity).abs() < 1e-4);
        assert!((actor.pos.y - (Actor::HOME_Y + config.gravity)).abs() < 1e-3);
        assert_eq!(actor.pos.x, ACTOR_X);
    }

    #[test]
    fn test_integrate_clamps_to_terminal() {
        let config = SimConfig::default();
        let falling = Actor {
            vel: config.terminal_velocity - 0.1,
            ..Default::default()
        };
        let actor = integrate(falling, &config, ms(4.0));
        assert_eq!(actor.vel, config.terminal_velocity);
        let expected_y = Actor::HOME_Y + config.terminal_velocity * 4.0;
        assert!((actor.pos.y - expected_y).abs() < 1e-2);
    }

    #[test]
    fn test_integrate_unclamped_variant() {
        let config = SimConfig {
            clamp_terminal_velocity: false,
            ..Default::default()
        };
        let falling = Actor {
            vel: config.terminal_velocity,
            ..Default::default()
        };
        let actor = integrate(falling, &config, ms(2.0));
        assert!(actor.vel > config.terminal_velocity);
    }

    #[test]
    fn test_rotation_caps() {
        assert_eq!(rotation_for(0.0), 0.0);
        assert_eq!(rotation_for(10.0), 30.0);
        assert_eq!(rotation_for(100.0), ROTATION_NOSE_DOWN);
        assert_eq!(rotation_for(-5.0), -10.0);
        assert_eq!(rotation_for(-100.0), ROTATION_NOSE_UP);
    }

    #[test]
    fn test_flap_overwrites_velocity() {
        let config = SimConfig::default();
        let actor = Actor {
            vel: 7.5,
            ..Default::default()
        };
        let flapped = flap(flap(actor, &config), &config);
        assert_eq!(flapped.vel, config.flap_strength);
        assert_eq!(flapped.pos, actor.pos);
    }

    #[test]
    fn test_spawn_obstacle_uses_safe_band() {
        let config = SimConfig::default();
        let (min, max) = config.gap_center_range();

        let low = spawn_obstacle(PLAYFIELD_WIDTH, &config, &mut ScriptedRandom::constant(0.0));
        assert_eq!(low.gap_center, min);

        let high = spawn_obstacle(PLAYFIELD_WIDTH, &config, &mut ScriptedRandom::constant(0.999));
        assert!(high.gap_center < max && high.gap_center > max - 1.0);
    }

    #[test]
    fn test_advance_shifts_then_filters_then_spawns() {
        let config = SimConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let obstacles = vec![
            Obstacle::new(-config.obstacle_width + 1.0, 200.0),
            Obstacle::new(PLAYFIELD_WIDTH - config.obstacle_spacing + 1.0, 200.0),
        ];

        // 1 frame at speed 2.5: first drops off, second crosses the spawn threshold
        let result = advance_obstacles(obstacles, &config, ms(1.0), &mut rng);
        assert_eq!(result.obstacles.len(), 2);
        let expected = PLAYFIELD_WIDTH - config.obstacle_spacing - 1.5;
        assert!((result.obstacles[0].x - expected).abs() < 1e-3);
        assert_eq!(result.obstacles[1].x, PLAYFIELD_WIDTH);
        assert_eq!(result.spawned, Some(result.obstacles[1]));
    }

    #[test]
    fn test_advance_no_spawn_before_threshold() {
        let config = SimConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let obstacles = vec![Obstacle::new(PLAYFIELD_WIDTH, 200.0)];
        let result = advance_obstacles(obstacles, &config, ms(1.0), &mut rng);
        assert_eq!(result.obstacles.len(), 1);
        assert!(result.spawned.is_none());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_advance_empty_set_spawns() {
        let config = SimConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let result = advance_obstacles(Vec::new(), &config, 0.0, &mut rng);
        assert_eq!(result.obstacles.len(), 1);
    }

    #[test]
    fn test_pickup_spawn_rolls() {
        let config = SimConfig::default();
        let obstacle = Obstacle::new(PLAYFIELD_WIDTH, 250.0);

        let spawn = |roll: f32| {
            maybe_spawn_pickup(&[], &obstacle, &config, &mut ScriptedRandom::constant(roll))
        };

        // spawn roll 0.5 < 0.65, rarity roll 0.5 >= 0.1
        let pickup = spawn(0.5).unwrap();
        assert_eq!(pickup.kind, PickupKind::Normal);
        assert_eq!(pickup.pos, Vec2::new(PLAYFIELD_WIDTH + 30.0, 250.0));

        // spawn roll 0.05, rarity roll 0.05
        let rare = spawn(0.05).unwrap();
        assert_eq!(rare.kind, PickupKind::Rare);
        assert_eq!(rare.value, 3);

        // spawn roll fails
        assert!(spawn(0.9).is_none());
    }

    #[test]
    fn test_pickup_spawn_gated_by_distance() {
        let config = SimConfig::default();
        let obstacle = Obstacle::new(PLAYFIELD_WIDTH, 250.0);
        let nearby = [Pickup::new(Vec2::new(PLAYFIELD_WIDTH - 20.0, 100.0), PickupKind::Normal)];
        let mut rng = ScriptedRandom::constant(0.5);
        assert!(maybe_spawn_pickup(&nearby, &obstacle, &config, &mut rng).is_none());

        let far = [Pickup::new(Vec2::new(50.0, 100.0), PickupKind::Normal)];
        assert!(maybe_spawn_pickup(&far, &obstacle, &config, &mut rng).is_some());
    }

    #[test]
    fn test_advance_pickups_filters() {
        let config = SimConfig::default();
        let mut collected = Pickup::new(Vec2::new(200.0, 100.0), PickupKind::Normal);
        collected.collected = true;
        let pickups = vec![
            collected,
            Pickup::new(Vec2::new(-PICKUP_RADIUS + 1.0, 100.0), PickupKind::Normal),
            Pickup::new(Vec2::new(300.0, 100.0), PickupKind::Rare),
        ];
        let result = advance_pickups(pickups, &config, ms(1.0));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, PickupKind::Rare);
        assert!((result[0].pos.x - 297.5).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_zero_elapsed_is_noop(y in 50.0f32..450.0, vel in -10.0f32..10.0) {
            let config = SimConfig::default();
            let actor = Actor { pos: Vec2::new(ACTOR_X, y), vel, ..Default::default() };
            let next = integrate(actor, &config, 0.0);
            prop_assert_eq!(next, actor);
        }

        #[test]
        fn prop_flap_sets_exact_strength(vel in -100.0f32..100.0, strength in -20.0f32..-1.0) {
            let config = SimConfig { flap_strength: strength, ..Default::default() };
            let actor = Actor { vel, ..Default::default() };
            prop_assert_eq!(flap(actor, &config).vel, strength);
        }

        #[test]
        fn prop_obstacle_count_bounded(
            seed in any::<u64>(),
            frames in proptest::collection::vec(0.0f32..32.0, 1..400),
        ) {
            let config = SimConfig::default();
            let mut rng = PcgRandom::from_seed(seed);
            let bound = (PLAYFIELD_WIDTH / config.obstacle_spacing).ceil() as usize + 1;
            let mut obstacles = Vec::new();
            for elapsed in frames {
                let before = obstacles.len();
                let result = advance_obstacles(obstacles, &config, elapsed, &mut rng);
                obstacles = result.obstacles;
                prop_assert!(obstacles.len() <= before + 1);
                prop_assert!(obstacles.len() <= bound);
                prop_assert!(obstacles.windows(2).all(|w| w[0].x < w[1].x));
            }
        }
    }
}
