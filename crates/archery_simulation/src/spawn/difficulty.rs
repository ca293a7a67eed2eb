//! Difficulty tiers → per-spawn target parameters
//!
//! | tier   | points | hp                | movable | radius scale   |
//! |--------|--------|-------------------|---------|----------------|
//! | easy   | 10     | 1                 | 0%      | 1.0            |
//! | normal | 15     | 1 (30% chance: 2) | 30%     | U(0.85, 1.15)  |
//! | hard   | 20     | U{1, 2, 3}        | 50%     | U(0.7, 1.0)    |

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::{Difficulty, SpawnConfig, TargetZoneConfig};
use crate::target::ZoneRadii;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitPointRoll {
    Fixed(u32),
    /// `upgraded` with probability `chance`, otherwise `base`.
    Chance { base: u32, upgraded: u32, chance: f64 },
    /// Uniform over `min..=max`.
    Uniform { min: u32, max: u32 },
}

impl HitPointRoll {
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        match *self {
            HitPointRoll::Fixed(hp) => hp,
            HitPointRoll::Chance { base, upgraded, chance } => {
                if rng.gen_bool(chance) {
                    upgraded
                } else {
                    base
                }
            }
            HitPointRoll::Uniform { min, max } => rng.gen_range(min..=max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub point_value: u32,
    pub hit_points: HitPointRoll,
    pub movable_chance: f64,
    /// Uniform factor applied to all three zone radii.
    pub radius_scale: (f32, f32),
}

impl TierProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                point_value: 10,
                hit_points: HitPointRoll::Fixed(1),
                movable_chance: 0.0,
                radius_scale: (1.0, 1.0),
            },
            Difficulty::Normal => Self {
                point_value: 15,
                hit_points: HitPointRoll::Chance {
                    base: 1,
                    upgraded: 2,
                    chance: 0.3,
                },
                movable_chance: 0.3,
                radius_scale: (0.85, 1.15),
            },
            Difficulty::Hard => Self {
                point_value: 20,
                hit_points: HitPointRoll::Uniform { min: 1, max: 3 },
                movable_chance: 0.5,
                radius_scale: (0.7, 1.0),
            },
        }
    }
}

/// Everything needed to spawn one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBlueprint {
    pub position: Vec3,
    pub point_value: u32,
    pub hit_points: u32,
    pub movable: bool,
    pub radii: ZoneRadii,
    /// Oscillation phase in [0, 2π), only meaningful when movable.
    pub phase: f32,
}

/// Draws one target. Draw order is fixed so a seed reproduces a session.
pub fn roll_blueprint(
    rng: &mut impl Rng,
    difficulty: Difficulty,
    spawn: &SpawnConfig,
    zones: &TargetZoneConfig,
) -> TargetBlueprint {
    let profile = TierProfile::for_difficulty(difficulty);

    let position = Vec3::new(
        rng.gen_range(spawn.x_range[0]..=spawn.x_range[1]),
        rng.gen_range(spawn.y_range[0]..=spawn.y_range[1]),
        rng.gen_range(spawn.z_range[0]..=spawn.z_range[1]),
    );
    let hit_points = profile.hit_points.roll(rng);
    let movable = rng.gen_bool(profile.movable_chance);
    let (scale_min, scale_max) = profile.radius_scale;
    let scale = rng.gen_range(scale_min..=scale_max);
    let phase = rng.gen_range(0.0..TAU);

    TargetBlueprint {
        position,
        point_value: profile.point_value,
        hit_points,
        movable,
        radii: ZoneRadii::from_config(zones).scaled(scale),
        phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roll_many(difficulty: Difficulty, count: usize) -> Vec<TargetBlueprint> {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spawn = SpawnConfig::default();
        let zones = TargetZoneConfig::default();
        (0..count)
            .map(|_| roll_blueprint(&mut rng, difficulty, &spawn, &zones))
            .collect()
    }

    #[test]
    fn test_easy_targets_are_static_single_hit() {
        for blueprint in roll_many(Difficulty::Easy, 200) {
            assert_eq!(blueprint.point_value, 10);
            assert_eq!(blueprint.hit_points, 1);
            assert!(!blueprint.movable);
            assert_eq!(blueprint.radii, ZoneRadii::from_config(&TargetZoneConfig::default()));
        }
    }

    #[test]
    fn test_normal_tier_rolls() {
        let blueprints = roll_many(Difficulty::Normal, 500);

        assert!(blueprints.iter().all(|b| b.point_value == 15));
        assert!(blueprints.iter().all(|b| b.hit_points == 1 || b.hit_points == 2));
        assert!(blueprints.iter().any(|b| b.hit_points == 2));
        assert!(blueprints.iter().any(|b| b.movable));
        assert!(blueprints.iter().any(|b| !b.movable));
        for b in &blueprints {
            assert!(b.radii.center >= 0.1 * 0.85 - 1e-6 && b.radii.center <= 0.1 * 1.15 + 1e-6);
        }
    }

    #[test]
    fn test_hard_tier_rolls_full_hp_range() {
        let blueprints = roll_many(Difficulty::Hard, 500);

        assert!(blueprints.iter().all(|b| b.point_value == 20));
        for hp in 1..=3 {
            assert!(blueprints.iter().any(|b| b.hit_points == hp), "hp {} never rolled", hp);
        }
        assert!(blueprints.iter().all(|b| (1..=3).contains(&b.hit_points)));
    }

    #[test]
    fn test_positions_stay_in_bounds_and_radii_ordered() {
        let spawn = SpawnConfig::default();
        for b in roll_many(Difficulty::Hard, 300) {
            assert!((spawn.x_range[0]..=spawn.x_range[1]).contains(&b.position.x));
            assert!((spawn.y_range[0]..=spawn.y_range[1]).contains(&b.position.y));
            assert!((spawn.z_range[0]..=spawn.z_range[1]).contains(&b.position.z));
            assert!(b.radii.center < b.radii.middle && b.radii.middle < b.radii.outer);
            assert!((0.0..TAU).contains(&b.phase));
        }
    }

    #[test]
    fn test_same_seed_same_blueprints() {
        assert_eq!(roll_many(Difficulty::Normal, 20), roll_many(Difficulty::Normal, 20));
    }
}
