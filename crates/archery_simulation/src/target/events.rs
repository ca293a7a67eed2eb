//! Target events

use bevy::prelude::*;

use super::hit::HitZone;

/// Event: a target was scored.
///
/// `precision_multiplier` comes from the zone; the combo multiplier is applied
/// later by score aggregation.
#[derive(Event, Debug, Clone)]
pub struct TargetHit {
    pub target: Entity,
    pub projectile: Entity,
    pub zone: HitZone,
    pub precision_multiplier: f32,
    pub points: u32,
    /// Target position at impact time.
    pub position: Vec3,
    pub impact_point: Vec3,
    /// Planar distance from the target center.
    pub distance: f32,
}

/// Event: a target's hit points reached 0 (emitted once per target).
#[derive(Event, Debug, Clone)]
pub struct TargetDestroyed {
    pub target: Entity,
    /// Base point value of the target.
    pub points: u32,
    pub total_hits: u32,
    /// Half of the destroying hit's points, rounded down.
    pub bonus_points: u32,
    pub position: Vec3,
}

/// Event: the presentation of a target went away (no scoring).
///
/// Frees spawn capacity and despawns the target.
#[derive(Event, Debug, Clone)]
pub struct RemoveTarget {
    pub target: Entity,
}
