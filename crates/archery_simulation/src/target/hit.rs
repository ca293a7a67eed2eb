//! Hit evaluator: impact point → zone → points
//!
//! Formula:
//! - planar distance `d` in the target's local XY plane (local Z is depth, ignored)
//! - zone by radius, precision multiplier 3.0 / 2.0 / 1.0 / 0.5
//! - points = floor(point_value × multiplier)
//! - destruction bonus = floor(points × 0.5) on the hit that destroys the target

use bevy::prelude::*;
use thiserror::Error;

use super::components::Hittable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum HitZone {
    Bullseye,
    Middle,
    Outer,
    Edge,
}

impl HitZone {
    pub fn precision_multiplier(&self) -> f32 {
        match self {
            HitZone::Bullseye => 3.0,
            HitZone::Middle => 2.0,
            HitZone::Outer => 1.0,
            HitZone::Edge => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HitZone::Bullseye => "bullseye",
            HitZone::Middle => "middle",
            HitZone::Outer => "outer",
            HitZone::Edge => "edge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HitError {
    #[error("impact point is missing")]
    MissingImpactPoint,

    #[error("impact point {0:?} is not finite in the target frame")]
    NonFiniteImpactPoint(Vec3),

    #[error("target is no longer active")]
    InactiveTarget,
}

/// Outcome of one evaluated hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub zone: HitZone,
    pub precision_multiplier: f32,
    pub points: u32,
    /// Planar distance from the target center.
    pub distance: f32,
    pub destroyed: bool,
    /// Non-zero only on the destroying hit.
    pub bonus_points: u32,
    pub total_hits: u32,
}

/// Planar distance of a world-space point from the target center.
pub fn planar_distance(target_transform: &Transform, impact_point: Vec3) -> Result<f32, HitError> {
    if !impact_point.is_finite() {
        return Err(HitError::NonFiniteImpactPoint(impact_point));
    }
    let local = target_transform
        .compute_affine()
        .inverse()
        .transform_point3(impact_point);
    if !local.is_finite() {
        return Err(HitError::NonFiniteImpactPoint(impact_point));
    }
    Ok(local.truncate().length())
}

pub fn points_for(point_value: u32, zone: HitZone) -> u32 {
    (point_value as f32 * zone.precision_multiplier()).floor() as u32
}

pub fn destruction_bonus(points: u32) -> u32 {
    points / 2
}

/// Scores an impact and applies it to the target.
///
/// Errors leave the target untouched.
pub fn evaluate<T: Hittable>(
    target: &mut T,
    target_transform: &Transform,
    impact_point: Option<Vec3>,
) -> Result<HitResult, HitError> {
    let impact_point = impact_point.ok_or(HitError::MissingImpactPoint)?;
    if !target.is_active() {
        return Err(HitError::InactiveTarget);
    }

    let distance = planar_distance(target_transform, impact_point)?;
    let zone = target.zone_radii().classify(distance);
    let points = points_for(target.point_value(), zone);

    let destroyed = target.register_hit();
    let bonus_points = if destroyed { destruction_bonus(points) } else { 0 };

    Ok(HitResult {
        zone,
        precision_multiplier: zone.precision_multiplier(),
        points,
        distance,
        destroyed,
        bonus_points,
        total_hits: target.hit_count(),
    })
}
