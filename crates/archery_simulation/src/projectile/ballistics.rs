//! Pure flight math: launch validation, integration, swept collision.
//!
//! No ECS access here; systems feed in component data and apply the results.

use bevy::prelude::*;
use std::time::Duration;
use thiserror::Error;

use super::components::{Projectile, ProjectileState};

/// Segments shorter than this are tested as a point.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    #[error("launch direction {0:?} is zero-length or not finite")]
    DegenerateDirection(Vec3),

    #[error("launch origin {0:?} is not finite")]
    NonFiniteOrigin(Vec3),

    #[error("launch speed must be positive and finite (got {0})")]
    InvalidSpeed(f32),

    #[error("draw tension must be positive and finite (got {0})")]
    InvalidTension(f32),
}

/// Result of a swept collision query against targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub target: Entity,
    /// Impact point on the target face (world space), see [`face_impact`].
    pub point: Vec3,
    /// Distance travelled along the segment before entering the proximity sphere.
    pub distance: f32,
}

/// Creates an in-flight projectile moving along `direction` at `speed`.
///
/// `direction` is normalized here; zero or non-finite vectors are rejected.
pub fn launch(
    origin: Vec3,
    direction: Vec3,
    speed: f32,
    now: Duration,
    max_lifetime: Duration,
) -> Result<Projectile, LaunchError> {
    if !origin.is_finite() {
        return Err(LaunchError::NonFiniteOrigin(origin));
    }
    if !speed.is_finite() || speed <= 0.0 {
        return Err(LaunchError::InvalidSpeed(speed));
    }
    let dir = Dir3::new(direction).map_err(|_| LaunchError::DegenerateDirection(direction))?;

    Ok(Projectile {
        position: origin,
        previous_position: origin,
        velocity: *dir * speed,
        launched_at: now,
        max_lifetime,
        state: ProjectileState::InFlight,
    })
}

/// One semi-implicit Euler step. No-op unless the projectile is in flight.
///
/// Acceleration is applied to velocity first, then the new velocity moves the
/// position; with zero acceleration this is plain `position += velocity * dt`.
pub fn advance(projectile: &mut Projectile, acceleration: Vec3, dt: f32) {
    if !projectile.is_in_flight() {
        return;
    }
    projectile.previous_position = projectile.position;
    projectile.velocity += acceleration * dt;
    projectile.position += projectile.velocity * dt;
}

/// First target hit by the projectile's last step (previous → current position).
///
/// Each candidate is a sphere of `radius` around the target position; it only
/// decides whether and which target is hit. The entry nearest along the travel
/// direction wins; an arrow starting inside a sphere collides at distance 0.
/// The reported point lies on the winner's face. An empty candidate set yields `None`.
pub fn check_collision<I>(projectile: &Projectile, targets: I, radius: f32) -> Option<Collision>
where
    I: IntoIterator<Item = (Entity, Transform)>,
{
    let start = projectile.previous_position;
    let end = projectile.position;

    let mut nearest: Option<(Entity, Transform, f32)> = None;
    for (target, transform) in targets {
        let Some(distance) = segment_sphere_entry(start, end, transform.translation, radius) else {
            continue;
        };
        if nearest.is_none_or(|(_, _, best)| distance < best) {
            nearest = Some((target, transform, distance));
        }
    }

    nearest.map(|(target, transform, distance)| Collision {
        target,
        point: face_impact(start, end, &transform, radius),
        distance,
    })
}

/// Where the line of travel through `start → end` meets the target face
/// (the local z = 0 plane).
///
/// Falls back to the point of the line closest to the target center when the
/// arrow runs parallel to the face, has already passed it, or would meet it
/// outside the proximity sphere.
pub fn face_impact(start: Vec3, end: Vec3, target: &Transform, radius: f32) -> Vec3 {
    let to_local = target.compute_affine().inverse();
    let local_start = to_local.transform_point3(start);
    let local_step = to_local.transform_point3(end) - local_start;

    if local_step.z.abs() > MIN_SEGMENT_LENGTH {
        let t = -local_start.z / local_step.z;
        if t >= 0.0 {
            let point = target.transform_point(local_start + local_step * t);
            if point.distance(target.translation) <= radius {
                return point;
            }
        }
    }

    let step_squared = local_step.length_squared();
    let t = if step_squared > MIN_SEGMENT_LENGTH * MIN_SEGMENT_LENGTH {
        (-local_start.dot(local_step) / step_squared).max(0.0)
    } else {
        0.0
    };
    target.transform_point(local_start + local_step * t)
}

/// Where the projectile's last step crossed the ground plane, with the distance
/// travelled before the crossing.
pub fn ground_crossing(projectile: &Projectile, ground_height: f32) -> Option<(Vec3, f32)> {
    let start = projectile.previous_position;
    let end = projectile.position;

    if !(start.y > ground_height && end.y <= ground_height) {
        return None;
    }
    let t = (start.y - ground_height) / (start.y - end.y);
    let point = start.lerp(end, t);
    Some((point, start.distance(end) * t))
}

/// Distance along `start → end` at which the segment enters the sphere.
fn segment_sphere_entry(start: Vec3, end: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = start - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let segment = end - start;
    let length = segment.length();
    if length < MIN_SEGMENT_LENGTH {
        return None;
    }

    // |start + t*segment - center|^2 = r^2, solved for the smaller root
    let a = segment.length_squared();
    let b = 2.0 * offset.dot(segment);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(length * t)
}
