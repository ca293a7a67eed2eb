//! Projectile events (input layer → simulation → renderer)

use bevy::prelude::*;

use super::ballistics::LaunchError;

/// Event: the archer released the string (input layer → simulation).
///
/// `direction` need not be normalized; `tension` scales launch speed.
#[derive(Event, Debug, Clone)]
pub struct FireArrow {
    pub origin: Vec3,
    pub direction: Vec3,
    pub tension: f32,
}

/// Event: projectile created from a `FireArrow`.
#[derive(Event, Debug, Clone)]
pub struct ArrowShot {
    pub projectile: Entity,
    pub origin: Vec3,
    pub direction: Dir3,
    pub tension: f32,
    pub speed: f32,
}

/// Event: a `FireArrow` was invalid and produced no projectile.
#[derive(Event, Debug, Clone)]
pub struct ArrowRejected {
    pub error: LaunchError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactSurface {
    Target(Entity),
    Ground,
}

/// Event: an in-flight arrow became embedded.
///
/// Target impacts are scored by the hit evaluator; ground impacts are cosmetic.
#[derive(Event, Debug, Clone)]
pub struct ArrowImpact {
    pub projectile: Entity,
    pub surface: ImpactSurface,
    pub point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Lifetime ran out before hitting anything.
    Expired,
    /// Embedded display countdown finished.
    DisplayElapsed,
}

/// Event: projectile entity despawned.
#[derive(Event, Debug, Clone)]
pub struct ProjectileRemoved {
    pub projectile: Entity,
    pub reason: RemovalReason,
}
