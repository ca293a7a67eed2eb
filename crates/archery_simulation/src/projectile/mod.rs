//! Projectile simulator
//!
//! Architecture:
//! - `ballistics`: pure math (launch validation, integration, swept collision)
//! - `components`: Projectile + lifecycle state
//! - `systems`: fire requests, advance, impact detection, cleanup
//!
//! Flow (one fixed tick):
//! FireArrow → spawn Projectile (ArrowShot) → advance → detect_impacts (ArrowImpact)
//! → ... hit evaluation ... → cleanup (ProjectileRemoved)

use bevy::prelude::*;

use crate::ArcherySet;

pub mod ballistics;
pub mod components;
pub mod events;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod ballistics_tests;

pub use ballistics::{
    advance, check_collision, face_impact, ground_crossing, launch, Collision, LaunchError,
};
pub use components::{Projectile, ProjectileState};
pub use events::{
    ArrowImpact, ArrowRejected, ArrowShot, FireArrow, ImpactSurface, ProjectileRemoved,
    RemovalReason,
};

/// Projectile Plugin
///
/// Execution order (FixedUpdate):
/// 1. process_fire_requests: FireArrow → Projectile entity
/// 2. advance_projectiles: integration + lifetime expiry
/// 3. detect_impacts: swept collision → ArrowImpact
/// 4. cleanup_projectiles (Cleanup set): despawn + ProjectileRemoved
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Projectile>()
            .add_event::<FireArrow>()
            .add_event::<ArrowShot>()
            .add_event::<ArrowRejected>()
            .add_event::<ArrowImpact>()
            .add_event::<ProjectileRemoved>();

        app.add_systems(
            FixedUpdate,
            (
                systems::process_fire_requests,
                systems::advance_projectiles,
                systems::detect_impacts,
            )
                .chain()
                .in_set(ArcherySet::Projectiles),
        )
        .add_systems(
            FixedUpdate,
            systems::cleanup_projectiles.in_set(ArcherySet::Cleanup),
        );
    }
}
