//! Targets + hit evaluator
//!
//! Architecture:
//! - `components`: Target (hit points, radii, state), Oscillation, DespawnAfter
//! - `hit`: pure scoring (`evaluate` over any `Hittable`)
//! - `systems`: ArrowImpact → TargetHit/TargetDestroyed, movement, delayed despawn
//!
//! Target entities are spawned by the spawn director; this module owns their
//! hit-point mutation and their Active → Destroyed transition.

use bevy::prelude::*;

use crate::ArcherySet;

pub mod components;
pub mod events;
pub mod hit;
pub mod systems;


pub use components::{DespawnAfter, Hittable, Oscillation, Target, TargetState, ZoneRadii};
pub use events::{RemoveTarget, TargetDestroyed, TargetHit};
pub use hit::{destruction_bonus, evaluate, points_for, HitError, HitResult, HitZone};

/// Target Plugin
///
/// - Targets set: oscillate_targets (movable targets drift before collision checks)
/// - Hits set: apply_impacts
/// - Cleanup set: despawn_after_timeout
pub struct TargetPlugin;

impl Plugin for TargetPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Target>()
            .register_type::<Oscillation>()
            .add_event::<TargetHit>()
            .add_event::<TargetDestroyed>()
            .add_event::<RemoveTarget>();

        app.add_systems(
            FixedUpdate,
            systems::oscillate_targets.in_set(ArcherySet::Targets),
        )
        .add_systems(FixedUpdate, systems::apply_impacts.in_set(ArcherySet::Hits))
        .add_systems(
            FixedUpdate,
            systems::despawn_after_timeout.in_set(ArcherySet::Cleanup),
        );
    }
}
