//! Target systems: hit application, movement, delayed despawn

use bevy::prelude::*;

use super::components::{DespawnAfter, Oscillation, Target};
use super::events::{TargetDestroyed, TargetHit};
use super::hit::{self, HitError};
use crate::config::ArcheryConfig;
use crate::projectile::{ArrowImpact, ImpactSurface};

/// System: ArrowImpact → hit evaluation → TargetHit / TargetDestroyed
///
/// 1. Ground impacts are ignored (nothing to score)
/// 2. Impacts on despawned or already destroyed targets are no-ops
/// 3. A destroying hit stops oscillation and schedules despawn after the
///    destroy animation delay
pub fn apply_impacts(
    mut commands: Commands,
    mut impact_events: EventReader<ArrowImpact>,
    mut hit_events: EventWriter<TargetHit>,
    mut destroyed_events: EventWriter<TargetDestroyed>,
    mut targets: Query<(&mut Target, &Transform)>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    for impact in impact_events.read() {
        let ImpactSurface::Target(entity) = impact.surface else {
            continue;
        };

        let Ok((mut target, transform)) = targets.get_mut(entity) else {
            crate::logger::log(&format!("Impact on missing target {:?} ignored", entity));
            continue;
        };

        let result = match hit::evaluate(&mut *target, transform, Some(impact.point)) {
            Ok(result) => result,
            Err(HitError::InactiveTarget) => {
                crate::logger::log(&format!("Impact on destroyed target {:?} ignored", entity));
                continue;
            }
            Err(error) => {
                crate::logger::log_warning(&format!("⚠️ Hit on {:?} rejected: {}", entity, error));
                continue;
            }
        };

        hit_events.write(TargetHit {
            target: entity,
            projectile: impact.projectile,
            zone: result.zone,
            precision_multiplier: result.precision_multiplier,
            points: result.points,
            position: transform.translation,
            impact_point: impact.point,
            distance: result.distance,
        });

        crate::logger::log(&format!(
            "🎯 Target {:?} hit: {} ({} pts, d={:.3}, hp left {})",
            entity,
            result.zone.as_str(),
            result.points,
            result.distance,
            target.hit_points
        ));

        if !result.destroyed {
            continue;
        }

        destroyed_events.write(TargetDestroyed {
            target: entity,
            points: target.point_value,
            total_hits: result.total_hits,
            bonus_points: result.bonus_points,
            position: transform.translation,
        });

        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.remove::<Oscillation>();
            entity_commands.insert(DespawnAfter {
                despawn_at: time.elapsed() + config.zones.destroy_display(),
            });
        }

        crate::logger::log_info(&format!(
            "💥 Target {:?} destroyed after {} hits (+{} bonus)",
            entity, result.total_hits, result.bonus_points
        ));
    }
}

/// System: move oscillating targets
///
/// Only Active targets move; a destroyed target freezes on the tick it is destroyed.
pub fn oscillate_targets(
    mut targets: Query<(&Target, &Oscillation, &mut Transform)>,
    time: Res<Time>,
) {
    let now = time.elapsed();

    for (target, oscillation, mut transform) in targets.iter_mut() {
        if !target.is_active() {
            continue;
        }
        transform.translation = oscillation.position_at(now);
    }
}

/// System: despawn entities whose DespawnAfter deadline has passed
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let now = time.elapsed();

    for (entity, despawn_after) in query.iter() {
        if now >= despawn_after.despawn_at {
            crate::logger::log(&format!("🧹 Despawning target {:?} (destroy animation done)", entity));
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
        }
    }
}
