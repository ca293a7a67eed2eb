//! Projectile systems (FixedUpdate, ArcherySet::Projectiles / Cleanup)

use bevy::prelude::*;

use super::ballistics::{self, LaunchError};
use super::components::{Projectile, ProjectileState};
use super::events::{
    ArrowImpact, ArrowRejected, ArrowShot, FireArrow, ImpactSurface, ProjectileRemoved,
    RemovalReason,
};
use crate::config::ArcheryConfig;
use crate::target::Target;

/// System: FireArrow → spawn projectile entity
///
/// Launch speed = configured speed × draw tension.
/// Invalid requests are logged and reported via ArrowRejected, nothing is spawned.
pub fn process_fire_requests(
    mut commands: Commands,
    mut fire_events: EventReader<FireArrow>,
    mut shot_events: EventWriter<ArrowShot>,
    mut rejected_events: EventWriter<ArrowRejected>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed();

    for fire in fire_events.read() {
        let result = if fire.tension.is_finite() && fire.tension > 0.0 {
            ballistics::launch(
                fire.origin,
                fire.direction,
                config.projectile.speed * fire.tension,
                now,
                config.projectile.max_lifetime(),
            )
        } else {
            Err(LaunchError::InvalidTension(fire.tension))
        };

        let projectile = match result {
            Ok(projectile) => projectile,
            Err(error) => {
                crate::logger::log_warning(&format!("⚠️ FireArrow rejected: {}", error));
                rejected_events.write(ArrowRejected { error });
                continue;
            }
        };

        // launch() only succeeds for a non-degenerate velocity
        let Some(direction) = projectile.heading() else {
            continue;
        };
        let speed = projectile.velocity.length();
        let transform = Transform::from_translation(projectile.position)
            .with_rotation(Quat::from_rotation_arc(Vec3::NEG_Z, *direction));

        let entity = commands.spawn((projectile, transform)).id();

        shot_events.write(ArrowShot {
            projectile: entity,
            origin: fire.origin,
            direction,
            tension: fire.tension,
            speed,
        });

        crate::logger::log(&format!(
            "🏹 Arrow {:?} shot from {:.2?} (tension {:.2}, speed {:.1} m/s)",
            entity, fire.origin, fire.tension, speed
        ));
    }
}

/// System: integrate in-flight projectiles, expire the ones past their lifetime
///
/// Expired arrows are only flagged here; cleanup_projectiles despawns them.
pub fn advance_projectiles(
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed();
    let dt = time.delta_secs();
    let acceleration = config.projectile.acceleration();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        if !projectile.is_in_flight() {
            continue;
        }

        if projectile.is_expired(now) {
            projectile.expire();
            crate::logger::log(&format!("⌛ Arrow {:?} expired in flight", entity));
            continue;
        }

        ballistics::advance(&mut projectile, acceleration, dt);

        transform.translation = projectile.position;
        if let Some(heading) = projectile.heading() {
            transform.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, *heading);
        }
    }
}

/// System: swept collision against active targets and the ground plane
///
/// Nearest surface along the last step wins. The arrow is embedded at the
/// contact point (on the target face for targets) and an ArrowImpact is
/// emitted for the hit evaluator.
pub fn detect_impacts(
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    targets: Query<(Entity, &Transform, &Target), Without<Projectile>>,
    mut impact_events: EventWriter<ArrowImpact>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed();
    let radius = config.projectile.collision_radius;
    let display = config.projectile.embed_display();

    let candidates: Vec<(Entity, Transform)> = targets
        .iter()
        .filter(|(_, _, target)| target.is_active())
        .map(|(entity, transform, _)| (entity, *transform))
        .collect();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        if !projectile.is_in_flight() {
            continue;
        }

        let target_hit = ballistics::check_collision(&projectile, candidates.iter().copied(), radius)
            .map(|hit| (ImpactSurface::Target(hit.target), hit.point, hit.distance));
        let ground_hit = ballistics::ground_crossing(&projectile, config.projectile.ground_height)
            .map(|(point, distance)| (ImpactSurface::Ground, point, distance));

        let impact = match (target_hit, ground_hit) {
            (Some(t), Some(g)) => Some(if g.2 < t.2 { g } else { t }),
            (t, g) => t.or(g),
        };
        let Some((surface, point, _)) = impact else {
            continue;
        };

        if !projectile.embed(point, now, display) {
            continue;
        }
        transform.translation = point;

        impact_events.write(ArrowImpact {
            projectile: entity,
            surface,
            point,
        });

        match surface {
            ImpactSurface::Target(target) => crate::logger::log(&format!(
                "🎯 Arrow {:?} embedded in target {:?} at {:.2?}",
                entity, target, point
            )),
            ImpactSurface::Ground => crate::logger::log(&format!(
                "🪨 Arrow {:?} embedded in ground at {:.2?}",
                entity, point
            )),
        }
    }
}

/// System: despawn expired arrows and embedded arrows past their display time
pub fn cleanup_projectiles(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile)>,
    mut removed_events: EventWriter<ProjectileRemoved>,
    time: Res<Time>,
) {
    let now = time.elapsed();

    for (entity, projectile) in projectiles.iter() {
        let reason = match projectile.state {
            ProjectileState::Expired => RemovalReason::Expired,
            ProjectileState::Embedded { .. } if projectile.display_elapsed(now) => {
                RemovalReason::DisplayElapsed
            }
            _ => continue,
        };

        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn();
            removed_events.write(ProjectileRemoved {
                projectile: entity,
                reason,
            });
        }
    }
}
