//! Spawn director
//!
//! Architecture:
//! - `difficulty`: tier table → TargetBlueprint (seeded rolls)
//! - `director`: SpawnDirector resource (population + timer)
//! - systems below, all in ArcherySet::Spawn (after hits/combo/score)
//!
//! Destroy-then-spawn: releases from this tick's TargetDestroyed/RemoveTarget run
//! before the capacity check, so a freed slot can be refilled on the same tick and
//! the population never exceeds `max_targets`.

use bevy::prelude::*;

use crate::config::{ArcheryConfig, Difficulty};
use crate::target::{Oscillation, RemoveTarget, Target, TargetDestroyed, ZoneRadii};
use crate::{ArcherySet, DeterministicRng};

pub mod difficulty;
pub mod director;

pub use difficulty::{roll_blueprint, HitPointRoll, TargetBlueprint, TierProfile};
pub use director::SpawnDirector;

/// Event: a new target entered the population.
#[derive(Event, Debug, Clone)]
pub struct TargetSpawned {
    pub target: Entity,
    pub position: Vec3,
    pub point_value: u32,
    pub hit_points: u32,
    pub movable: bool,
    pub radii: ZoneRadii,
}

/// Event: switch difficulty tier for subsequent spawns.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetDifficulty {
    pub difficulty: Difficulty,
}

/// Spawn Plugin
///
/// Execution order (Spawn set, chained):
/// 1. release_destroyed_targets: TargetDestroyed frees capacity
/// 2. remove_targets: RemoveTarget frees capacity + despawns
/// 3. apply_difficulty_changes: SetDifficulty
/// 4. spawn_on_interval: timer + capacity check → TargetSpawned
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        let difficulty = app
            .world()
            .get_resource::<ArcheryConfig>()
            .map(|config| config.spawn.difficulty)
            .unwrap_or_default();

        app.insert_resource(SpawnDirector::new(difficulty))
            .add_event::<TargetSpawned>()
            .add_event::<SetDifficulty>();

        app.add_systems(
            FixedUpdate,
            (
                release_destroyed_targets,
                remove_targets,
                apply_difficulty_changes,
                spawn_on_interval,
            )
                .chain()
                .in_set(ArcherySet::Spawn),
        );
    }
}

/// System: TargetDestroyed → drop the target from the population
pub fn release_destroyed_targets(
    mut destroyed_events: EventReader<TargetDestroyed>,
    mut director: ResMut<SpawnDirector>,
) {
    for event in destroyed_events.read() {
        director.release(event.target);
    }
}

/// System: RemoveTarget → release + despawn (movement stops with the entity)
pub fn remove_targets(
    mut commands: Commands,
    mut remove_events: EventReader<RemoveTarget>,
    mut director: ResMut<SpawnDirector>,
    targets: Query<(), With<Target>>,
) {
    for event in remove_events.read() {
        let tracked = director.release(event.target);

        if !targets.contains(event.target) {
            continue;
        }
        if let Ok(mut entity_commands) = commands.get_entity(event.target) {
            entity_commands.despawn();
            crate::logger::log(&format!(
                "🗑️ Target {:?} removed (tracked: {})",
                event.target, tracked
            ));
        }
    }
}

/// System: SetDifficulty → director tier
pub fn apply_difficulty_changes(
    mut difficulty_events: EventReader<SetDifficulty>,
    mut director: ResMut<SpawnDirector>,
) {
    for event in difficulty_events.read() {
        if director.difficulty() != event.difficulty {
            director.set_difficulty(event.difficulty);
            crate::logger::log_info(&format!("⚙️ Difficulty set to {}", event.difficulty));
        }
    }
}

/// System: spawn timer
///
/// 1. Filter the population by liveness (targets despawned or destroyed elsewhere)
/// 2. Poll the timer; at capacity the tick is skipped silently
/// 3. Roll a blueprint from the current tier and spawn it
pub fn spawn_on_interval(
    mut commands: Commands,
    mut director: ResMut<SpawnDirector>,
    mut rng: ResMut<DeterministicRng>,
    mut spawned_events: EventWriter<TargetSpawned>,
    targets: Query<&Target>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    director.retain_live(|entity| targets.get(entity).is_ok_and(Target::is_active));

    let now = time.elapsed();
    if !director.poll(now, config.spawn.interval()) {
        return;
    }
    if !director.has_capacity(config.spawn.max_targets) {
        return;
    }

    let blueprint = roll_blueprint(
        &mut rng.rng,
        director.difficulty(),
        &config.spawn,
        &config.zones,
    );

    let target = Target::new(
        blueprint.point_value,
        blueprint.hit_points,
        blueprint.movable,
        blueprint.radii,
    );
    let mut entity_commands = commands.spawn((
        Name::new(format!("Target #{}", director.spawned_total() + 1)),
        target,
        Transform::from_translation(blueprint.position),
    ));
    if blueprint.movable {
        entity_commands.insert(Oscillation::from_phase(
            blueprint.position,
            blueprint.phase,
            config.spawn.oscillation_amplitude,
            now,
            config.spawn.oscillation_half_period(),
        ));
    }
    let entity = entity_commands.id();

    director.admit(entity);
    spawned_events.write(TargetSpawned {
        target: entity,
        position: blueprint.position,
        point_value: blueprint.point_value,
        hit_points: blueprint.hit_points,
        movable: blueprint.movable,
        radii: blueprint.radii,
    });

    crate::logger::log(&format!(
        "🎯 New target spawned: {:?} ({}pts, {}HP, movable: {}) [{}/{}]",
        entity,
        blueprint.point_value,
        blueprint.hit_points,
        blueprint.movable,
        director.len(),
        config.spawn.max_targets
    ));
}
