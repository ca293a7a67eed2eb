//! Session control + score aggregation
//!
//! Flow:
//! - StartSession → arm the spawn timer
//! - StopSession → cancel the spawn timer (targets and embedded arrows stay)
//! - ResetSession → stop + remove all targets + clear combo and score board

use bevy::prelude::*;
use std::time::Duration;

use crate::combo::{ComboCause, ComboState, ComboUpdated};
use crate::config::ArcheryConfig;
use crate::projectile::{Projectile, ProjectileState};
use crate::spawn::SpawnDirector;
use crate::target::{Target, TargetState};
use crate::ArcherySet;

pub mod score;

pub use score::{combo_points, ScoreBoard, ScoreChanged, ScoreReason};

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub running: bool,
    pub started_at: Option<Duration>,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartSession;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StopSession;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetSession;

/// Comparable state of the range at a tick boundary.
///
/// Entities are listed by index, so two runs with the same seed compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// (entity index, position, state, hit points left)
    pub targets: Vec<(u32, Vec3, TargetState, u32)>,
    /// (entity index, position, state)
    pub projectiles: Vec<(u32, Vec3, ProjectileState)>,
    pub score: ScoreBoard,
    pub combo: ComboState,
    pub spawned_total: u32,
}

impl SessionSnapshot {
    pub fn capture(world: &mut World) -> Self {
        let mut targets: Vec<_> = world
            .query::<(Entity, &Target, &Transform)>()
            .iter(world)
            .map(|(entity, target, transform)| {
                (entity.index(), transform.translation, target.state, target.hit_points)
            })
            .collect();
        targets.sort_by_key(|(index, ..)| *index);

        let mut projectiles: Vec<_> = world
            .query::<(Entity, &Projectile)>()
            .iter(world)
            .map(|(entity, projectile)| (entity.index(), projectile.position, projectile.state))
            .collect();
        projectiles.sort_by_key(|(index, ..)| *index);

        Self {
            targets,
            projectiles,
            score: world.get_resource::<ScoreBoard>().cloned().unwrap_or_default(),
            combo: world.get_resource::<ComboState>().cloned().unwrap_or_default(),
            spawned_total: world
                .get_resource::<SpawnDirector>()
                .map_or(0, SpawnDirector::spawned_total),
        }
    }
}

/// Session Plugin
///
/// - Session set: handle_session_commands (first thing each tick)
/// - Score set: tally_shots → score_hits
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Session>()
            .init_resource::<ScoreBoard>()
            .register_type::<ScoreBoard>()
            .add_event::<StartSession>()
            .add_event::<StopSession>()
            .add_event::<ResetSession>()
            .add_event::<ScoreChanged>();

        app.add_systems(
            FixedUpdate,
            handle_session_commands.in_set(ArcherySet::Session),
        )
        .add_systems(
            FixedUpdate,
            (score::tally_shots, score::score_hits)
                .chain()
                .in_set(ArcherySet::Score),
        );
    }
}

/// System: StartSession / StopSession / ResetSession
///
/// Processed as stop → reset → start, so "reset + start" in one tick restarts cleanly.
#[allow(clippy::too_many_arguments)]
pub fn handle_session_commands(
    mut commands: Commands,
    mut start_events: EventReader<StartSession>,
    mut stop_events: EventReader<StopSession>,
    mut reset_events: EventReader<ResetSession>,
    mut session: ResMut<Session>,
    mut director: ResMut<SpawnDirector>,
    mut combo: ResMut<ComboState>,
    mut board: ResMut<ScoreBoard>,
    mut combo_events: EventWriter<ComboUpdated>,
    mut score_events: EventWriter<ScoreChanged>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed();
    let start = start_events.read().count() > 0;
    let stop = stop_events.read().count() > 0;
    let reset = reset_events.read().count() > 0;

    if (stop || reset) && session.running {
        session.running = false;
        director.stop();
        crate::logger::log_info("⏹️ Session stopped");
    }

    if reset {
        let targets = director.drain();
        for target in &targets {
            if let Ok(mut entity_commands) = commands.get_entity(*target) {
                entity_commands.despawn();
            }
        }

        combo.clear();
        combo_events.write(ComboUpdated::from_state(&combo, ComboCause::Reset));

        let previous = board.score;
        board.reset();
        score_events.write(ScoreChanged {
            score: 0,
            delta: -(previous as i64),
            reason: ScoreReason::Reset,
        });

        session.started_at = None;
        crate::logger::log_info(&format!("🔄 Session reset ({} targets removed)", targets.len()));
    }

    if start && !session.running {
        session.running = true;
        session.started_at = Some(now);
        director.start(now, config.spawn.interval());
        crate::logger::log_info(&format!(
            "▶️ Session started (difficulty: {}, max targets: {})",
            director.difficulty(),
            config.spawn.max_targets
        ));
    }
}
