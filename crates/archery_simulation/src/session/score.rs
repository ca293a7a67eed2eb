//! Score aggregation
//!
//! - ArrowShot / ArrowRejected → shot counters
//! - ComboUpdated (cause Hit) → floor(points × post-hit combo multiplier)
//! - TargetDestroyed → destruction bonus

use bevy::prelude::*;

use crate::combo::{ComboCause, ComboUpdated};
use crate::projectile::{ArrowRejected, ArrowShot};
use crate::target::TargetDestroyed;

/// Absorbs f32 rounding in the multiplier (1.4 is stored as 1.3999999).
const MULTIPLIER_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreReason {
    Hit,
    DestructionBonus,
    Reset,
}

/// Event: cumulative score changed.
#[derive(Event, Debug, Clone)]
pub struct ScoreChanged {
    pub score: u64,
    pub delta: i64,
    pub reason: ScoreReason,
}

/// Session statistics.
#[derive(Resource, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct ScoreBoard {
    pub score: u64,
    pub arrows_shot: u32,
    pub arrows_rejected: u32,
    pub hits: u32,
    pub targets_destroyed: u32,
    pub bonus_points: u64,
}

impl ScoreBoard {
    /// Hits per arrow shot, 0.0 before the first shot.
    pub fn accuracy(&self) -> f32 {
        if self.arrows_shot == 0 {
            return 0.0;
        }
        self.hits as f32 / self.arrows_shot as f32
    }

    /// Applies one hit, returns the awarded points.
    pub fn award_hit(&mut self, points: u32, multiplier: f32) -> u64 {
        let awarded = combo_points(points, multiplier);
        self.hits += 1;
        self.score += awarded;
        awarded
    }

    pub fn award_destruction(&mut self, bonus_points: u32) {
        self.targets_destroyed += 1;
        self.bonus_points += bonus_points as u64;
        self.score += bonus_points as u64;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn combo_points(points: u32, multiplier: f32) -> u64 {
    let scaled = points as f32 * multiplier.max(1.0);
    (scaled + MULTIPLIER_EPSILON).floor() as u64
}

/// System: count shots and rejected fire requests
pub fn tally_shots(
    mut shot_events: EventReader<ArrowShot>,
    mut rejected_events: EventReader<ArrowRejected>,
    mut board: ResMut<ScoreBoard>,
) {
    let shots = shot_events.read().count() as u32;
    let rejected = rejected_events.read().count() as u32;
    if shots == 0 && rejected == 0 {
        return;
    }
    board.arrows_shot += shots;
    board.arrows_rejected += rejected;
}

/// System: apply hit points with the combo multiplier, then destruction bonuses
pub fn score_hits(
    mut combo_events: EventReader<ComboUpdated>,
    mut destroyed_events: EventReader<TargetDestroyed>,
    mut score_events: EventWriter<ScoreChanged>,
    mut board: ResMut<ScoreBoard>,
) {
    for update in combo_events.read() {
        let ComboCause::Hit { points, zone, .. } = update.cause else {
            continue;
        };
        let awarded = board.award_hit(points, update.multiplier);
        score_events.write(ScoreChanged {
            score: board.score,
            delta: awarded as i64,
            reason: ScoreReason::Hit,
        });
        crate::logger::log(&format!(
            "📊 Score: {} (+{} {}, x{:.1})",
            board.score,
            awarded,
            zone.as_str(),
            update.multiplier
        ));
    }

    for destroyed in destroyed_events.read() {
        board.award_destruction(destroyed.bonus_points);
        score_events.write(ScoreChanged {
            score: board.score,
            delta: destroyed.bonus_points as i64,
            reason: ScoreReason::DestructionBonus,
        });
        crate::logger::log(&format!("🎉 Destruction bonus: +{}", destroyed.bonus_points));
    }
}
