//! Combo engine
//!
//! TargetHit → ComboState update → ComboUpdated (carries the hit's points so score
//! aggregation can apply the post-hit multiplier). A per-tick timeout check drops
//! an idle combo back to baseline.
//!
//! The multiplier is advisory: the cumulative score lives in `session::ScoreBoard`.

use bevy::prelude::*;

use crate::config::ArcheryConfig;
use crate::target::{HitZone, TargetHit};
use crate::ArcherySet;

pub mod state;

pub use state::ComboState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComboCause {
    Hit {
        target: Entity,
        zone: HitZone,
        points: u32,
    },
    Timeout,
    /// Session reset.
    Reset,
}

/// Event: combo count or multiplier changed.
#[derive(Event, Debug, Clone)]
pub struct ComboUpdated {
    pub combo: u32,
    pub multiplier: f32,
    pub max_combo: u32,
    pub cause: ComboCause,
}

impl ComboUpdated {
    pub fn from_state(state: &ComboState, cause: ComboCause) -> Self {
        Self {
            combo: state.combo,
            multiplier: state.multiplier,
            max_combo: state.max_combo,
            cause,
        }
    }
}

/// Combo Plugin
///
/// Combo set: expire_combo → apply_combo_hits, so a hit landing on the timeout
/// tick starts a fresh combo.
pub struct ComboPlugin;

impl Plugin for ComboPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ComboState>()
            .register_type::<ComboState>()
            .add_event::<ComboUpdated>();

        app.add_systems(
            FixedUpdate,
            (expire_combo, apply_combo_hits)
                .chain()
                .in_set(ArcherySet::Combo),
        );
    }
}

/// System: drop an active combo whose window has elapsed
pub fn expire_combo(
    mut combo: ResMut<ComboState>,
    mut combo_events: EventWriter<ComboUpdated>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    if !combo.active {
        return;
    }

    let lost = combo.combo;
    if combo.expire(time.elapsed(), &config.combo) {
        combo_events.write(ComboUpdated::from_state(&combo, ComboCause::Timeout));
        if lost > 1 {
            crate::logger::log(&format!("❌ Combo lost: x{}", lost));
        }
    }
}

/// System: TargetHit → ComboState::register_hit → ComboUpdated
pub fn apply_combo_hits(
    mut hit_events: EventReader<TargetHit>,
    mut combo: ResMut<ComboState>,
    mut combo_events: EventWriter<ComboUpdated>,
    config: Res<ArcheryConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed();

    for hit in hit_events.read() {
        let multiplier = combo.register_hit(hit.zone, now, &config.combo);

        combo_events.write(ComboUpdated::from_state(
            &combo,
            ComboCause::Hit {
                target: hit.target,
                zone: hit.zone,
                points: hit.points,
            },
        ));

        crate::logger::log(&format!(
            "🔥 Combo: x{} | multiplier: {:.1}x",
            combo.combo, multiplier
        ));
    }
}
