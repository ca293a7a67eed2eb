//! Archery Simulation Core
//!
//! Headless gameplay simulation for a VR archery range on Bevy 0.16 ECS.
//! Rendering, audio, input devices and HUD live outside this crate and talk to it
//! through events only.
//!
//! Components (leaves first):
//! - `projectile`: arrow ballistics + swept collision
//! - `target`: hit evaluator (zones, points, destruction)
//! - `combo`: combo counter / multiplier with timeout
//! - `spawn`: target population, difficulty tiers
//! - `session`: start/stop/reset + score aggregation
//! - `bow`: draw distance → tension → FireArrow
//!
//! One FixedUpdate tick = one frame of the cooperative loop. Sets run in order:
//! Session → Targets → Projectiles → Hits → Combo → Score → Spawn → Cleanup

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub mod bow;
pub mod combo;
pub mod config;
pub mod logger;
pub mod projectile;
pub mod session;
pub mod spawn;
pub mod target;

pub use bow::DrawState;
pub use combo::{ComboCause, ComboPlugin, ComboState, ComboUpdated};
pub use config::{
    ArcheryConfig, BallisticModel, BowConfig, ComboConfig, ConfigError, Difficulty,
    ProjectileConfig, SpawnConfig, TargetZoneConfig,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use projectile::{
    ArrowImpact, ArrowRejected, ArrowShot, FireArrow, ImpactSurface, LaunchError, Projectile,
    ProjectilePlugin, ProjectileRemoved, ProjectileState, RemovalReason,
};
pub use session::{
    ResetSession, ScoreBoard, ScoreChanged, ScoreReason, Session, SessionPlugin, SessionSnapshot,
    StartSession, StopSession,
};
pub use spawn::{SetDifficulty, SpawnDirector, SpawnPlugin, TargetSpawned};
pub use target::{
    HitError, HitZone, Oscillation, RemoveTarget, Target, TargetDestroyed, TargetHit,
    TargetPlugin, TargetState, ZoneRadii,
};

/// Fixed simulation step: 64 Hz.
pub const SIMULATION_STEP: Duration = Duration::from_micros(15_625);

pub const DEFAULT_SEED: u64 = 42;

/// Per-tick phases, chained in this order inside FixedUpdate.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcherySet {
    /// Start/stop/reset commands
    Session,
    /// Target movement
    Targets,
    /// Fire requests, integration, collision
    Projectiles,
    /// Hit evaluation
    Hits,
    Combo,
    Score,
    /// Population bookkeeping + spawning (after this tick's destructions)
    Spawn,
    /// Timed despawns
    Cleanup,
}

/// Top-level plugin: inserts the config and composes every subsystem plugin.
#[derive(Default)]
pub struct ArcheryPlugin {
    config: ArcheryConfig,
}

impl ArcheryPlugin {
    pub fn new(config: ArcheryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ArcheryConfig {
        &self.config
    }
}

impl Plugin for ArcheryPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(Time::<Fixed>::from_duration(SIMULATION_STEP))
            .configure_sets(
                FixedUpdate,
                (
                    ArcherySet::Session,
                    ArcherySet::Targets,
                    ArcherySet::Projectiles,
                    ArcherySet::Hits,
                    ArcherySet::Combo,
                    ArcherySet::Score,
                    ArcherySet::Spawn,
                    ArcherySet::Cleanup,
                )
                    .chain(),
            );

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.add_plugins((
            ProjectilePlugin,
            TargetPlugin,
            ComboPlugin,
            SpawnPlugin,
            SessionPlugin,
        ));
    }
}

/// Seeded RNG shared by every random draw in the simulation.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal headless App with manual time stepping.
///
/// Every `app.update()` after the first advances exactly one SIMULATION_STEP,
/// i.e. one FixedUpdate tick. The first update only initializes the clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(SIMULATION_STEP))
        .insert_resource(TimeUpdateStrategy::ManualDuration(SIMULATION_STEP));

    app
}
