//! Typed configuration for the archery simulation
//!
//! One `ArcheryConfig` resource, split per subsystem:
//! - `ProjectileConfig`: ballistic model, launch speed, lifetimes, collision radius
//! - `TargetZoneConfig`: scoring radii + destroy animation delay
//! - `ComboConfig`: combo window, multiplier step/cap, bullseye bonus policy
//! - `SpawnConfig`: spawn interval, capacity, difficulty tier, spawn volume
//! - `BowConfig`: draw distance → tension mapping
//!
//! On-disk format: RON. Every constructor that accepts external input validates,
//! so a resource inserted into the App is always internally consistent.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("zone radii must satisfy 0 < center < middle < outer (got {center}, {middle}, {outer})")]
    ZoneRadii { center: f32, middle: f32, outer: f32 },

    #[error("max_multiplier must be >= 1.0 (got {0})")]
    MaxMultiplier(f32),

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("spawn range on {axis} is empty: [{min}, {max}]")]
    SpawnBounds { axis: &'static str, min: f32, max: f32 },

    #[error("draw distance range is empty: min {min} >= max {max}")]
    DrawDistance { min: f32, max: f32 },

    #[error("failed to access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Flight model for launched arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum BallisticModel {
    /// Constant velocity, no external forces.
    Straight,
    /// Gravity + constant wind force integrated every tick.
    #[default]
    Ballistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}' (expected easy, normal or hard)")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub model: BallisticModel,
    /// Launch speed at tension 1.0 (m/s).
    pub speed: f32,
    pub gravity: Vec3,
    pub wind_force: Vec3,
    pub max_lifetime_ms: u64,
    /// How long an embedded arrow stays visible before removal.
    pub embed_display_ms: u64,
    /// Radius of the proximity sphere around each target.
    pub collision_radius: f32,
    pub ground_height: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            model: BallisticModel::Ballistic,
            speed: 25.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            wind_force: Vec3::ZERO,
            max_lifetime_ms: 15_000,
            embed_display_ms: 5_000,
            collision_radius: 0.6,
            ground_height: 0.0,
        }
    }
}

impl ProjectileConfig {
    /// Constant acceleration applied to in-flight arrows under the configured model.
    pub fn acceleration(&self) -> Vec3 {
        match self.model {
            BallisticModel::Straight => Vec3::ZERO,
            BallisticModel::Ballistic => self.gravity + self.wind_force,
        }
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_millis(self.max_lifetime_ms)
    }

    pub fn embed_display(&self) -> Duration {
        Duration::from_millis(self.embed_display_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("projectile.speed", self.speed)?;
        ensure_positive("projectile.collision_radius", self.collision_radius)?;
        ensure_finite("projectile.ground_height", self.ground_height)?;
        ensure_finite_vec("projectile.gravity", self.gravity)?;
        ensure_finite_vec("projectile.wind_force", self.wind_force)?;
        ensure_nonzero_ms("projectile.max_lifetime_ms", self.max_lifetime_ms)?;
        ensure_nonzero_ms("projectile.embed_display_ms", self.embed_display_ms)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetZoneConfig {
    pub center_radius: f32,
    pub middle_radius: f32,
    pub outer_radius: f32,
    /// Destroyed targets linger this long (destroy animation) before despawn.
    pub destroy_display_ms: u64,
}

impl Default for TargetZoneConfig {
    fn default() -> Self {
        Self {
            center_radius: 0.1,
            middle_radius: 0.3,
            outer_radius: 0.5,
            destroy_display_ms: 450,
        }
    }
}

impl TargetZoneConfig {
    pub fn destroy_display(&self) -> Duration {
        Duration::from_millis(self.destroy_display_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (center, middle, outer) = (self.center_radius, self.middle_radius, self.outer_radius);
        let ordered = center > 0.0 && center < middle && middle < outer && outer.is_finite();
        if !ordered {
            return Err(ConfigError::ZoneRadii { center, middle, outer });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    pub timeout_ms: u64,
    pub max_multiplier: f32,
    /// Multiplier gained per combo point.
    pub step: f32,
    /// Bullseye hits count as two combo points.
    pub bullseye_bonus: bool,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self::precision()
    }
}

impl ComboConfig {
    /// Precision-rewarding variant: faster multiplier growth, bullseye counts double.
    pub fn precision() -> Self {
        Self {
            timeout_ms: 2_000,
            max_multiplier: 5.0,
            step: 0.2,
            bullseye_bonus: true,
        }
    }

    /// Flat variant: every hit is worth one combo point.
    pub fn classic() -> Self {
        Self {
            timeout_ms: 2_000,
            max_multiplier: 5.0,
            step: 0.1,
            bullseye_bonus: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_nonzero_ms("combo.timeout_ms", self.timeout_ms)?;
        if !(self.max_multiplier >= 1.0) || !self.max_multiplier.is_finite() {
            return Err(ConfigError::MaxMultiplier(self.max_multiplier));
        }
        ensure_finite("combo.step", self.step)?;
        if self.step < 0.0 {
            return Err(ConfigError::NonPositive { field: "combo.step" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub interval_ms: u64,
    pub max_targets: usize,
    pub difficulty: Difficulty,
    pub x_range: [f32; 2],
    pub y_range: [f32; 2],
    pub z_range: [f32; 2],
    /// Peak displacement of movable targets per axis (scaled by the random phase).
    pub oscillation_amplitude: Vec3,
    pub oscillation_half_period_ms: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_500,
            max_targets: 5,
            difficulty: Difficulty::Normal,
            x_range: [-4.0, 4.0],
            y_range: [1.0, 3.5],
            z_range: [-9.0, -4.0],
            oscillation_amplitude: Vec3::new(1.5, 0.5, 1.0),
            oscillation_half_period_ms: 4_000,
        }
    }
}

impl SpawnConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn oscillation_half_period(&self) -> Duration {
        Duration::from_millis(self.oscillation_half_period_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_nonzero_ms("spawn.interval_ms", self.interval_ms)?;
        ensure_nonzero_ms("spawn.oscillation_half_period_ms", self.oscillation_half_period_ms)?;
        ensure_finite_vec("spawn.oscillation_amplitude", self.oscillation_amplitude)?;
        for (axis, [min, max]) in [("x", self.x_range), ("y", self.y_range), ("z", self.z_range)] {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ConfigError::SpawnBounds { axis, min, max });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowConfig {
    pub max_tension: f32,
    /// Hand separation (m) below which the string is considered slack.
    pub min_draw_distance: f32,
    /// Hand separation (m) at full draw.
    pub max_draw_distance: f32,
    /// Releases at or below this tension drop the arrow without firing.
    pub release_threshold: f32,
}

impl Default for BowConfig {
    fn default() -> Self {
        Self {
            max_tension: 1.5,
            min_draw_distance: 0.1,
            max_draw_distance: 0.6,
            release_threshold: 0.2,
        }
    }
}

impl BowConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("bow.max_tension", self.max_tension)?;
        ensure_finite("bow.release_threshold", self.release_threshold)?;
        let (min, max) = (self.min_draw_distance, self.max_draw_distance);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
            return Err(ConfigError::DrawDistance { min, max });
        }
        Ok(())
    }
}

/// Full simulation configuration (inserted as a resource by `ArcheryPlugin`).
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcheryConfig {
    pub projectile: ProjectileConfig,
    pub zones: TargetZoneConfig,
    pub combo: ComboConfig,
    pub spawn: SpawnConfig,
    pub bow: BowConfig,
}

impl ArcheryConfig {
    /// Assembles and validates a configuration.
    pub fn new(
        projectile: ProjectileConfig,
        zones: TargetZoneConfig,
        combo: ComboConfig,
        spawn: SpawnConfig,
        bow: BowConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self { projectile, zones, combo, spawn, bow };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projectile.validate()?;
        self.zones.validate()?;
        self.combo.validate()?;
        self.spawn.validate()?;
        self.bow.validate()?;
        Ok(())
    }

    /// Parses RON; omitted fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Loads from file, falling back to defaults (with a warning) on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                crate::logger::log_warning(&format!("⚠️ {e}, using default archery config"));
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_ron_string()?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn ensure_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}

fn ensure_finite_vec(field: &'static str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn ensure_nonzero_ms(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}
