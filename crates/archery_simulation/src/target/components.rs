//! Target components: scoring radii, hit points, oscillation, delayed despawn

use bevy::prelude::*;
use std::f32::consts::PI;
use std::time::Duration;

use super::hit::HitZone;
use crate::config::TargetZoneConfig;

/// Three scoring radii, center < middle < outer.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ZoneRadii {
    pub center: f32,
    pub middle: f32,
    pub outer: f32,
}

impl ZoneRadii {
    /// Returns None unless `0 < center <= middle <= outer`.
    pub fn new(center: f32, middle: f32, outer: f32) -> Option<Self> {
        let ordered = center > 0.0 && center <= middle && middle <= outer && outer.is_finite();
        ordered.then_some(Self { center, middle, outer })
    }

    pub fn from_config(config: &TargetZoneConfig) -> Self {
        Self {
            center: config.center_radius,
            middle: config.middle_radius,
            outer: config.outer_radius,
        }
    }

    /// Uniform scaling keeps the ordering intact.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            center: self.center * factor,
            middle: self.middle * factor,
            outer: self.outer * factor,
        }
    }

    /// Zone for a planar distance from the target center.
    ///
    /// Boundaries belong to the inner zone, so every distance is classified.
    pub fn classify(&self, distance: f32) -> HitZone {
        if distance <= self.center {
            HitZone::Bullseye
        } else if distance <= self.middle {
            HitZone::Middle
        } else if distance <= self.outer {
            HitZone::Outer
        } else {
            HitZone::Edge
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TargetState {
    Active,
    Destroyed,
}

/// Scoring target.
///
/// `hit_points` only goes down. Reaching 0 flips the state to Destroyed once.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Target {
    pub point_value: u32,
    pub hit_points: u32,
    /// Total hits received (reported on destruction).
    pub hit_count: u32,
    pub movable: bool,
    pub radii: ZoneRadii,
    pub state: TargetState,
}

impl Target {
    pub fn new(point_value: u32, hit_points: u32, movable: bool, radii: ZoneRadii) -> Self {
        Self {
            point_value,
            hit_points,
            hit_count: 0,
            movable,
            radii,
            state: TargetState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == TargetState::Active
    }

    /// Applies one hit. Returns true when this hit destroyed the target.
    pub fn register_hit(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.hit_count += 1;
        self.hit_points = self.hit_points.saturating_sub(1);
        if self.hit_points == 0 {
            self.state = TargetState::Destroyed;
            return true;
        }
        false
    }
}

/// Anything the hit evaluator can score.
pub trait Hittable {
    fn is_active(&self) -> bool;
    fn zone_radii(&self) -> ZoneRadii;
    fn point_value(&self) -> u32;
    fn hit_count(&self) -> u32;
    /// Returns true when this hit destroyed the object.
    fn register_hit(&mut self) -> bool;
}

impl Hittable for Target {
    fn is_active(&self) -> bool {
        Target::is_active(self)
    }

    fn zone_radii(&self) -> ZoneRadii {
        self.radii
    }

    fn point_value(&self) -> u32 {
        self.point_value
    }

    fn hit_count(&self) -> u32 {
        self.hit_count
    }

    fn register_hit(&mut self) -> bool {
        Target::register_hit(self)
    }
}

/// Back-and-forth drift of a movable target.
///
/// Position eases from `base` to `base + offset` over one half period, then back.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Oscillation {
    pub base: Vec3,
    pub offset: Vec3,
    pub started_at: Duration,
    pub half_period: Duration,
}

impl Oscillation {
    /// Offset direction derived from a phase angle, scaled per axis by `amplitude`.
    pub fn from_phase(
        base: Vec3,
        phase: f32,
        amplitude: Vec3,
        started_at: Duration,
        half_period: Duration,
    ) -> Self {
        let offset = Vec3::new(phase.sin(), phase.cos(), (phase * 0.5).sin()) * amplitude;
        Self {
            base,
            offset,
            started_at,
            half_period,
        }
    }

    pub fn position_at(&self, now: Duration) -> Vec3 {
        let half_period = self.half_period.as_secs_f32();
        if half_period <= 0.0 {
            return self.base;
        }
        let t = now.saturating_sub(self.started_at).as_secs_f32();
        let weight = (1.0 - (PI * t / half_period).cos()) * 0.5;
        self.base + self.offset * weight
    }
}

/// Despawn the entity once the clock reaches `despawn_at`.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    pub despawn_at: Duration,
}
