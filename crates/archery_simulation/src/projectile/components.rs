//! Projectile component + lifecycle state

use bevy::prelude::*;
use std::time::Duration;

/// Lifecycle: InFlight → Embedded → (despawn) or InFlight → Expired → (despawn).
///
/// Embedded never returns to InFlight.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ProjectileState {
    InFlight,
    /// Stuck in a target or the ground, waiting out the display countdown.
    Embedded { remove_at: Duration },
    /// Lifetime ran out mid-flight.
    Expired,
}

/// Simulated arrow.
///
/// Position lives here (not only in Transform) so the swept collision test can
/// use the previous and current tick positions. `Transform` mirrors it for renderers.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Projectile {
    pub position: Vec3,
    /// Position at the start of the last integration step.
    pub previous_position: Vec3,
    pub velocity: Vec3,
    pub launched_at: Duration,
    pub max_lifetime: Duration,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, ProjectileState::InFlight)
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.state, ProjectileState::Embedded { .. })
    }

    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.launched_at)
    }

    /// In-flight arrow older than its lifetime.
    pub fn is_expired(&self, now: Duration) -> bool {
        self.is_in_flight() && self.age(now) > self.max_lifetime
    }

    /// Direction of travel, for orienting the arrow mesh.
    pub fn heading(&self) -> Option<Dir3> {
        Dir3::new(self.velocity).ok()
    }

    /// Stops the arrow at `point`. Returns false if it was not in flight.
    pub fn embed(&mut self, point: Vec3, now: Duration, display: Duration) -> bool {
        if !self.is_in_flight() {
            return false;
        }
        self.position = point;
        self.velocity = Vec3::ZERO;
        self.state = ProjectileState::Embedded { remove_at: now + display };
        true
    }

    pub fn expire(&mut self) -> bool {
        if !self.is_in_flight() {
            return false;
        }
        self.state = ProjectileState::Expired;
        true
    }

    /// Embedded arrow whose display countdown has elapsed.
    pub fn display_elapsed(&self, now: Duration) -> bool {
        match self.state {
            ProjectileState::Embedded { remove_at } => now >= remove_at,
            _ => false,
        }
    }
}
