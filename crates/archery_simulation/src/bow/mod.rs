//! Bow draw model
//!
//! Tension comes from the distance between the bow hand and the string hand:
//! `[min_draw_distance, max_draw_distance]` maps linearly onto `[0, max_tension]`.
//! Releasing above `release_threshold` produces a FireArrow; below it the arrow
//! is dropped. Either way the draw ends.

use bevy::prelude::*;

use crate::config::BowConfig;
use crate::projectile::FireArrow;

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct DrawState {
    pub drawing: bool,
    pub tension: f32,
}

impl DrawState {
    pub fn begin_draw(&mut self) {
        self.drawing = true;
        self.tension = 0.0;
    }

    /// Recomputes tension from hand positions. No-op when not drawing.
    pub fn update(&mut self, bow_hand: Vec3, string_hand: Vec3, config: &BowConfig) -> f32 {
        if !self.drawing {
            self.tension = 0.0;
            return 0.0;
        }
        self.tension = tension_for_distance(bow_hand.distance(string_hand), config);
        self.tension
    }

    /// Ends the draw. Returns a fire request when the string was pulled far enough.
    pub fn release(&mut self, origin: Vec3, direction: Vec3, config: &BowConfig) -> Option<FireArrow> {
        let fire = (self.drawing && self.tension > config.release_threshold).then(|| FireArrow {
            origin,
            direction,
            tension: self.tension,
        });
        self.cancel();
        fire
    }

    pub fn cancel(&mut self) {
        self.drawing = false;
        self.tension = 0.0;
    }
}

pub fn tension_for_distance(distance: f32, config: &BowConfig) -> f32 {
    let span = config.max_draw_distance - config.min_draw_distance;
    if !distance.is_finite() || span <= 0.0 {
        return 0.0;
    }
    let normalized = ((distance - config.min_draw_distance) / span).clamp(0.0, 1.0);
    normalized * config.max_tension
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tension_mapping() {
        let config = BowConfig::default();

        assert_eq!(tension_for_distance(0.05, &config), 0.0);
        assert_eq!(tension_for_distance(0.1, &config), 0.0);
        assert!((tension_for_distance(0.35, &config) - 0.75).abs() < 1e-5);
        assert_eq!(tension_for_distance(0.6, &config), 1.5);
        assert_eq!(tension_for_distance(2.0, &config), 1.5);
    }

    #[test]
    fn test_release_fires_above_threshold() {
        let config = BowConfig::default();
        let mut draw = DrawState::default();

        draw.begin_draw();
        // past full draw clamps to max tension
        let tension = draw.update(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.7), &config);
        assert_eq!(tension, 1.5);

        let fire = draw.release(Vec3::Y, Vec3::NEG_Z, &config).unwrap();
        assert_eq!(fire.tension, 1.5);
        assert_eq!(fire.origin, Vec3::Y);
        assert_eq!(draw, DrawState::default());
    }

    #[test]
    fn test_weak_release_drops_arrow() {
        let config = BowConfig::default();
        let mut draw = DrawState::default();

        draw.begin_draw();
        // 0.15m → (0.05 / 0.5) * 1.5 = 0.15 tension, below 0.2
        draw.update(Vec3::ZERO, Vec3::new(0.15, 0.0, 0.0), &config);

        assert!(draw.release(Vec3::ZERO, Vec3::NEG_Z, &config).is_none());
        assert_eq!(draw.tension, 0.0);
        assert!(!draw.drawing);
    }

    #[test]
    fn test_update_without_draw_keeps_slack() {
        let config = BowConfig::default();
        let mut draw = DrawState::default();

        assert_eq!(draw.update(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.6), &config), 0.0);
        assert!(draw.release(Vec3::ZERO, Vec3::NEG_Z, &config).is_none());
    }
}
