//! ComboState: Idle ⇄ Active state machine over hit timestamps

use bevy::prelude::*;
use std::time::Duration;

use crate::config::ComboConfig;
use crate::target::HitZone;

/// Process-wide combo tracker.
///
/// Idle = `!active` (combo 0, multiplier 1.0). `max_combo` is a high-water mark
/// that survives timeouts and is only cleared by `clear()`.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct ComboState {
    pub combo: u32,
    pub multiplier: f32,
    pub last_hit_at: Option<Duration>,
    pub active: bool,
    pub max_combo: u32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            combo: 0,
            multiplier: 1.0,
            last_hit_at: None,
            active: false,
            max_combo: 0,
        }
    }
}

impl ComboState {
    /// Clamped multiplier for a combo count.
    pub fn multiplier_for(combo: u32, config: &ComboConfig) -> f32 {
        (1.0 + combo as f32 * config.step).clamp(1.0, config.max_multiplier.max(1.0))
    }

    fn within_window(&self, now: Duration, config: &ComboConfig) -> bool {
        self.last_hit_at
            .is_some_and(|last| now.saturating_sub(last) < config.timeout())
    }

    /// Registers a hit and returns the new multiplier.
    ///
    /// A hit inside the window continues the combo (+1, +2 for a bullseye when the
    /// bonus is enabled). Otherwise a new combo starts at 1.
    pub fn register_hit(&mut self, zone: HitZone, now: Duration, config: &ComboConfig) -> f32 {
        if self.active && self.within_window(now, config) {
            self.combo += 1;
            if config.bullseye_bonus && zone == HitZone::Bullseye {
                self.combo += 1;
            }
        } else {
            self.combo = 1;
            self.active = true;
        }

        self.last_hit_at = Some(now);
        self.max_combo = self.max_combo.max(self.combo);
        self.multiplier = Self::multiplier_for(self.combo, config);
        self.multiplier
    }

    /// Timeout check. Returns true when an active combo just dropped to Idle.
    pub fn expire(&mut self, now: Duration, config: &ComboConfig) -> bool {
        if !self.active || self.within_window(now, config) {
            return false;
        }
        self.reset();
        true
    }

    /// Back to Idle; keeps `max_combo`.
    pub fn reset(&mut self) {
        self.combo = 0;
        self.multiplier = 1.0;
        self.active = false;
    }

    /// Back to Idle and forget session statistics.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_first_hit_starts_combo() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();

        // bullseye bonus only applies to a continuing combo
        let multiplier = state.register_hit(HitZone::Bullseye, ms(0), &config);

        assert_eq!(state.combo, 1);
        assert!(state.active);
        assert!((multiplier - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_hits_inside_window_accumulate() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();

        state.register_hit(HitZone::Outer, ms(0), &config);
        state.register_hit(HitZone::Middle, ms(1_999), &config);
        assert_eq!(state.combo, 2);

        state.register_hit(HitZone::Bullseye, ms(3_000), &config);
        assert_eq!(state.combo, 4);
        assert_eq!(state.max_combo, 4);
    }

    #[test]
    fn test_classic_variant_has_no_bullseye_bonus() {
        let config = ComboConfig::classic();
        let mut state = ComboState::default();

        state.register_hit(HitZone::Bullseye, ms(0), &config);
        let multiplier = state.register_hit(HitZone::Bullseye, ms(500), &config);

        assert_eq!(state.combo, 2);
        assert!((multiplier - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_hit_after_timeout_starts_new_combo() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();

        state.register_hit(HitZone::Outer, ms(0), &config);
        state.register_hit(HitZone::Outer, ms(2_500), &config);

        assert_eq!(state.combo, 1);
        assert_eq!(state.max_combo, 1);
    }

    #[test]
    fn test_hit_exactly_at_timeout_starts_new_combo() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();

        state.register_hit(HitZone::Outer, ms(0), &config);
        state.register_hit(HitZone::Outer, ms(2_000), &config);

        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_expire_at_timeout_boundary() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();
        state.register_hit(HitZone::Outer, ms(0), &config);
        state.register_hit(HitZone::Outer, ms(100), &config);

        assert!(!state.expire(ms(2_099), &config));
        assert_eq!(state.combo, 2);

        assert!(state.expire(ms(2_100), &config));
        assert_eq!(state.combo, 0);
        assert_eq!(state.multiplier, 1.0);
        assert!(!state.active);
        assert_eq!(state.max_combo, 2);

        // idle state never "expires" again
        assert!(!state.expire(ms(10_000), &config));
    }

    #[test]
    fn test_multiplier_is_clamped() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();

        for i in 0..40 {
            let multiplier = state.register_hit(HitZone::Bullseye, ms(i * 100), &config);
            assert!((1.0..=config.max_multiplier).contains(&multiplier));
        }
        assert_eq!(state.multiplier, 5.0);
    }

    #[test]
    fn test_clear_forgets_max_combo() {
        let config = ComboConfig::precision();
        let mut state = ComboState::default();
        state.register_hit(HitZone::Outer, ms(0), &config);
        state.register_hit(HitZone::Outer, ms(10), &config);

        state.reset();
        assert_eq!(state.max_combo, 2);

        state.clear();
        assert_eq!(state, ComboState::default());
    }
}
