//! SpawnDirector resource: live target population + spawn timer

use bevy::prelude::*;
use std::time::Duration;

use crate::config::Difficulty;

/// Owns the ordered set of live targets (spawn order) and the spawn deadline.
///
/// Invariant (checked by the spawn system): `active.len() <= max_targets`.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnDirector {
    active: Vec<Entity>,
    next_spawn_at: Option<Duration>,
    difficulty: Difficulty,
    spawned_total: u32,
}

impl SpawnDirector {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Applies to subsequent spawns only.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn active_targets(&self) -> &[Entity] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn spawned_total(&self) -> u32 {
        self.spawned_total
    }

    pub fn is_running(&self) -> bool {
        self.next_spawn_at.is_some()
    }

    pub fn next_spawn_at(&self) -> Option<Duration> {
        self.next_spawn_at
    }

    /// Arms the timer; the first spawn fires one interval from now.
    pub fn start(&mut self, now: Duration, interval: Duration) {
        self.next_spawn_at = Some(now + interval);
    }

    /// Cancels the timer. Live targets stay.
    pub fn stop(&mut self) {
        self.next_spawn_at = None;
    }

    /// True when the timer fired. Missed intervals are skipped, not replayed.
    pub fn poll(&mut self, now: Duration, interval: Duration) -> bool {
        let Some(mut deadline) = self.next_spawn_at else {
            return false;
        };
        if now < deadline {
            return false;
        }
        if interval.is_zero() {
            self.next_spawn_at = Some(now);
            return true;
        }
        while deadline <= now {
            deadline += interval;
        }
        self.next_spawn_at = Some(deadline);
        true
    }

    pub fn has_capacity(&self, max_targets: usize) -> bool {
        self.active.len() < max_targets
    }

    pub fn admit(&mut self, target: Entity) {
        self.active.push(target);
        self.spawned_total += 1;
    }

    /// Returns false if the target was not tracked.
    pub fn release(&mut self, target: Entity) -> bool {
        let before = self.active.len();
        self.active.retain(|&e| e != target);
        self.active.len() != before
    }

    /// Drops entries for which `is_live` is false (despawned elsewhere).
    pub fn retain_live(&mut self, mut is_live: impl FnMut(Entity) -> bool) -> usize {
        let before = self.active.len();
        self.active.retain(|&e| is_live(e));
        before - self.active.len()
    }

    /// Empties the population, returning it in spawn order.
    pub fn drain(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_timer_fires_on_interval() {
        let mut director = SpawnDirector::default();
        assert!(!director.poll(ms(5_000), ms(1_500)));

        director.start(ms(0), ms(1_500));
        assert!(!director.poll(ms(1_499), ms(1_500)));
        assert!(director.poll(ms(1_500), ms(1_500)));
        assert!(!director.poll(ms(1_600), ms(1_500)));
        assert_eq!(director.next_spawn_at(), Some(ms(3_000)));
    }

    #[test]
    fn test_missed_intervals_fire_once() {
        let mut director = SpawnDirector::default();
        director.start(ms(0), ms(1_000));

        assert!(director.poll(ms(4_500), ms(1_000)));
        assert!(!director.poll(ms(4_500), ms(1_000)));
        assert_eq!(director.next_spawn_at(), Some(ms(5_000)));
    }

    #[test]
    fn test_stop_cancels_timer_but_keeps_targets() {
        let mut director = SpawnDirector::default();
        director.start(ms(0), ms(1_000));
        director.admit(Entity::from_raw(1));

        director.stop();

        assert!(!director.is_running());
        assert!(!director.poll(ms(10_000), ms(1_000)));
        assert_eq!(director.len(), 1);
    }

    #[test]
    fn test_capacity_and_release() {
        let mut director = SpawnDirector::new(Difficulty::Hard);
        for i in 0..5 {
            director.admit(Entity::from_raw(i));
        }
        assert!(!director.has_capacity(5));

        assert!(director.release(Entity::from_raw(2)));
        assert!(!director.release(Entity::from_raw(2)));
        assert!(director.has_capacity(5));
        assert_eq!(
            director.active_targets(),
            &[0, 1, 3, 4].map(Entity::from_raw)
        );
        assert_eq!(director.spawned_total(), 5);
    }

    #[test]
    fn test_retain_live_and_drain() {
        let mut director = SpawnDirector::default();
        for i in 0..4 {
            director.admit(Entity::from_raw(i));
        }

        let dropped = director.retain_live(|e| e.index() % 2 == 0);
        assert_eq!(dropped, 2);

        let drained = director.drain();
        assert_eq!(drained, vec![Entity::from_raw(0), Entity::from_raw(2)]);
        assert!(director.is_empty());
    }
}
