//! Road speed and obstacle cadence
//!
//! Speed follows the throttle; the spawn interval tightens every `score_step`
//! points and is only re-read when an obstacle actually spawns.

use serde::{Deserialize, Serialize};

use super::state::Intents;
use crate::tuning::Tuning;

/// Speed and spawn timing for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub speed: f32,
    /// Time accumulated toward the next spawn (ms)
    pub spawn_timer: f32,
    /// Time required between spawns (ms)
    pub spawn_interval: f32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.initial_speed,
            spawn_timer: 0.0,
            spawn_interval: tuning.initial_spawn_interval,
        }
    }

    /// Throttle/brake/coast, all proportional to dt
    pub fn update_speed(&mut self, intents: &Intents, dt: f32, tuning: &Tuning) {
        if intents.accelerate {
            self.speed = (self.speed + tuning.accel_rate * dt).min(tuning.max_speed);
        }
        if intents.brake {
            self.speed = (self.speed - tuning.brake_rate * dt).max(tuning.min_speed);
        }
        if !intents.accelerate && !intents.brake {
            self.speed = (self.speed - tuning.passive_decay * dt).max(tuning.min_speed);
        }
    }

    /// Accumulate dt; returns true when an obstacle is due
    ///
    /// The interval is recomputed from `score` only on a spawn.
    pub fn advance_spawn_timer(&mut self, dt: f32, score: f32, tuning: &Tuning) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer < self.spawn_interval {
            return false;
        }
        self.spawn_timer = 0.0;
        self.spawn_interval = interval_for_score(score, tuning);
        true
    }

    /// Passive score for covering ground this tick
    #[inline]
    pub fn distance_score(&self, dt: f32, tuning: &Tuning) -> f32 {
        self.speed * dt * tuning.distance_score_rate
    }
}

/// Spawn interval earned by `score`: one step shorter per `score_step` points, floored
pub fn interval_for_score(score: f32, tuning: &Tuning) -> f32 {
    let steps = (score.max(0.0) / tuning.score_step).floor();
    (tuning.initial_spawn_interval - steps * tuning.spawn_interval_step)
        .max(tuning.min_spawn_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn accelerate() -> Intents {
        Intents {
            accelerate: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_accelerate_approaches_max() {
        let t = Tuning::default();
        let mut d = Difficulty::new(&t);
        assert_eq!(d.speed, 4.0);

        let mut elapsed = 0.0;
        let mut last = d.speed;
        while elapsed < 500.0 {
            d.update_speed(&accelerate(), 16.0, &t);
            assert!(d.speed <= t.max_speed);
            assert!(d.speed >= last);
            last = d.speed;
            elapsed += 16.0;
        }
        assert!(d.speed > 13.0);
        assert!(d.speed <= 14.0);
    }

    #[test]
    fn test_brake_floors_at_min() {
        let t = Tuning::default();
        let mut d = Difficulty::new(&t);
        let brake = Intents {
            brake: true,
            ..Default::default()
        };
        for _ in 0..100 {
            d.update_speed(&brake, 16.0, &t);
        }
        assert_eq!(d.speed, t.min_speed);
    }

    #[test]
    fn test_coasting_decays_slowly() {
        let t = Tuning::default();
        let mut d = Difficulty::new(&t);
        d.update_speed(&Intents::default(), 16.0, &t);
        assert!((d.speed - (4.0 - 0.032)).abs() < 1e-5);
        for _ in 0..10_000 {
            d.update_speed(&Intents::default(), 40.0, &t);
        }
        assert_eq!(d.speed, t.min_speed);
    }

    #[test]
    fn test_accelerate_and_brake_both_apply() {
        let t = Tuning::default();
        let mut d = Difficulty::new(&t);
        let both = Intents {
            accelerate: true,
            brake: true,
            ..Default::default()
        };
        d.update_speed(&both, 10.0, &t);
        // +0.2 then -0.4
        assert!((d.speed - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_zero_dt_leaves_speed() {
        let t = Tuning::default();
        let mut d = Difficulty::new(&t);
        d.update_speed(&accelerate(), 0.0, &t);
        d.update_speed(&Intents::default(), 0.0, &t);
        assert_eq!(d.speed, t.initial_speed);
    }

    #[test]
    fn test_interval_steps_down_per_hundred_points() {
        let t = Tuning::default();
        assert_eq!(interval_for_score(0.0, &t), 1200.0);
        assert_eq!(interval_for_score(99.9, &t), 1200.0);
        assert_eq!(interval_for_score(100.0, &t), 1120.0);
        assert_eq!(interval_for_score(250.0, &t), 1040.0);
        assert_eq!(interval_for_score(100_000.0, &t), t.min_spawn_interval);

        let mut last = f32::MAX;
        for score in (0..2_000).step_by(25) {
            let interval = interval_for_score(score as f32, &t);
            assert!(interval <= last);
            assert!(interval >= t.min_spawn_interval);
            last = interval;
        }
    }

    #[test]
    fn test_spawn_timer_fires_and_recomputes() {
        let t = Tuning::default();
        let mut d = Difficulty::new(&t);
        assert!(!d.advance_spawn_timer(1000.0, 350.0, &t));
        // Score moved but no spawn yet, interval untouched
        assert_eq!(d.spawn_interval, 1200.0);
        assert!(d.advance_spawn_timer(200.0, 350.0, &t));
        assert_eq!(d.spawn_timer, 0.0);
        assert_eq!(d.spawn_interval, 960.0);
    }

    proptest! {
        #[test]
        fn prop_speed_stays_in_range(
            accel_rate in 0.0f32..1.0,
            brake_rate in 0.0f32..1.0,
            passive_decay in 0.0f32..0.1,
            inputs in prop::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..40.0), 1..200),
        ) {
            let t = Tuning { accel_rate, brake_rate, passive_decay, ..Default::default() };
            prop_assert!(t.validate().is_ok());
            let mut d = Difficulty::new(&t);
            for (accelerate, brake, dt) in inputs {
                let intents = Intents { accelerate, brake, ..Default::default() };
                d.update_speed(&intents, dt, &t);
                prop_assert!(d.speed >= t.min_speed && d.speed <= t.max_speed);
            }
        }
    }
}
