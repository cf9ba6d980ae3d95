//! The player's car

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::Intents;
use crate::tuning::Tuning;

/// Player car: fixed row, continuous horizontal position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Lane under the car centre (informational, movement is continuous)
    pub lane: usize,
    pub x: f32,
    pub y: f32,
    /// Lateral velocity in track pixels per frame
    pub velocity_x: f32,
    pub width: f32,
    pub height: f32,
}

impl PlayerState {
    /// Car parked in the centre lane, at rest
    pub fn new(tuning: &Tuning) -> Self {
        let lane = tuning.center_lane();
        Self {
            lane,
            x: tuning.lane_x(lane),
            y: tuning.player_y(),
            velocity_x: 0.0,
            width: tuning.car_width,
            height: tuning.car_height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Apply one frame of steering
    ///
    /// Steering is per frame on purpose: velocity and position change by fixed
    /// amounts per call regardless of the frame's dt.
    pub fn steer(&mut self, intents: &Intents, tuning: &Tuning) {
        if intents.steer_left {
            self.velocity_x = (self.velocity_x - tuning.steer_accel).max(-tuning.max_steer);
        }
        if intents.steer_right {
            self.velocity_x = (self.velocity_x + tuning.steer_accel).min(tuning.max_steer);
        }
        if !intents.steer_left && !intents.steer_right {
            self.velocity_x *= tuning.steer_friction;
            if self.velocity_x.abs() < tuning.steer_epsilon {
                self.velocity_x = 0.0;
            }
        }

        self.x = (self.x + self.velocity_x).clamp(tuning.player_min_x(), tuning.player_max_x());
        self.lane = tuning.lane_at(self.x + self.width / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LEFT: Intents = Intents {
        steer_left: true,
        steer_right: false,
        accelerate: false,
        brake: false,
    };
    const RIGHT: Intents = Intents {
        steer_left: false,
        steer_right: true,
        accelerate: false,
        brake: false,
    };

    #[test]
    fn test_starts_centred_at_rest() {
        let t = Tuning::default();
        let p = PlayerState::new(&t);
        assert_eq!(p.lane, 1);
        assert_eq!(p.x, t.lane_x(1));
        assert_eq!(p.y, 600.0);
        assert_eq!(p.velocity_x, 0.0);
    }

    #[test]
    fn test_steer_increment_ignores_dt() {
        let t = Tuning::default();
        let mut p = PlayerState::new(&t);
        let x0 = p.x;
        p.steer(&RIGHT, &t);
        assert!((p.velocity_x - t.steer_accel).abs() < 1e-6);
        assert!((p.x - (x0 + t.steer_accel)).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_caps_at_max_steer() {
        let t = Tuning::default();
        let mut p = PlayerState::new(&t);
        for _ in 0..100 {
            p.steer(&LEFT, &t);
        }
        assert_eq!(p.velocity_x, -t.max_steer);
        assert_eq!(p.x, t.player_min_x());
        assert_eq!(p.lane, 0);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let t = Tuning::default();
        let mut p = PlayerState::new(&t);
        for _ in 0..5 {
            p.steer(&RIGHT, &t);
        }
        let idle = Intents::default();
        let mut frames = 0;
        while p.velocity_x != 0.0 {
            p.steer(&idle, &t);
            frames += 1;
            assert!(frames < 200, "velocity never settled");
        }
        assert_eq!(p.velocity_x, 0.0);
    }

    #[test]
    fn test_both_directions_cancel() {
        let t = Tuning::default();
        let mut p = PlayerState::new(&t);
        let both = Intents {
            steer_left: true,
            steer_right: true,
            ..Default::default()
        };
        let x0 = p.x;
        p.steer(&both, &t);
        assert!(p.velocity_x.abs() < 1e-6);
        assert!((p.x - x0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_x_stays_on_track(steps in proptest::collection::vec(any::<(bool, bool)>(), 0..400)) {
            let t = Tuning::default();
            let mut p = PlayerState::new(&t);
            for (left, right) in steps {
                let intents = Intents { steer_left: left, steer_right: right, ..Default::default() };
                p.steer(&intents, &t);
                prop_assert!(p.x >= t.player_min_x() && p.x <= t.player_max_x());
                prop_assert!(p.velocity_x.abs() <= t.max_steer);
                prop_assert!(p.lane < t.lane_count);
            }
        }
    }
}
