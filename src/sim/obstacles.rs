//! Obstacle cars: spawning, scrolling, retiring
//!
//! The manager is the only owner of the active set. Everything else reads it
//! through `iter` / `first_collision`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, overlaps};
use crate::tuning::Tuning;

/// An obstacle car scrolling down its lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Lane it spawned in
    pub lane: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Multiplier on road speed, fixed at spawn
    pub speed_factor: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Result of one `advance` pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdvanceOutcome {
    /// Obstacles that left the bottom of the track
    pub passed: u32,
    /// Score earned for them
    pub reward: f32,
}

/// Owns the active obstacles and the RNG that places them
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleManager {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Place a new obstacle above the visible area in a random lane
    pub fn spawn(&mut self, tuning: &Tuning) -> &Obstacle {
        let lane = self.rng.random_range(0..tuning.lane_count);
        let extra = if tuning.spawn_extra_offset > 0.0 {
            self.rng.random_range(0.0..tuning.spawn_extra_offset)
        } else {
            0.0
        };
        let speed_factor = self
            .rng
            .random_range(tuning.speed_factor_min..=tuning.speed_factor_max);

        let id = self.next_id;
        self.next_id += 1;

        log::debug!(
            "Spawned obstacle {} in lane {} (factor {:.2})",
            id,
            lane,
            speed_factor
        );

        self.obstacles.push(Obstacle {
            id,
            lane,
            x: tuning.lane_x(lane),
            y: -tuning.car_height - extra,
            width: tuning.car_width,
            height: tuning.car_height,
            speed_factor,
        });
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Scroll every obstacle down and retire the ones past the bottom
    ///
    /// Motion and removal happen in one pass; each retired obstacle pays
    /// `pass_reward` exactly once because it is gone afterwards.
    pub fn advance(&mut self, dt: f32, speed: f32, tuning: &Tuning) -> AdvanceOutcome {
        let limit = tuning.track_height + tuning.despawn_margin;
        let step = speed * dt / tuning.time_unit;
        let mut outcome = AdvanceOutcome::default();

        self.obstacles.retain_mut(|obstacle| {
            obstacle.y += step * obstacle.speed_factor;
            if obstacle.y > limit {
                outcome.passed += 1;
                outcome.reward += tuning.pass_reward;
                log::debug!("Obstacle {} passed", obstacle.id);
                false
            } else {
                true
            }
        });

        outcome
    }

    /// First active obstacle (in spawn order) overlapping `target`
    pub fn first_collision(&self, target: &Rect) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| overlaps(&o.rect(), target))
    }

    /// Drop every obstacle (restart)
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Insert a hand-placed obstacle (scenario setup)
    pub fn push(&mut self, mut obstacle: Obstacle) {
        obstacle.id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(obstacle);
    }
}
