//! Demo/attract mode driver
//!
//! Reads the same snapshot the renderer gets and produces intents, so it can
//! stand in for the keyboard without touching simulation internals.

use crate::sim::{Intents, Rect, Snapshot};

/// Lateral velocity is estimated from frame-to-frame motion; within this band
/// of the wanted velocity the autopilot lets friction do the work.
const VELOCITY_BAND: f32 = 0.5;
/// How hard the wanted velocity leans toward the target lane
const SEEK_GAIN: f32 = 0.15;
/// Upper bound on the wanted lateral velocity
const MAX_SEEK_VELOCITY: f32 = 6.0;
/// Gap (track px) below which the autopilot brakes
const BRAKE_GAP: f32 = 150.0;
/// Gap above which it is comfortable speeding up
const CRUISE_GAP: f32 = 350.0;

/// Lane-picking bot
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    last_x: Option<f32>,
    target_lane: Option<usize>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lane the bot is currently heading for
    pub fn target_lane(&self) -> Option<usize> {
        self.target_lane
    }

    /// Forget motion history (after a restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Intents for the next tick
    pub fn drive(&mut self, snap: &Snapshot) -> Intents {
        let player = snap.player;
        let velocity = self.last_x.map_or(0.0, |last| player.x - last);
        self.last_x = Some(player.x);

        let gaps: Vec<f32> = (0..snap.lane_count)
            .map(|lane| lane_gap(snap, &player, lane))
            .collect();

        let current = snap.player_lane;
        // Widest gap wins, ties go to the lane closest to where we are
        let best = (0..snap.lane_count)
            .max_by(|&a, &b| {
                gaps[a]
                    .partial_cmp(&gaps[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| current.abs_diff(b).cmp(&current.abs_diff(a)))
            })
            .unwrap_or(current);
        self.target_lane = Some(best);

        let target_x = snap.lane_x.get(best).copied().unwrap_or(player.x);
        let wanted = ((target_x - player.x) * SEEK_GAIN).clamp(-MAX_SEEK_VELOCITY, MAX_SEEK_VELOCITY);

        let gap = gaps[best];
        Intents {
            steer_left: velocity > wanted + VELOCITY_BAND,
            steer_right: velocity < wanted - VELOCITY_BAND,
            accelerate: gap > CRUISE_GAP,
            brake: gap < BRAKE_GAP,
        }
    }
}

/// Distance from the player's front to the closest incoming car in `lane`
fn lane_gap(snap: &Snapshot, player: &Rect, lane: usize) -> f32 {
    let left = snap.lane_left(lane);
    let right = left + snap.lane_width;
    snap.obstacles
        .iter()
        .filter(|o| o.right() >= left && o.left() <= right)
        .filter(|o| o.top() <= player.bottom())
        .map(|o| (player.top() - o.bottom()).max(0.0))
        .fold(f32::INFINITY, f32::min)
}
