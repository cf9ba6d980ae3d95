//! Game state and core simulation types
//!
//! One `SimulationState` holds everything a session mutates; drivers pass it
//! to `tick` / `apply_command` explicitly.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::Difficulty;
use super::obstacles::ObstacleManager;
use super::player::PlayerState;
use crate::tuning::Tuning;

/// Player car colour handed to the renderer
pub const PLAYER_COLOR: [f32; 4] = [0.2, 0.8, 1.0, 1.0];
/// Obstacle car colour handed to the renderer
pub const OBSTACLE_COLOR: [f32; 4] = [1.0, 0.3, 0.25, 1.0];

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Before the first start
    Idle,
    /// Ticking
    Running,
    /// Frozen until resumed
    Paused,
    /// Hit an obstacle, waiting for a restart
    Crashed,
}

/// Control-surface commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Idle -> Running only
    Start,
    /// Running <-> Paused
    TogglePause,
    /// Any phase -> fresh Running
    Restart,
}

/// Player intents sampled at tick time (latest state only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub steer_left: bool,
    pub steer_right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

/// Terminal notification, delivered by the driver after the crash frame is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashNotice {
    pub final_score: u64,
}

/// Values shown on the HUD (both floored)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub speed: u32,
}

impl Hud {
    pub fn from_values(score: f32, speed: f32) -> Self {
        Self {
            score: score.max(0.0).floor() as u64,
            speed: speed.max(0.0).floor() as u32,
        }
    }
}

/// Read-only view of a frame for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub track_width: f32,
    pub track_height: f32,
    pub track_margin: f32,
    pub lane_count: usize,
    /// Width of one lane corridor
    pub lane_width: f32,
    /// Left edge of a car centred in each lane
    pub lane_x: Vec<f32>,
    pub player: Rect,
    /// Lane the player car's centre is in
    pub player_lane: usize,
    pub player_color: [f32; 4],
    pub obstacles: Vec<Rect>,
    pub obstacle_color: [f32; 4],
    pub phase: Phase,
    pub hud: Hud,
}

impl Snapshot {
    /// Left edge of a lane corridor (lane 0 starts at the margin)
    pub fn lane_left(&self, lane: usize) -> f32 {
        self.track_margin + lane as f32 * self.lane_width
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub phase: Phase,
    /// Continuous score, never decreases until a restart
    pub score: f32,
    pub difficulty: Difficulty,
    pub player: PlayerState,
    pub obstacles: ObstacleManager,
    pub tuning: Tuning,
    /// Frames simulated since the last restart
    pub ticks: u64,
    /// Latest HUD values
    pub hud: Hud,
    pending_notice: Option<CrashNotice>,
}

impl SimulationState {
    /// Idle session; nothing moves until `Command::Start`
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: Phase::Idle,
            score: 0.0,
            difficulty: Difficulty::new(&tuning),
            player: PlayerState::new(&tuning),
            obstacles: ObstacleManager::new(tuning.seed),
            ticks: 0,
            hud: Hud::from_values(0.0, tuning.initial_speed),
            pending_notice: None,
            tuning,
        }
    }

    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn crashed(&self) -> bool {
        self.phase == Phase::Crashed
    }

    /// Fresh session state, straight into Running
    ///
    /// The RNG keeps its sequence so consecutive runs see different traffic.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.score = 0.0;
        self.difficulty = Difficulty::new(&self.tuning);
        self.player = PlayerState::new(&self.tuning);
        self.ticks = 0;
        self.hud = Hud::from_values(0.0, self.difficulty.speed);
        self.pending_notice = None;
        self.phase = Phase::Running;
    }

    /// Enter Crashed and queue the terminal notice
    pub(crate) fn crash(&mut self) {
        let final_score = self.score.max(0.0).floor() as u64;
        self.phase = Phase::Crashed;
        self.pending_notice = Some(CrashNotice { final_score });
        self.refresh_hud();
        log::info!("Crashed with score {}", final_score);
    }

    pub(crate) fn refresh_hud(&mut self) {
        self.hud = Hud::from_values(self.score, self.difficulty.speed);
    }

    /// Hand over the pending crash notice (at most once per crash)
    pub fn take_notice(&mut self) -> Option<CrashNotice> {
        self.pending_notice.take()
    }

    /// Check for an undelivered crash notice without consuming it
    pub fn has_pending_notice(&self) -> bool {
        self.pending_notice.is_some()
    }

    /// Everything the renderer needs for one frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            track_width: self.tuning.track_width,
            track_height: self.tuning.track_height,
            track_margin: self.tuning.track_margin,
            lane_count: self.tuning.lane_count,
            lane_width: self.tuning.lane_width(),
            lane_x: (0..self.tuning.lane_count)
                .map(|lane| self.tuning.lane_x(lane))
                .collect(),
            player: self.player.rect(),
            player_lane: self.player.lane,
            player_color: PLAYER_COLOR,
            obstacles: self.obstacles.iter().map(|o| o.rect()).collect(),
            obstacle_color: OBSTACLE_COLOR,
            phase: self.phase,
            hud: self.hud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let state = SimulationState::new(Tuning::default());
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.running());
        assert!(!state.paused());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.hud, Hud { score: 0, speed: 4 });
    }

    #[test]
    fn test_hud_floors_values() {
        assert_eq!(Hud::from_values(99.99, 13.7), Hud { score: 99, speed: 13 });
        assert_eq!(Hud::from_values(-1.0, -1.0), Hud::default());
    }

    #[test]
    fn test_crash_notice_taken_once() {
        let mut state = SimulationState::new(Tuning::default());
        state.reset();
        state.score = 123.9;
        state.crash();
        assert!(state.crashed());
        assert!(state.has_pending_notice());
        assert_eq!(state.take_notice(), Some(CrashNotice { final_score: 123 }));
        assert_eq!(state.take_notice(), None);
        // Taking the notice does not touch the session
        assert!(state.crashed());
        assert_eq!(state.score, 123.9);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = SimulationState::new(Tuning::default());
        state.reset();
        state.obstacles.spawn(&state.tuning);
        let snap = state.snapshot();
        assert_eq!(snap.player, state.player.rect());
        assert_eq!(snap.obstacles.len(), 1);
        assert_eq!(snap.lane_count, 3);
        assert_eq!(snap.lane_width, state.tuning.lane_width());
        assert_eq!(snap.lane_x, vec![56.0, 176.0, 296.0]);
        assert_eq!(snap.player_lane, state.tuning.center_lane());
        assert_eq!(snap.lane_left(0), state.tuning.track_margin);
        assert_eq!(snap.lane_left(1), 140.0);
        assert_eq!(snap.phase, Phase::Running);
        assert!(serde_json::to_string(&snap).is_ok());
    }
}
