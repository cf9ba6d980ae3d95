//! Lane Racer - A lane-dodging arcade driving game
//!
//! Core modules:
//! - `sim`: Simulation loop (player, obstacles, difficulty, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `input`: Keyboard to intent/command mapping
//! - `autopilot`: Demo driver that dodges on its own
//! - `tuning`: Data-driven game balance

pub mod autopilot;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use autopilot::Autopilot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Largest frame delta the stepper will hand to the simulation (ms)
    pub const MAX_FRAME_DT: f32 = 40.0;
    /// Frame duration the per-tick rates are expressed against (ms, ~60 Hz)
    pub const TIME_UNIT: f32 = 16.0;

    /// Track dimensions
    pub const TRACK_WIDTH: f32 = 400.0;
    pub const TRACK_HEIGHT: f32 = 700.0;
    pub const TRACK_MARGIN: f32 = 20.0;
    pub const LANE_COUNT: usize = 3;

    /// Car dimensions (player and obstacles share them)
    pub const CAR_WIDTH: f32 = 48.0;
    pub const CAR_HEIGHT: f32 = 80.0;
    /// Gap between the player car and the bottom of the track
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Steering (per frame, not dt-scaled)
    pub const STEER_ACCEL: f32 = 0.9;
    pub const MAX_STEER: f32 = 7.0;
    pub const STEER_FRICTION: f32 = 0.85;
    pub const STEER_EPSILON: f32 = 0.05;

    /// Road speed
    pub const INITIAL_SPEED: f32 = 4.0;
    pub const MIN_SPEED: f32 = 2.0;
    pub const MAX_SPEED: f32 = 14.0;
    /// Speed change per ms while accelerating / braking / coasting
    pub const ACCEL_RATE: f32 = 0.02;
    pub const BRAKE_RATE: f32 = 0.04;
    pub const PASSIVE_DECAY: f32 = 0.002;

    /// Obstacle spawning
    pub const SPEED_FACTOR_MIN: f32 = 0.8;
    pub const SPEED_FACTOR_MAX: f32 = 1.2;
    pub const SPAWN_EXTRA_OFFSET: f32 = 200.0;
    pub const INITIAL_SPAWN_INTERVAL: f32 = 1200.0;
    pub const SPAWN_INTERVAL_STEP: f32 = 80.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 400.0;

    /// Scoring
    pub const SCORE_STEP: f32 = 100.0;
    pub const PASS_REWARD: f32 = 10.0;
    pub const DESPAWN_MARGIN: f32 = 0.0;
    pub const DISTANCE_SCORE_RATE: f32 = 0.005;
}
