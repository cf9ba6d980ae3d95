//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Explicit state, passed to `tick` by the driver
//! - Seeded RNG only
//! - Stable iteration order (spawn order)

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod obstacles;
pub mod player;
pub mod state;
pub mod tick;

pub use clock::{Stepper, clamp_dt};
pub use collision::{Rect, overlaps};
pub use difficulty::{Difficulty, interval_for_score};
pub use obstacles::{AdvanceOutcome, Obstacle, ObstacleManager};
pub use player::PlayerState;
pub use state::{
    Command, CrashNotice, Hud, Intents, OBSTACLE_COLOR, PLAYER_COLOR, Phase, SimulationState,
    Snapshot,
};
pub use tick::{TickOutcome, apply_command, tick};
