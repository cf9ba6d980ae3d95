//! Variable timestep simulation tick
//!
//! Core game loop: one call advances a running session by one frame.

use super::state::{Command, Intents, Phase, SimulationState};

/// What a call to `tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or a zero-length frame
    Skipped,
    /// Frame simulated, still running
    Advanced,
    /// Frame ended on a collision
    Crashed,
}

/// Apply a control-surface command
pub fn apply_command(state: &mut SimulationState, command: Command) {
    match command {
        Command::Start => {
            if state.phase == Phase::Idle {
                state.reset();
                log::info!("Session started");
            }
        }
        Command::TogglePause => match state.phase {
            Phase::Running => {
                state.phase = Phase::Paused;
                log::info!("Paused");
            }
            Phase::Paused => {
                state.phase = Phase::Running;
                log::info!("Resumed");
            }
            Phase::Idle | Phase::Crashed => {}
        },
        Command::Restart => {
            state.reset();
            log::info!("Session restarted");
        }
    }
}

/// Advance a running session by `dt` milliseconds
///
/// Order within a frame: steering, speed, obstacle motion and pass rewards,
/// collision, spawning, distance score, HUD. A collision ends the frame right
/// away, so that frame neither spawns nor earns distance score.
pub fn tick(state: &mut SimulationState, intents: &Intents, dt: f32) -> TickOutcome {
    if state.phase != Phase::Running || dt <= 0.0 {
        return TickOutcome::Skipped;
    }

    state.ticks += 1;

    state.player.steer(intents, &state.tuning);
    state.difficulty.update_speed(intents, dt, &state.tuning);

    let passed = state
        .obstacles
        .advance(dt, state.difficulty.speed, &state.tuning);
    state.score += passed.reward;

    let player = state.player.rect();
    if let Some(hit) = state.obstacles.first_collision(&player) {
        log::debug!("Hit obstacle {} in lane {}", hit.id, hit.lane);
        state.crash();
        return TickOutcome::Crashed;
    }

    if state
        .difficulty
        .advance_spawn_timer(dt, state.score, &state.tuning)
    {
        state.obstacles.spawn(&state.tuning);
    }

    state.score += state.difficulty.distance_score(dt, &state.tuning);
    state.refresh_hud();

    TickOutcome::Advanced
}
