//! Keyboard to intents/commands
//!
//! Held keys become continuous intents; a few keys fire one-shot commands.
//! Key names follow `KeyboardEvent.key`.

use crate::sim::{Command, Intents, SimulationState, apply_command};

/// Which steering/throttle keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown; returns true if the key is a driving key
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    /// Record a keyup; returns true if the key is a driving key
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    /// Release everything (window lost focus, keyups will never arrive)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn intents(&self) -> Intents {
        Intents {
            steer_left: self.left,
            steer_right: self.right,
            accelerate: self.up,
            brake: self.down,
        }
    }

    fn set(&mut self, key: &str, held: bool) -> bool {
        let slot = match key {
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            "ArrowUp" | "w" | "W" => &mut self.up,
            "ArrowDown" | "s" | "S" => &mut self.down,
            _ => return false,
        };
        *slot = held;
        true
    }
}

/// One-shot command bound to a key, if any
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "Escape" | "p" | "P" => Some(Command::TogglePause),
        "Enter" | " " => Some(Command::Start),
        "r" | "R" => Some(Command::Restart),
        _ => None,
    }
}

/// Commands gathered from DOM events between two frames
///
/// Explicit commands apply in arrival order. Focus-loss pauses are a flag
/// rather than a `TogglePause`, so any number of them pause at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlQueue {
    commands: Vec<Command>,
    pause_requested: bool,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Pause if running once the queue is applied (blur, hidden tab)
    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// A restart is waiting for the next frame
    pub fn restart_pending(&self) -> bool {
        self.commands.contains(&Command::Restart)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && !self.pause_requested
    }

    /// Apply everything queued, then honour a pending pause request
    pub fn apply(&mut self, state: &mut SimulationState) {
        for command in self.commands.drain(..) {
            apply_command(state, command);
        }
        if std::mem::take(&mut self.pause_requested) && state.running() {
            apply_command(state, Command::TogglePause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Phase;
    use crate::tuning::Tuning;

    #[test]
    fn test_held_keys_map_to_intents() {
        let mut keys = KeyState::new();
        assert!(keys.key_down("ArrowLeft"));
        assert!(keys.key_down("w"));
        assert_eq!(
            keys.intents(),
            Intents {
                steer_left: true,
                accelerate: true,
                ..Default::default()
            }
        );
        assert!(keys.key_up("ArrowLeft"));
        assert!(!keys.intents().steer_left);
        assert!(keys.intents().accelerate);
    }

    #[test]
    fn test_opposing_keys_both_held() {
        let mut keys = KeyState::new();
        keys.key_down("ArrowUp");
        keys.key_down("ArrowDown");
        let intents = keys.intents();
        assert!(intents.accelerate && intents.brake);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut keys = KeyState::new();
        assert!(!keys.key_down("q"));
        assert_eq!(keys.intents(), Intents::default());
    }

    #[test]
    fn test_release_all() {
        let mut keys = KeyState::new();
        keys.key_down("d");
        keys.key_down("s");
        keys.release_all();
        assert_eq!(keys.intents(), Intents::default());
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(command_for_key("Escape"), Some(Command::TogglePause));
        assert_eq!(command_for_key("Enter"), Some(Command::Start));
        assert_eq!(command_for_key("R"), Some(Command::Restart));
        assert_eq!(command_for_key("ArrowLeft"), None);
    }

    fn running() -> SimulationState {
        let mut state = SimulationState::new(Tuning::default());
        apply_command(&mut state, Command::Start);
        state
    }

    #[test]
    fn test_repeated_pause_requests_pause_once() {
        let mut state = running();
        let mut queue = ControlQueue::new();
        // Tab switch fires blur and visibilitychange before the next frame
        queue.request_pause();
        queue.request_pause();
        queue.apply(&mut state);
        assert!(state.paused());
        assert!(queue.is_empty());

        // Later frames leave it paused
        queue.apply(&mut state);
        assert!(state.paused());
    }

    #[test]
    fn test_pause_key_then_blur_stays_paused() {
        let mut state = running();
        let mut queue = ControlQueue::new();
        queue.push(Command::TogglePause);
        queue.request_pause();
        queue.apply(&mut state);
        assert!(state.paused());
    }

    #[test]
    fn test_pause_request_ignored_when_not_running() {
        let mut state = SimulationState::new(Tuning::default());
        let mut queue = ControlQueue::new();
        queue.request_pause();
        queue.apply(&mut state);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_commands_apply_in_order() {
        let mut state = SimulationState::new(Tuning::default());
        let mut queue = ControlQueue::new();
        queue.push(Command::Start);
        queue.push(Command::TogglePause);
        queue.apply(&mut state);
        assert!(state.paused());
    }

    #[test]
    fn test_restart_pending_until_applied() {
        let mut state = running();
        let mut queue = ControlQueue::new();
        assert!(!queue.restart_pending());
        queue.push(Command::Restart);
        assert!(queue.restart_pending());
        queue.apply(&mut state);
        assert!(!queue.restart_pending());
        assert!(state.running());
    }
}
