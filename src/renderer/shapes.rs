//! Shape generation for 2D primitives
//!
//! Everything is emitted in track coordinates (x right, y down); the pipeline
//! maps to NDC.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::{Phase, Rect, Snapshot};

/// Length of a painted lane dash and the gap after it
const DASH_LENGTH: f32 = 40.0;
const DASH_GAP: f32 = 30.0;
const DASH_WIDTH: f32 = 4.0;

/// Generate vertices for a filled axis-aligned quad between two corners
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    quad(r.min(), r.max(), color)
}

/// Generate a car: body plus a darker windscreen band near the front
pub fn car(r: &Rect, color: [f32; 4], facing_up: bool) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(12);
    vertices.extend_from_slice(&rect(r, color));

    let shade = [color[0] * 0.4, color[1] * 0.4, color[2] * 0.4, color[3]];
    let inset = r.width * 0.15;
    let band = r.height * 0.18;
    let top = if facing_up {
        r.top() + r.height * 0.2
    } else {
        r.bottom() - r.height * 0.2 - band
    };
    vertices.extend_from_slice(&quad(
        Vec2::new(r.left() + inset, top),
        Vec2::new(r.right() - inset, top + band),
        shade,
    ));
    vertices
}

/// Dashed separators between lanes
pub fn lane_marks(snap: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for lane in 1..snap.lane_count {
        let x = snap.lane_left(lane);
        let mut y = 0.0;
        while y < snap.track_height {
            let end = (y + DASH_LENGTH).min(snap.track_height);
            vertices.extend_from_slice(&quad(
                Vec2::new(x - DASH_WIDTH / 2.0, y),
                Vec2::new(x + DASH_WIDTH / 2.0, end),
                colors::LANE_MARK,
            ));
            y += DASH_LENGTH + DASH_GAP;
        }
    }

    vertices
}

/// Full frame: shoulders, road, lane marks, obstacles, player, phase tint
pub fn scene_vertices(snap: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(64 + snap.obstacles.len() * 12);
    let size = Vec2::new(snap.track_width, snap.track_height);

    vertices.extend_from_slice(&quad(Vec2::ZERO, size, colors::SHOULDER));
    vertices.extend_from_slice(&quad(
        Vec2::new(snap.track_margin, 0.0),
        Vec2::new(snap.track_width - snap.track_margin, snap.track_height),
        colors::ROAD,
    ));
    vertices.extend(lane_marks(snap));

    for obstacle in &snap.obstacles {
        vertices.extend(car(obstacle, snap.obstacle_color, false));
    }
    vertices.extend(car(&snap.player, snap.player_color, true));

    match snap.phase {
        Phase::Crashed => vertices.extend_from_slice(&quad(Vec2::ZERO, size, colors::CRASH_TINT)),
        Phase::Paused | Phase::Idle => {
            vertices.extend_from_slice(&quad(Vec2::ZERO, size, colors::PAUSE_TINT))
        }
        Phase::Running => {}
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Command, SimulationState, apply_command};
    use crate::tuning::Tuning;

    #[test]
    fn test_rect_covers_corners() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let v = rect(&r, [1.0; 4]);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_lane_marks_between_lanes_only() {
        let state = SimulationState::new(Tuning::default());
        let snap = state.snapshot();
        let marks = lane_marks(&snap);
        assert!(!marks.is_empty());
        assert_eq!(marks.len() % 6, 0);
        for v in &marks {
            assert!(v.position[0] > snap.track_margin);
            assert!(v.position[0] < snap.track_width - snap.track_margin);
        }
    }

    #[test]
    fn test_lane_marks_follow_lane_edges() {
        let state = SimulationState::new(Tuning {
            lane_count: 4,
            car_width: 40.0,
            ..Default::default()
        });
        let snap = state.snapshot();
        let edges: Vec<f32> = (1..4).map(|lane| snap.lane_left(lane)).collect();
        assert_eq!(edges, vec![110.0, 200.0, 290.0]);
        for v in lane_marks(&snap) {
            assert!(
                edges
                    .iter()
                    .any(|&x| (v.position[0] - x).abs() <= DASH_WIDTH / 2.0)
            );
        }
    }

    #[test]
    fn test_scene_grows_with_obstacles() {
        let mut state = SimulationState::new(Tuning::default());
        apply_command(&mut state, Command::Start);
        let empty = scene_vertices(&state.snapshot()).len();
        state.obstacles.spawn(&state.tuning);
        state.obstacles.spawn(&state.tuning);
        let busy = scene_vertices(&state.snapshot()).len();
        assert_eq!(busy, empty + 24);
    }

    #[test]
    fn test_tint_only_when_not_running() {
        let mut state = SimulationState::new(Tuning::default());
        let idle = scene_vertices(&state.snapshot()).len();
        apply_command(&mut state, Command::Start);
        let running = scene_vertices(&state.snapshot()).len();
        assert_eq!(idle, running + 6);
    }
}
