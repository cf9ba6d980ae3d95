//! Axis-aligned rectangle overlap
//!
//! Cars are boxes in track space (x right, y down). Touching edges count as a
//! hit: two boxes only miss when one lies strictly beyond the other on an axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Vec2 {
        (self.min() + self.max()) * 0.5
    }
}

/// Check whether two boxes overlap (shared edges included)
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.left() || a.left() > b.right() || a.bottom() < b.top() || a.top() > b.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_separated_boxes_miss() {
        let player = Rect::new(0.0, 600.0, 48.0, 80.0);
        let obstacle = Rect::new(200.0, 0.0, 48.0, 80.0);
        assert!(!overlaps(&player, &obstacle));
        assert!(!overlaps(&obstacle, &player));
    }

    #[test]
    fn test_identical_boxes_hit() {
        let r = Rect::new(56.0, 300.0, 48.0, 80.0);
        assert!(overlaps(&r, &r));
    }

    #[test]
    fn test_touching_edges_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Bottom edge of `a` sits on the top edge of `b`
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        // Right edge of `a` sits on the left edge of `c`
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &c));
    }

    #[test]
    fn test_gap_on_one_axis_misses() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.5, 10.0, 10.0);
        let left = Rect::new(-10.5, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &below));
        assert!(!overlaps(&a, &left));
    }

    #[test]
    fn test_corners_and_center() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.min(), Vec2::new(10.0, 20.0));
        assert_eq!(r.max(), Vec2::new(40.0, 60.0));
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            0.0f32..200.0,
            0.0f32..200.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_box_overlaps_itself(a in rect_strategy()) {
            prop_assert!(overlaps(&a, &a));
        }
    }
}
