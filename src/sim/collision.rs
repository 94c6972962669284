//! Axis-aligned collision predicates
//!
//! Ball vs brick uses a "centre inside rectangle" test rather than a true
//! circle/rectangle overlap. Glancing hits at high speed are missed; that is
//! the known approximation the game is tuned around.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// True if the circle's centre lies strictly inside `rect`.
///
/// The radius is accepted for call-site symmetry but deliberately unused.
#[inline]
pub fn circle_in_rect(center: Vec2, _radius: f32, rect: &Rect) -> bool {
    center.x > rect.x && center.x < rect.right() && center.y > rect.y && center.y < rect.bottom()
}

/// Standard AABB intersection (touching edges do not count)
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Screen rectangle of the brick at grid cell (`col`, `row`)
#[inline]
pub fn brick_rect(col: usize, row: usize) -> Rect {
    Rect::new(
        col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
        row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
        BRICK_WIDTH,
        BRICK_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_in_rect_is_strict() {
        let rect = Rect::new(10.0, 10.0, 50.0, 20.0);
        assert!(circle_in_rect(Vec2::new(35.0, 20.0), BALL_RADIUS, &rect));
        // On the edge does not count
        assert!(!circle_in_rect(Vec2::new(10.0, 20.0), BALL_RADIUS, &rect));
        assert!(!circle_in_rect(Vec2::new(35.0, 30.0), BALL_RADIUS, &rect));
    }

    #[test]
    fn test_circle_overlapping_edge_is_not_a_hit() {
        // The disc overlaps the rect by 5px but its centre is outside
        let rect = Rect::new(10.0, 10.0, 50.0, 20.0);
        assert!(!circle_in_rect(Vec2::new(35.0, 35.0), BALL_RADIUS, &rect));
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(rects_overlap(&Rect::new(2.0, 2.0, 2.0, 2.0), &a));
        // Touching edges
        assert!(!rects_overlap(&a, &Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!rects_overlap(&a, &Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_brick_rect_layout() {
        assert_eq!(brick_rect(0, 0), Rect::new(5.0, 30.0, 50.0, 20.0));
        let last = brick_rect(BRICK_COLUMNS - 1, BRICK_ROWS - 1);
        assert_eq!(last.x, 500.0);
        assert_eq!(last.y, 155.0);
        assert!(last.right() <= FIELD_WIDTH);
    }
}
