//! Pure geometry: coordinate-space conversion, connector anchors, distances.
//!
//! Pointer events arrive in viewport coordinates; everything stored on the
//! board is in board-local coordinates (origin at the board's top-left).
//! The connector anchor is derived analytically from a note's stored
//! position and width, so hit testing and rendering always agree.

use serde::{Deserialize, Serialize};

/// Horizontal inset of the connector handle from a note's right edge.
pub const CONNECTOR_INSET_X: f64 = 25.0;
/// Vertical offset of the connector handle from a note's top edge.
pub const CONNECTOR_OFFSET_Y: f64 = 15.0;

/// A point in either viewport or board-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `self - other` as a `(dx, dy)` delta.
    pub fn delta_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance.
    pub fn distance_to(self, other: Point) -> f64 {
        let (dx, dy) = self.delta_from(other);
        dx.hypot(dy)
    }
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Floor each axis independently. NaN collapses to the floor.
    pub fn at_least(self, floor: Size) -> Self {
        Self::new(self.width.max(floor.width), self.height.max(floor.height))
    }
}

/// Convert a viewport pointer position into board-local coordinates, given
/// the board's top-left corner in the viewport.
pub fn to_board(pointer: Point, board_origin: Point) -> Point {
    Point::new(pointer.x - board_origin.x, pointer.y - board_origin.y)
}

/// Centre of a note's connector handle.
pub fn connector_anchor(position: Point, width: f64) -> Point {
    Point::new(
        position.x + width - CONNECTOR_INSET_X,
        position.y + CONNECTOR_OFFSET_Y,
    )
}

/// Top-left corner of a note spawned by a click at `click`.
pub fn spawn_top_left(click: Point, offset: Size) -> Point {
    Point::new(click.x - offset.width, click.y - offset.height)
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = b.delta_from(a);
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return p.distance_to(a);
    }
    let (apx, apy) = p.delta_from(a);
    let t = ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * abx, a.y + t * aby))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_to_board() {
        let p = to_board(Point::new(300.0, 200.0), Point::new(20.0, 50.0));
        assert_eq!(p, Point::new(280.0, 150.0));
    }

    #[test]
    fn anchor_tracks_width() {
        let at = connector_anchor(Point::new(10.0, 20.0), 150.0);
        assert_eq!(at, Point::new(135.0, 35.0));
        let wider = connector_anchor(Point::new(10.0, 20.0), 300.0);
        assert_eq!(wider, Point::new(285.0, 35.0));
    }

    #[test]
    fn spawn_offset_from_click() {
        let top_left = spawn_top_left(Point::new(300.0, 200.0), Size::new(75.0, 30.0));
        assert_eq!(top_left, Point::new(225.0, 170.0));
    }

    #[test]
    fn size_floor_handles_negative_and_nan() {
        let floor = Size::new(100.0, 60.0);
        assert_eq!(Size::new(-40.0, 10.0).at_least(floor), floor);
        assert_eq!(Size::new(f64::NAN, 90.0).at_least(floor), Size::new(100.0, 90.0));
    }

    #[test]
    fn segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        // Beyond the end: distance to the endpoint.
        assert!((distance_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-9);
        // Degenerate segment.
        assert!((distance_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-9);
    }
}
