pub mod hit_testing;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub use hit_testing::{HitShape, ShapeIndex};

/// Largest coordinate magnitude that survives the trip to `f32` unchanged
pub const MAX_COORDINATE: i32 = 1 << 24;

/// A position on the canvas in whole pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x as f32, self.y as f32)
    }

    pub fn is_drawable(self) -> bool {
        (-MAX_COORDINATE..=MAX_COORDINATE).contains(&self.x)
            && (-MAX_COORDINATE..=MAX_COORDINATE).contains(&self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Rejects any point a surface could not place exactly
pub(crate) fn check_drawable(shape: &str, points: &[Point]) -> Result<(), RenderError> {
    match points.iter().find(|p| !p.is_drawable()) {
        Some(p) => Err(RenderError::MalformedGeometry(format!(
            "{shape} point ({}, {}) is outside ±{MAX_COORDINATE}",
            p.x, p.y
        ))),
        None => Ok(()),
    }
}

/// Distance from a point to a line segment, with the projection clamped to the
/// segment's ends.
pub fn distance_to_segment(point: (f32, f32), start: (f32, f32), end: (f32, f32)) -> f32 {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let (px, py) = (point.0 - start.0, point.1 - start.1);

    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (px * px + py * py).sqrt();
    }

    let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (px - dx * t, py - dy * t);
    (cx * cx + cy * cy).sqrt()
}

/// Normalized inclusive bounds of the box spanned by two corners
pub fn normalized_bounds(a: Point, b: Point) -> (Point, Point) {
    (
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_clamps_to_ends() {
        assert_eq!(distance_to_segment((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
        assert_eq!(distance_to_segment((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
        assert_eq!(distance_to_segment((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
    }

    #[test]
    fn bounds_are_normalized() {
        let (min, max) = normalized_bounds(Point::new(100, 80), Point::new(20, 90));
        assert_eq!(min, Point::new(20, 80));
        assert_eq!(max, Point::new(100, 90));
    }

    #[test]
    fn huge_coordinates_are_not_drawable() {
        assert!(Point::new(MAX_COORDINATE, -MAX_COORDINATE).is_drawable());
        assert!(!Point::new(i32::MAX, 0).is_drawable());
        assert!(check_drawable("line", &[Point::new(0, 0), Point::new(0, i32::MIN)]).is_err());
    }
}
