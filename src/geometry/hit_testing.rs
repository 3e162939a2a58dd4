use super::{Point, distance_to_segment, normalized_bounds};
use crate::command::ShapeTag;

/// The painted footprint of one tagged shape
#[derive(Debug, Clone, PartialEq)]
pub enum HitShape {
    Polyline { points: Vec<Point>, width: u32 },
    Segment { from: Point, to: Point, width: u32 },
    Rect { min: Point, max: Point, width: u32, filled: bool },
}

impl HitShape {
    /// Distance from `pos` to the painted pixels of this shape; zero when the
    /// position lies on the shape.
    pub fn distance(&self, pos: Point) -> f32 {
        let p = (pos.x as f32, pos.y as f32);
        match self {
            HitShape::Polyline { points, width } => {
                let nearest = match points.as_slice() {
                    [] => f32::INFINITY,
                    [only] => distance_to_segment(p, as_f32(*only), as_f32(*only)),
                    _ => points
                        .windows(2)
                        .map(|w| distance_to_segment(p, as_f32(w[0]), as_f32(w[1])))
                        .fold(f32::INFINITY, f32::min),
                };
                (nearest - *width as f32 / 2.0).max(0.0)
            }
            HitShape::Segment { from, to, width } => {
                let d = distance_to_segment(p, as_f32(*from), as_f32(*to));
                (d - *width as f32 / 2.0).max(0.0)
            }
            HitShape::Rect { min, max, width, filled } => {
                let (min, max) = normalized_bounds(*min, *max);
                let (x0, y0, x1, y1) = (min.x as f32, min.y as f32, max.x as f32, max.y as f32);
                let inside = (x0..=x1).contains(&p.0) && (y0..=y1).contains(&p.1);
                if inside {
                    if *filled {
                        return 0.0;
                    }
                    // Outline is painted inward from the bounds
                    let to_edge = (p.0 - x0).min(x1 - p.0).min(p.1 - y0).min(y1 - p.1);
                    return (to_edge - (*width as f32 - 1.0)).max(0.0);
                }
                let dx = (x0 - p.0).max(p.0 - x1).max(0.0);
                let dy = (y0 - p.1).max(p.1 - y1).max(0.0);
                (dx * dx + dy * dy).sqrt()
            }
        }
    }
}

fn as_f32(point: Point) -> (f32, f32) {
    (point.x as f32, point.y as f32)
}

/// Every tagged shape painted during the last interactive render, in paint order.
///
/// The input layer asks it which shape is nearest the pointer to decide what a
/// paint-bucket click should recolor.
#[derive(Debug, Clone, Default)]
pub struct ShapeIndex {
    shapes: Vec<(ShapeTag, HitShape)>,
}

impl ShapeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn record(&mut self, tag: ShapeTag, shape: HitShape) {
        self.shapes.push((tag, shape));
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Tag of the shape closest to `pos`. Ties go to the shape painted last,
    /// since it sits on top.
    pub fn nearest(&self, pos: Point) -> Option<ShapeTag> {
        let mut best: Option<(ShapeTag, f32)> = None;
        for (tag, shape) in &self.shapes {
            let distance = shape.distance(pos);
            match best {
                Some((_, d)) if distance > d => {}
                _ => best = Some((*tag, distance)),
            }
        }
        best.map(|(tag, _)| tag)
    }
}
