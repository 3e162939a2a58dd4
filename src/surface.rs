use crate::color::Color;
use crate::command::ShapeTag;
use crate::error::RenderError;
use crate::geometry::Point;

/// How a stroke is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle<'a> {
    pub color: &'a Color,
    pub width: u32,
}

/// Drawing primitives a command renders itself with.
///
/// The interactive canvas and the PNG exporter both implement this, which is
/// what keeps the two outputs in agreement. `tag` is the command's position in
/// the rendered snapshot; surfaces that support hit testing remember it.
pub trait Surface {
    /// Drop everything drawn so far
    fn clear(&mut self);

    /// Connected strokes through `points`, round joins and caps
    fn draw_polyline(
        &mut self,
        points: &[Point],
        style: StrokeStyle<'_>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError>;

    /// A single straight stroke with flat ends
    fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        style: StrokeStyle<'_>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError>;

    /// An axis-aligned box between two corners (inclusive). The outline is
    /// painted inside the bounds.
    fn draw_rect(
        &mut self,
        corner_a: Point,
        corner_b: Point,
        outline: StrokeStyle<'_>,
        fill: Option<&Color>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError>;
}

/// One primitive call captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: u32,
        tag: Option<ShapeTag>,
    },
    Segment {
        from: Point,
        to: Point,
        color: Color,
        width: u32,
        tag: Option<ShapeTag>,
    },
    Rect {
        corner_a: Point,
        corner_b: Point,
        outline: Color,
        width: u32,
        fill: Option<Color>,
        tag: Option<ShapeTag>,
    },
}

impl DrawOp {
    pub fn tag(&self) -> Option<ShapeTag> {
        match self {
            DrawOp::Polyline { tag, .. } | DrawOp::Segment { tag, .. } | DrawOp::Rect { tag, .. } => *tag,
        }
    }
}

/// Headless surface that keeps a display list instead of pixels
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything drawn since the last clear, in paint order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// How many times the surface has been cleared
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn find_tag(&self, tag: ShapeTag) -> Option<&DrawOp> {
        self.ops.iter().find(|op| op.tag() == Some(tag))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn draw_polyline(
        &mut self,
        points: &[Point],
        style: StrokeStyle<'_>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color: style.color.clone(),
            width: style.width,
            tag,
        });
        Ok(())
    }

    fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        style: StrokeStyle<'_>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Segment {
            from,
            to,
            color: style.color.clone(),
            width: style.width,
            tag,
        });
        Ok(())
    }

    fn draw_rect(
        &mut self,
        corner_a: Point,
        corner_b: Point,
        outline: StrokeStyle<'_>,
        fill: Option<&Color>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Rect {
            corner_a,
            corner_b,
            outline: outline.color.clone(),
            width: outline.width,
            fill: fill.cloned(),
            tag,
        });
        Ok(())
    }
}
