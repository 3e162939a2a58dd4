use super::{Command, CommandResult, Freehand, Line, Rect, Retarget, ShapeTag};
use crate::color::Color;
use crate::error::CommandError;
use crate::geometry::Point;

/// The pen a single pointer interaction draws with.
///
/// Captured when the interaction starts and handed to command construction,
/// so changing the toolbar mid-drag cannot leak into the gesture in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingContext {
    color: Color,
    width: u32,
}

impl DrawingContext {
    pub fn new(color: Color, width: u32) -> Result<Self, CommandError> {
        if width == 0 {
            return Err(CommandError::ZeroWidth);
        }
        Ok(Self { color, width })
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn freehand(&self, points: Vec<Point>) -> CommandResult {
        Ok(Freehand::new(points, self.color.clone(), self.width)?.into())
    }

    pub fn line(&self, from: Point, to: Point) -> CommandResult {
        Ok(Line::new(from, to, self.color.clone(), self.width)?.into())
    }

    /// Outline-only rectangle, the way the rect tool draws
    pub fn rect(&self, corner_a: Point, corner_b: Point) -> CommandResult {
        Ok(Rect::new(corner_a, corner_b, self.color.clone(), self.width, None)?.into())
    }

    pub fn retarget(&self, target: ShapeTag) -> Command {
        Retarget::new(target.index(), self.color.clone()).into()
    }
}

impl Default for DrawingContext {
    fn default() -> Self {
        Self {
            color: Color::black(),
            width: 3,
        }
    }
}
