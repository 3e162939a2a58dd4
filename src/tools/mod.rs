mod draw_stroke_tool;
mod paint_tool;
mod shape_tool;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::{Command, DrawingContext};
use crate::geometry::{Point, ShapeIndex};

pub use draw_stroke_tool::DrawStrokeTool;
pub use paint_tool::PaintTool;
pub use shape_tool::{ShapeKind, ShapeTool};

/// Which tool the toolbar has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Freehand,
    Line,
    Rect,
    Paint,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [ToolKind::Freehand, ToolKind::Line, ToolKind::Rect, ToolKind::Paint];

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Freehand => "Freehand",
            ToolKind::Line => "Line",
            ToolKind::Rect => "Rect",
            ToolKind::Paint => "Paint",
        }
    }

    /// A fresh tool with no gesture in progress
    pub fn instantiate(self) -> Box<dyn Tool> {
        match self {
            ToolKind::Freehand => Box::new(DrawStrokeTool::new()),
            ToolKind::Line => Box::new(ShapeTool::new(ShapeKind::Line)),
            ToolKind::Rect => Box::new(ShapeTool::new(ShapeKind::Rect)),
            ToolKind::Paint => Box::new(PaintTool::new()),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToolKind::Freehand => "freehand",
            ToolKind::Line => "line",
            ToolKind::Rect => "rect",
            ToolKind::Paint => "paint",
        })
    }
}

/// Turns pointer gestures on the canvas into commands
pub trait Tool: Send {
    fn kind(&self) -> ToolKind;

    /// Pointer pressed. `ctx` is the pen for the whole gesture; `hits` holds
    /// the shapes painted in the last frame.
    fn on_pointer_down(&mut self, pos: Point, ctx: &DrawingContext, hits: &ShapeIndex) -> Option<Command>;

    /// Pointer dragged while pressed
    fn on_pointer_move(&mut self, pos: Point);

    /// Pointer released; finishes the gesture
    fn on_pointer_up(&mut self, pos: Point) -> Option<Command>;

    /// What the gesture would commit if released now, for on-canvas feedback
    fn preview(&self) -> Option<Command>;

    /// Abandons any gesture in progress
    fn cancel(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiated_tools_report_their_kind() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.instantiate().kind(), kind);
        }
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ToolKind::Rect).unwrap(), "\"rect\"");
        assert_eq!(ToolKind::Line.to_string(), "line");
    }
}
