use super::{Tool, ToolKind};
use crate::command::{Command, CommandResult, DrawingContext};
use crate::geometry::{Point, ShapeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rect,
}

#[derive(Debug, Clone)]
struct Drag {
    ctx: DrawingContext,
    start: Point,
    current: Point,
}

/// Press-drag-release tool for straight lines and rectangles
#[derive(Debug)]
pub struct ShapeTool {
    shape: ShapeKind,
    drag: Option<Drag>,
}

impl ShapeTool {
    pub fn new(shape: ShapeKind) -> Self {
        Self { shape, drag: None }
    }

    fn build(&self, drag: &Drag, end: Point) -> CommandResult {
        match self.shape {
            ShapeKind::Line => drag.ctx.line(drag.start, end),
            ShapeKind::Rect => drag.ctx.rect(drag.start, end),
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        match self.shape {
            ShapeKind::Line => ToolKind::Line,
            ShapeKind::Rect => ToolKind::Rect,
        }
    }

    fn on_pointer_down(&mut self, pos: Point, ctx: &DrawingContext, _hits: &ShapeIndex) -> Option<Command> {
        self.drag = Some(Drag {
            ctx: ctx.clone(),
            start: pos,
            current: pos,
        });
        None
    }

    fn on_pointer_move(&mut self, pos: Point) {
        if let Some(drag) = &mut self.drag {
            drag.current = pos;
        }
    }

    fn on_pointer_up(&mut self, pos: Point) -> Option<Command> {
        let drag = self.drag.take()?;
        match self.build(&drag, pos) {
            Ok(command) => Some(command),
            Err(err) => {
                log::warn!("discarding {:?}: {err}", self.shape);
                None
            }
        }
    }

    fn preview(&self) -> Option<Command> {
        let drag = self.drag.as_ref()?;
        self.build(drag, drag.current).ok()
    }

    fn cancel(&mut self) {
        self.drag = None;
    }
}
