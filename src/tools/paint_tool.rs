use super::{Tool, ToolKind};
use crate::command::{Command, DrawingContext};
use crate::geometry::{Point, ShapeIndex};

/// Paint bucket: recolors whichever painted shape is nearest the click
#[derive(Debug, Default)]
pub struct PaintTool;

impl PaintTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for PaintTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Paint
    }

    fn on_pointer_down(&mut self, pos: Point, ctx: &DrawingContext, hits: &ShapeIndex) -> Option<Command> {
        let Some(tag) = hits.nearest(pos) else {
            log::debug!("paint at ({}, {}) found nothing to recolor", pos.x, pos.y);
            return None;
        };
        Some(ctx.retarget(tag))
    }

    fn on_pointer_move(&mut self, _pos: Point) {}

    fn on_pointer_up(&mut self, _pos: Point) -> Option<Command> {
        None
    }

    fn preview(&self) -> Option<Command> {
        None
    }

    fn cancel(&mut self) {}
}
