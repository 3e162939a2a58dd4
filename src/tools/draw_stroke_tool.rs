use super::{Tool, ToolKind};
use crate::command::{Command, DrawingContext};
use crate::geometry::{Point, ShapeIndex};

/// Freehand pen: collects the pointer path and commits it on release
#[derive(Debug, Default)]
pub struct DrawStrokeTool {
    // Transient state: the pen and the path of the stroke being drawn
    current_stroke: Option<(DrawingContext, Vec<Point>)>,
}

impl DrawStrokeTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for DrawStrokeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Freehand
    }

    fn on_pointer_down(&mut self, pos: Point, ctx: &DrawingContext, _hits: &ShapeIndex) -> Option<Command> {
        self.current_stroke = Some((ctx.clone(), vec![pos]));
        None
    }

    fn on_pointer_move(&mut self, pos: Point) {
        if let Some((_, points)) = &mut self.current_stroke {
            if points.last() != Some(&pos) {
                points.push(pos);
            }
        }
    }

    fn on_pointer_up(&mut self, _pos: Point) -> Option<Command> {
        let (ctx, points) = self.current_stroke.take()?;
        match ctx.freehand(points) {
            Ok(command) => Some(command),
            Err(err) => {
                log::warn!("discarding freehand stroke: {err}");
                None
            }
        }
    }

    fn preview(&self) -> Option<Command> {
        let (ctx, points) = self.current_stroke.as_ref()?;
        ctx.freehand(points.clone()).ok()
    }

    fn cancel(&mut self) {
        self.current_stroke = None;
    }
}
