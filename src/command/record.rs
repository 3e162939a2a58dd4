use serde::{Deserialize, Serialize};

use super::{Command, Freehand, Line, Rect};
use crate::color::Color;
use crate::error::CommandError;
use crate::geometry::Point;

/// Plain, serializable form of a drawable command.
///
/// Serializes as `{"type": "freehand" | "line" | "rect", ...}`; mutators are
/// history-internal and have no record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CommandRecord {
    Freehand {
        points: Vec<[i32; 2]>,
        color: Color,
        width: u32,
    },
    Line {
        xy: [i32; 4],
        color: Color,
        width: u32,
    },
    Rect {
        xy: [i32; 4],
        outline: Color,
        width: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<Color>,
    },
}

impl TryFrom<CommandRecord> for Command {
    type Error = CommandError;

    fn try_from(record: CommandRecord) -> Result<Self, Self::Error> {
        let command = match record {
            CommandRecord::Freehand { points, color, width } => {
                Freehand::new(points.into_iter().map(Point::from).collect(), color, width)?.into()
            }
            CommandRecord::Line { xy: [x0, y0, x1, y1], color, width } => {
                Line::new(Point::new(x0, y0), Point::new(x1, y1), color, width)?.into()
            }
            CommandRecord::Rect { xy: [x0, y0, x1, y1], outline, width, fill } => {
                Rect::new(Point::new(x0, y0), Point::new(x1, y1), outline, width, fill)?.into()
            }
        };
        Ok(command)
    }
}
