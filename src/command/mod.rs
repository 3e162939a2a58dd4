mod commands;
mod context;
mod history;
mod record;

pub use commands::{Command, Freehand, Line, Rect, Retarget, ShapeTag};
pub use context::DrawingContext;
pub use history::History;
pub use record::CommandRecord;

/// Result type for command construction
pub type CommandResult<T = Command> = Result<T, crate::error::CommandError>;
