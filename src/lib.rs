#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod command;
pub mod error;
pub mod export;
pub mod geometry;
pub mod panels;
pub mod renderer;
pub mod surface;
pub mod tools;

pub use app::{PaintApp, ToolSettings};
pub use canvas::{CanvasConfig, CanvasModel, RenderSummary, Snapshot};
pub use color::Color;
pub use command::{Command, CommandRecord, DrawingContext, History, ShapeTag};
pub use error::{CanvasError, ColorError, CommandError, ExportError, RenderError};
pub use export::{ExportHandle, RasterSurface};
pub use geometry::{Point, ShapeIndex};
pub use renderer::PainterSurface;
pub use surface::{RecordingSurface, Surface};
pub use tools::{Tool, ToolKind};
