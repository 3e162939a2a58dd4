use std::path::PathBuf;

use thiserror::Error;

use crate::command::ShapeTag;

/// Errors produced while parsing a color spelling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color {0:?}: expected #rgb, #rrggbb or a known color name")]
    Invalid(String),
}

/// Errors raised when a command is constructed with invalid parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("stroke width must be greater than zero")]
    ZeroWidth,

    #[error("a freehand stroke needs at least one point")]
    NoPoints,

    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Errors raised when a canvas model is constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error(
        "canvas dimensions must be between 1 and {} per side, got {width}x{height}",
        crate::canvas::MAX_SIDE
    )]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid background: {0}")]
    Background(#[from] ColorError),
}

/// A single command failed to draw. These are logged by the render pass and
/// never abort the whole render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("surface rejected {shape} (tag {tag:?}): {reason}")]
    Rejected {
        shape: &'static str,
        tag: Option<ShapeTag>,
        reason: String,
    },
}

/// Errors surfaced by PNG export
#[derive(Debug, Error)]
pub enum ExportError {
    /// The file could not be created or written
    #[error("failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("export was cancelled before the file was written")]
    Cancelled,

    #[error("export worker stopped without reporting a result")]
    WorkerLost,
}

pub type ExportResult<T> = Result<T, ExportError>;
