use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::command::{Command, CommandRecord, History, ShapeTag};
use crate::error::{CanvasError, ExportResult};
use crate::export::{ExportHandle, ExportJob, write_png};
use crate::surface::Surface;

/// Largest accepted canvas side, in pixels
pub const MAX_SIDE: u32 = 16_384;

/// Whether a `width x height` RGBA buffer can be allocated for export
fn dimensions_fit(width: u32, height: u32) -> bool {
    (1..=MAX_SIDE).contains(&width)
        && (1..=MAX_SIDE).contains(&height)
        && u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| usize::try_from(n).ok())
            .is_some()
}

/// Canvas geometry, loadable from settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            background: "white".to_owned(),
        }
    }
}

/// What a render pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Drawables that rendered successfully
    pub drawn: usize,
    /// Drawables that failed and were skipped
    pub failed: usize,
    /// Retargets that found a drawable to recolor
    pub retargets_applied: usize,
}

/// The active commands frozen at the start of a render.
///
/// Rendering runs two passes over it. The apply pass walks it oldest first
/// and lets every Retarget overwrite the color fields of the command at its
/// target index *in this snapshot*. The draw pass then paints every
/// non-mutator in order, tagged with its index.
///
/// Because the snapshot owns copies of the history entries, the recoloring
/// lives exactly as long as the Retarget stays in the active history: undo it
/// and the next snapshot is taken without it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    commands: Vec<Command>,
}

impl Snapshot {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    /// Applies every Retarget in chronological order. Out-of-range targets
    /// and targets that are themselves mutators are ignored.
    pub fn apply_mutators(&mut self) -> usize {
        let mut applied = 0;
        for index in 0..self.commands.len() {
            let Command::Retarget(retarget) = &self.commands[index] else {
                continue;
            };
            let target = retarget.target_index();
            let color = retarget.color().clone();

            match self.commands.get_mut(target) {
                Some(command) => {
                    if command.recolor(&color) {
                        applied += 1;
                    } else {
                        log::debug!("retarget #{index} points at mutator #{target}; ignored");
                    }
                }
                None => log::debug!(
                    "retarget #{index} points past the end ({target} >= {}); ignored",
                    self.commands.len()
                ),
            }
        }
        applied
    }

    /// Paints every drawable in order. A command that fails is logged and
    /// skipped; the rest still render.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> RenderSummary {
        let mut summary = RenderSummary::default();
        for (index, command) in self.commands.iter().enumerate() {
            if command.is_mutator() {
                continue;
            }
            match command.render_interactive(surface, Some(ShapeTag(index))) {
                Ok(()) => summary.drawn += 1,
                Err(err) => {
                    log::warn!("skipping {} command #{index}: {err}", command.kind());
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    /// Clears the surface and runs both passes
    pub fn render<S: Surface + ?Sized>(mut self, surface: &mut S) -> RenderSummary {
        surface.clear();
        let retargets_applied = self.apply_mutators();
        RenderSummary {
            retargets_applied,
            ..self.draw(surface)
        }
    }
}

/// The drawing: fixed geometry plus the undoable command history
#[derive(Debug, Clone)]
pub struct CanvasModel {
    width: u32,
    height: u32,
    background: Color,
    history: History<Command>,
}

impl CanvasModel {
    pub fn new(width: u32, height: u32, background: &str) -> Result<Self, CanvasError> {
        if !dimensions_fit(width, height) {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            background: Color::parse(background)?,
            history: History::new(),
        })
    }

    pub fn from_config(config: &CanvasConfig) -> Result<Self, CanvasError> {
        Self::new(config.width, config.height, &config.background)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> &Color {
        &self.background
    }

    /// Records a command. Nothing is drawn until the caller renders.
    pub fn add_command(&mut self, command: impl Into<Command>) {
        let command = command.into();
        log::debug!("add {} command #{}", command.kind(), self.history.len());
        self.history.push(command);
    }

    /// Returns the undone command, or `None` when there was nothing to undo
    pub fn undo(&mut self) -> Option<&Command> {
        self.history.undo()
    }

    /// Returns the redone command, or `None` when there was nothing to redo
    pub fn redo(&mut self) -> Option<&Command> {
        self.history.redo()
    }

    /// Forgets every command; geometry and background stay
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Active commands as recorded, oldest first
    pub fn commands(&self) -> &[Command] {
        self.history.items()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.history.items().to_vec())
    }

    /// Active commands with every Retarget already applied
    pub fn resolved_commands(&self) -> Vec<Command> {
        let mut snapshot = self.snapshot();
        snapshot.apply_mutators();
        snapshot.into_commands()
    }

    /// Redraws the whole scene onto an interactive surface
    pub fn render_interactive<S: Surface + ?Sized>(&self, surface: &mut S) -> RenderSummary {
        let summary = self.snapshot().render(surface);
        if summary.failed > 0 {
            log::warn!("{} of {} drawables failed to render", summary.failed, summary.drawn + summary.failed);
        }
        summary
    }

    fn export_job(&self) -> ExportJob {
        ExportJob::new(self.width, self.height, self.background.clone(), self.snapshot())
    }

    /// Renders the scene into a `width x height` buffer filled with the background
    pub fn render_image(&self) -> image::RgbaImage {
        self.export_job().rasterize().0
    }

    /// Writes the scene to `path` as PNG. The model is untouched whatever the
    /// outcome.
    pub fn export_image(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let (image, summary) = self.export_job().rasterize();
        if summary.failed > 0 {
            log::warn!("{} command(s) were left out of the export", summary.failed);
        }
        write_png(&image, path.as_ref())
    }

    /// Like [`Self::export_image`], but renders and writes on a worker thread
    /// from a snapshot taken now.
    pub fn export_in_background(&self, path: impl Into<PathBuf>) -> ExportHandle {
        self.export_job().spawn(path)
    }

    /// One record per drawable, colors as they would render
    pub fn to_serializable(&self) -> Vec<CommandRecord> {
        self.resolved_commands()
            .iter()
            .filter_map(Command::to_record)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_serializable())
    }
}

impl Default for CanvasModel {
    fn default() -> Self {
        let config = CanvasConfig::default();
        Self {
            width: config.width,
            height: config.height,
            background: Color::white(),
            history: History::new(),
        }
    }
}
