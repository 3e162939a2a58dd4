use std::time::Duration;

use egui::{Key, KeyboardShortcut, Modifiers};
use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasConfig, CanvasModel};
use crate::color::Color;
use crate::command::{Command, DrawingContext};
use crate::export::ExportHandle;
use crate::geometry::{Point, ShapeIndex};
use crate::panels;
use crate::tools::{Tool, ToolKind};

const UNDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// Toolbar state persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: Color,
    pub width: u32,
    pub export_path: String,
    pub canvas: CanvasConfig,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Freehand,
            color: Color::black(),
            width: 3,
            export_path: "drawing.png".to_owned(),
            canvas: CanvasConfig::default(),
        }
    }
}

pub struct PaintApp {
    pub(crate) model: CanvasModel,
    pub(crate) settings: ToolSettings,
    pub(crate) active_tool: Box<dyn Tool>,
    /// Shapes painted in the last frame, for the paint bucket
    pub(crate) hits: ShapeIndex,
    pub(crate) export: Option<ExportHandle>,
    pub(crate) status: Option<String>,
    pub(crate) last_pointer: Option<Point>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<ToolSettings>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        let model = CanvasModel::from_config(&settings.canvas).unwrap_or_else(|err| {
            log::warn!("ignoring stored canvas settings: {err}");
            CanvasModel::default()
        });
        log::info!(
            "canvas {}x{} on {}",
            model.width(),
            model.height(),
            model.background()
        );

        Self {
            model,
            active_tool: settings.tool.instantiate(),
            settings,
            hits: ShapeIndex::new(),
            export: None,
            status: None,
            last_pointer: None,
        }
    }

    pub fn model(&self) -> &CanvasModel {
        &self.model
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        if tool != self.active_tool.kind() {
            log::info!("tool selected: {tool}");
            self.active_tool.cancel();
            self.active_tool = tool.instantiate();
        }
        self.settings.tool = tool;
    }

    /// The pen for a gesture starting now
    pub fn drawing_context(&self) -> DrawingContext {
        DrawingContext::new(self.settings.color.clone(), self.settings.width.max(1))
            .unwrap_or_default()
    }

    fn commit(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.model.add_command(command);
        }
    }

    pub fn pointer_down(&mut self, pos: Point) {
        let ctx = self.drawing_context();
        let command = self.active_tool.on_pointer_down(pos, &ctx, &self.hits);
        self.last_pointer = Some(pos);
        self.commit(command);
    }

    pub fn pointer_move(&mut self, pos: Point) {
        self.active_tool.on_pointer_move(pos);
        self.last_pointer = Some(pos);
    }

    pub fn pointer_up(&mut self, pos: Option<Point>) {
        let Some(pos) = pos.or(self.last_pointer) else {
            self.active_tool.cancel();
            return;
        };
        let command = self.active_tool.on_pointer_up(pos);
        self.commit(command);
    }

    pub fn undo(&mut self) {
        self.active_tool.cancel();
        if self.model.undo().is_none() {
            log::debug!("nothing to undo");
        }
    }

    pub fn redo(&mut self) {
        self.active_tool.cancel();
        if self.model.redo().is_none() {
            log::debug!("nothing to redo");
        }
    }

    pub fn clear(&mut self) {
        self.active_tool.cancel();
        self.model.clear();
    }

    /// Starts writing the PNG in the background. The canvas stays editable.
    pub fn start_export(&mut self) {
        if self.export.is_some() {
            return;
        }
        let path = self.settings.export_path.trim();
        if path.is_empty() {
            self.status = Some("Save error: no file name".to_owned());
            return;
        }
        log::info!("exporting to {path}");
        self.status = Some(format!("Saving to {path}…"));
        self.export = Some(self.model.export_in_background(path));
    }

    /// Picks up a finished export. Returns true while one is still running.
    pub fn poll_export(&mut self) -> bool {
        let Some(handle) = &mut self.export else {
            return false;
        };
        let Some(result) = handle.try_result() else {
            return true;
        };
        self.status = Some(match result {
            Ok(path) => format!("Saved to {}", path.display()),
            Err(err) => {
                log::error!("export failed: {err}");
                format!("Save error: {err}")
            }
        });
        self.export = None;
        false
    }

    pub fn status_text(&self) -> String {
        let mut text = format!(
            "Tool: {} | Color: {} | Width: {}",
            self.settings.tool, self.settings.color, self.settings.width
        );
        if let Some(status) = &self.status {
            text.push_str(" | ");
            text.push_str(status);
        }
        text
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input_mut(|i| i.consume_shortcut(&UNDO_SHORTCUT)) {
            self.undo();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&REDO_SHORTCUT)) {
            self.redo();
        }
    }
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_settings(ToolSettings::default())
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        if self.poll_export() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        panels::tools_panel(self, ctx);
        panels::status_bar(self, ctx);
        panels::central_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ShapeTag;
    use crate::renderer::PainterSurface;

    fn render(app: &mut PaintApp) {
        let ctx = egui::Context::default();
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(900.0, 600.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);
        let background = app.model.background().clone();
        app.model
            .render_interactive(&mut PainterSurface::new(&painter, rect, &background, &mut app.hits));
    }

    #[test]
    fn rect_gesture_adds_one_command() {
        let mut app = PaintApp::default();
        app.select_tool(ToolKind::Rect);
        app.pointer_down(Point::new(20, 20));
        app.pointer_move(Point::new(60, 40));
        assert!(app.active_tool.preview().is_some());
        app.pointer_up(Some(Point::new(100, 80)));

        let [Command::Rect(rect)] = app.model.commands() else {
            panic!("expected a single rect, got {:?}", app.model.commands());
        };
        assert_eq!(rect.corners(), (Point::new(20, 20), Point::new(100, 80)));
        assert_eq!(rect.outline(), &Color::black());
    }

    #[test]
    fn color_change_mid_gesture_does_not_leak() {
        let mut app = PaintApp::default();
        app.select_tool(ToolKind::Line);
        app.pointer_down(Point::new(0, 0));
        app.settings.color = Color::parse("red").unwrap();
        app.pointer_up(Some(Point::new(10, 10)));

        let [Command::Line(line)] = app.model.commands() else { panic!("expected a line") };
        assert_eq!(line.color(), &Color::black());
    }

    #[test]
    fn paint_tool_retargets_nearest_shape() {
        let mut app = PaintApp::default();
        app.select_tool(ToolKind::Line);
        app.pointer_down(Point::new(10, 10));
        app.pointer_up(Some(Point::new(190, 10)));
        render(&mut app);

        app.select_tool(ToolKind::Paint);
        app.settings.color = Color::parse("#00ff00").unwrap();
        app.pointer_down(Point::new(100, 12));
        app.pointer_up(Some(Point::new(100, 12)));

        let Command::Retarget(retarget) = &app.model.commands()[1] else {
            panic!("expected a retarget");
        };
        assert_eq!(retarget.target_index(), ShapeTag(0).index());
        assert_eq!(app.model.commands().len(), 2);
    }

    #[test]
    fn paint_on_empty_canvas_does_nothing() {
        let mut app = PaintApp::default();
        app.select_tool(ToolKind::Paint);
        app.pointer_down(Point::new(5, 5));
        assert!(app.model.is_empty());
    }

    #[test]
    fn release_without_position_uses_last_pointer() {
        let mut app = PaintApp::default();
        app.pointer_down(Point::new(1, 1));
        app.pointer_move(Point::new(4, 4));
        app.pointer_up(None);

        let [Command::Freehand(stroke)] = app.model.commands() else { panic!("expected a stroke") };
        assert_eq!(stroke.points(), &[Point::new(1, 1), Point::new(4, 4)]);
    }

    #[test]
    fn status_text_reports_tool_and_color() {
        let mut app = PaintApp::default();
        app.select_tool(ToolKind::Line);
        let text = app.status_text();
        assert!(text.contains("Tool: line"));
        assert!(text.contains("Color: #000000"));
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = ToolSettings {
            tool: ToolKind::Paint,
            color: Color::parse("#abcdef").unwrap(),
            width: 9,
            ..ToolSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<ToolSettings>(&json).unwrap(), settings);

        let partial: ToolSettings = serde_json::from_str(r#"{"width": 4}"#).unwrap();
        assert_eq!(partial.width, 4);
        assert_eq!(partial.tool, ToolKind::Freehand);
    }

    #[test]
    fn export_runs_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = PaintApp::default();
        app.settings.export_path = dir.path().join("out.png").display().to_string();
        app.pointer_down(Point::new(1, 1));
        app.pointer_up(Some(Point::new(1, 1)));
        app.start_export();

        let handle = app.export.take().expect("export started");
        let path = handle.wait().unwrap();
        assert!(path.exists());
    }
}
