use crate::PaintApp;
use crate::color::Color;
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let active = app.settings.tool;
            for tool in ToolKind::ALL {
                if ui.selectable_label(active == tool, tool.label()).clicked() {
                    app.select_tool(tool);
                }
            }

            ui.separator();

            ui.label("Color:");
            let mut color = app.settings.color.to_color32();
            if egui::color_picker::color_edit_button_srgba(
                ui,
                &mut color,
                egui::color_picker::Alpha::Opaque,
            )
            .changed()
            {
                app.settings.color = Color::from(color);
            }

            ui.add(egui::Slider::new(&mut app.settings.width, 1..=50).text("Width"));

            ui.separator();

            if ui.add_enabled(app.model.can_undo(), egui::Button::new("Undo")).clicked() {
                app.undo();
            }
            if ui.add_enabled(app.model.can_redo(), egui::Button::new("Redo")).clicked() {
                app.redo();
            }
            if ui.button("Clear").clicked() {
                app.clear();
            }

            ui.separator();

            ui.add(egui::TextEdit::singleline(&mut app.settings.export_path).desired_width(160.0));
            if ui.add_enabled(app.export.is_none(), egui::Button::new("Save PNG")).clicked() {
                app.start_export();
            }
        });
    });
}
