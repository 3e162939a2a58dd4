use crate::PaintApp;

pub fn status_bar(app: &PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.label(app.status_text());
    });
}
