use crate::PaintApp;
use crate::geometry::Point;
use crate::renderer::PainterSurface;

fn to_canvas(pos: egui::Pos2, canvas_rect: egui::Rect) -> Point {
    let offset = pos - canvas_rect.min;
    Point::new(offset.x.floor() as i32, offset.y.floor() as i32)
}

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            let size = egui::vec2(app.model.width() as f32, app.model.height() as f32);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            // Input first: the paint bucket resolves against last frame's shapes
            if response.drag_started() {
                let origin = ctx
                    .input(|i| i.pointer.press_origin())
                    .or(response.interact_pointer_pos());
                if let Some(origin) = origin {
                    app.pointer_down(to_canvas(origin, canvas_rect));
                }
            }
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    app.pointer_move(to_canvas(pos, canvas_rect));
                }
            }
            if response.drag_stopped() {
                let pos = response
                    .interact_pointer_pos()
                    .or_else(|| ctx.pointer_latest_pos());
                app.pointer_up(pos.map(|p| to_canvas(p, canvas_rect)));
            }
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let point = to_canvas(pos, canvas_rect);
                    app.pointer_down(point);
                    app.pointer_up(Some(point));
                }
            }

            let background = app.model.background().clone();
            let mut surface = PainterSurface::new(&painter, canvas_rect, &background, &mut app.hits);
            app.model.render_interactive(&mut surface);
            if let Some(preview) = app.active_tool.preview() {
                if let Err(err) = preview.render_interactive(&mut surface, None) {
                    log::debug!("preview not drawn: {err}");
                }
            }
        });
    });
}
