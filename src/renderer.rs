use egui::{Color32, Painter, Pos2, Rect as ScreenRect, Shape, Stroke, Vec2};

use crate::color::Color;
use crate::command::ShapeTag;
use crate::error::RenderError;
use crate::geometry::{HitShape, Point, ShapeIndex, normalized_bounds};
use crate::surface::{StrokeStyle, Surface};

/// Interactive surface drawing through an egui [`Painter`].
///
/// Canvas pixel `(x, y)` maps to the center of the matching screen pixel
/// relative to `origin`, so strokes cover the same pixels the raster export
/// does. Every tagged shape is also recorded in a [`ShapeIndex`] for
/// hit testing.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Pos2,
    size: Vec2,
    background: Color32,
    hits: &'a mut ShapeIndex,
}

impl<'a> PainterSurface<'a> {
    pub fn new(
        painter: &'a Painter,
        canvas_rect: ScreenRect,
        background: &Color,
        hits: &'a mut ShapeIndex,
    ) -> Self {
        Self {
            painter,
            origin: canvas_rect.min,
            size: canvas_rect.size(),
            background: background.to_color32(),
            hits,
        }
    }

    fn to_screen(&self, point: Point) -> Pos2 {
        self.origin + point.to_pos2().to_vec2() + Vec2::splat(0.5)
    }

    /// Screen rectangle covering the whole pixels between two corners
    fn pixel_box(&self, min: Point, max: Point) -> ScreenRect {
        ScreenRect::from_min_max(
            self.origin + min.to_pos2().to_vec2(),
            self.origin + max.to_pos2().to_vec2() + Vec2::splat(1.0),
        )
    }

    /// A segment whose ends coincide paints a dot, matching the raster export
    fn segment_shape(&self, from: Point, to: Point, style: StrokeStyle<'_>) -> Shape {
        let color = style.color.to_color32();
        if from == to {
            Shape::circle_filled(self.to_screen(from), style.width as f32 / 2.0, color)
        } else {
            Shape::line_segment(
                [self.to_screen(from), self.to_screen(to)],
                Stroke::new(style.width as f32, color),
            )
        }
    }

    fn record(&mut self, tag: Option<ShapeTag>, shape: HitShape) {
        if let Some(tag) = tag {
            self.hits.record(tag, shape);
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self) {
        self.hits.clear();
        self.painter.rect_filled(
            ScreenRect::from_min_size(self.origin, self.size),
            0.0,
            self.background,
        );
    }

    fn draw_polyline(
        &mut self,
        points: &[Point],
        style: StrokeStyle<'_>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        let stroke = Stroke::new(style.width as f32, style.color.to_color32());
        let screen: Vec<Pos2> = points.iter().map(|&p| self.to_screen(p)).collect();
        self.painter.add(Shape::line(screen.clone(), stroke));
        // Round the joins and ends like the raster export does
        let radius = style.width as f32 / 2.0;
        for pos in screen {
            self.painter.circle_filled(pos, radius, stroke.color);
        }

        self.record(
            tag,
            HitShape::Polyline {
                points: points.to_vec(),
                width: style.width,
            },
        );
        Ok(())
    }

    fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        style: StrokeStyle<'_>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        self.painter.add(self.segment_shape(from, to, style));
        self.record(
            tag,
            HitShape::Segment {
                from,
                to,
                width: style.width,
            },
        );
        Ok(())
    }

    fn draw_rect(
        &mut self,
        corner_a: Point,
        corner_b: Point,
        outline: StrokeStyle<'_>,
        fill: Option<&Color>,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        let (min, max) = normalized_bounds(corner_a, corner_b);
        let bounds = self.pixel_box(min, max);
        let width = outline.width as f32;
        let outline_color = outline.color.to_color32();

        if let Some(fill) = fill {
            self.painter.rect_filled(bounds, 0.0, fill.to_color32());
        }
        if width * 2.0 >= bounds.width().min(bounds.height()) {
            // Outline swallows the whole box
            self.painter.rect_filled(bounds, 0.0, outline_color);
        } else {
            // egui centers strokes on the edge; shrink so it lands inside
            self.painter
                .rect_stroke(bounds.shrink(width / 2.0), 0.0, Stroke::new(width, outline_color));
        }

        self.record(
            tag,
            HitShape::Rect {
                min,
                max,
                width: outline.width,
                filled: fill.is_some(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasModel;
    use crate::command::{Line, Rect};

    #[test]
    fn tagged_shapes_are_indexed() {
        let ctx = egui::Context::default();
        let canvas_rect = ScreenRect::from_min_size(egui::pos2(50.0, 40.0), egui::vec2(200.0, 150.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), canvas_rect);

        let mut model = CanvasModel::new(200, 150, "white").unwrap();
        let red = Color::parse("#ff0000").unwrap();
        model.add_command(Line::new(Point::new(10, 10), Point::new(190, 10), red.clone(), 3).unwrap());
        model.add_command(Rect::new(Point::new(20, 20), Point::new(100, 80), red, 2, None).unwrap());

        let mut hits = ShapeIndex::new();
        let summary = model.render_interactive(&mut PainterSurface::new(
            &painter,
            canvas_rect,
            model.background(),
            &mut hits,
        ));

        assert_eq!(summary.drawn, 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.nearest(Point::new(50, 11)), Some(ShapeTag(0)));
        assert_eq!(hits.nearest(Point::new(21, 50)), Some(ShapeTag(1)));
    }

    #[test]
    fn degenerate_segment_paints_a_dot() {
        let ctx = egui::Context::default();
        let canvas_rect = ScreenRect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(50.0, 50.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), canvas_rect);
        let mut hits = ShapeIndex::new();
        let surface = PainterSurface::new(&painter, canvas_rect, &Color::white(), &mut hits);
        let red = Color::parse("red").unwrap();

        let dot = surface.segment_shape(Point::new(5, 5), Point::new(5, 5), StrokeStyle { color: &red, width: 4 });
        let Shape::Circle(circle) = dot else {
            panic!("expected a dot, got {dot:?}");
        };
        assert_eq!(circle.center, egui::pos2(15.5, 15.5));
        assert_eq!(circle.radius, 2.0);
        assert_eq!(circle.fill, Color32::RED);

        let line = surface.segment_shape(Point::new(5, 5), Point::new(9, 5), StrokeStyle { color: &red, width: 4 });
        assert!(matches!(line, Shape::LineSegment { .. }));
    }

    #[test]
    fn clear_forgets_previous_frame() {
        let ctx = egui::Context::default();
        let canvas_rect = ScreenRect::from_min_size(Pos2::ZERO, egui::vec2(10.0, 10.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), canvas_rect);
        let mut hits = ShapeIndex::new();
        hits.record(
            ShapeTag(7),
            HitShape::Segment { from: Point::new(0, 0), to: Point::new(1, 1), width: 1 },
        );

        PainterSurface::new(&painter, canvas_rect, &Color::white(), &mut hits).clear();
        assert!(hits.is_empty());
    }
}
