use std::fmt;

use serde::{Deserialize, Serialize};

use super::CommandRecord;
use crate::color::Color;
use crate::error::{CommandError, RenderError};
use crate::export::RasterSurface;
use crate::geometry::{Point, check_drawable};
use crate::surface::{StrokeStyle, Surface};

/// Position of a drawable in the rendered snapshot, attached to whatever it
/// paints so the input layer can tell what sits under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeTag(pub usize);

impl ShapeTag {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_width(width: u32) -> Result<u32, CommandError> {
    if width == 0 {
        Err(CommandError::ZeroWidth)
    } else {
        Ok(width)
    }
}

/// Pen stroke through the points the pointer visited
#[derive(Debug, Clone, PartialEq)]
pub struct Freehand {
    points: Vec<Point>,
    color: Color,
    width: u32,
}

impl Freehand {
    pub fn new(points: Vec<Point>, color: Color, width: u32) -> Result<Self, CommandError> {
        if points.is_empty() {
            return Err(CommandError::NoPoints);
        }
        Ok(Self {
            points,
            color,
            width: check_width(width)?,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Straight line between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    from: Point,
    to: Point,
    color: Color,
    width: u32,
}

impl Line {
    pub fn new(from: Point, to: Point, color: Color, width: u32) -> Result<Self, CommandError> {
        Ok(Self {
            from,
            to,
            color,
            width: check_width(width)?,
        })
    }

    pub fn start(&self) -> Point {
        self.from
    }

    pub fn end(&self) -> Point {
        self.to
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Axis-aligned rectangle spanned by two opposite corners
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    corner_a: Point,
    corner_b: Point,
    outline: Color,
    width: u32,
    fill: Option<Color>,
}

impl Rect {
    pub fn new(
        corner_a: Point,
        corner_b: Point,
        outline: Color,
        width: u32,
        fill: Option<Color>,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            corner_a,
            corner_b,
            outline,
            width: check_width(width)?,
            fill,
        })
    }

    pub fn corners(&self) -> (Point, Point) {
        (self.corner_a, self.corner_b)
    }

    pub fn outline(&self) -> &Color {
        &self.outline
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn fill(&self) -> Option<&Color> {
        self.fill.as_ref()
    }
}

/// Paint-bucket mutator: recolors the command at `target_index` of whatever
/// snapshot it is applied to. Draws nothing itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retarget {
    target_index: usize,
    color: Color,
}

impl Retarget {
    pub fn new(target_index: usize, color: Color) -> Self {
        Self { target_index, color }
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn color(&self) -> &Color {
        &self.color
    }
}

/// One recorded action in the canvas history
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Freehand(Freehand),
    Line(Line),
    Rect(Rect),
    Retarget(Retarget),
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Freehand(_) => "freehand",
            Command::Line(_) => "line",
            Command::Rect(_) => "rect",
            Command::Retarget(_) => "retarget",
        }
    }

    /// Mutators alter other commands during the apply pass and never draw
    pub fn is_mutator(&self) -> bool {
        matches!(self, Command::Retarget(_))
    }

    /// Overwrites every color field this command owns. A rectangle gets both
    /// its outline and its fill, even if it had no fill before.
    ///
    /// Returns false for mutators, which own no drawable color.
    pub fn recolor(&mut self, color: &Color) -> bool {
        match self {
            Command::Freehand(freehand) => freehand.color = color.clone(),
            Command::Line(line) => line.color = color.clone(),
            Command::Rect(rect) => {
                rect.outline = color.clone();
                rect.fill = Some(color.clone());
            }
            Command::Retarget(_) => return false,
        }
        true
    }

    /// Draws the command onto an interactive surface, tagged with its
    /// position in the snapshot being rendered.
    pub fn render_interactive<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        match self {
            Command::Freehand(freehand) => {
                // A single point leaves no visible mark
                if freehand.points.len() < 2 {
                    return Ok(());
                }
                check_drawable("freehand", &freehand.points)?;
                surface.draw_polyline(
                    &freehand.points,
                    StrokeStyle { color: &freehand.color, width: freehand.width },
                    tag,
                )
            }
            Command::Line(line) => {
                check_drawable("line", &[line.from, line.to])?;
                surface.draw_segment(
                    line.from,
                    line.to,
                    StrokeStyle { color: &line.color, width: line.width },
                    tag,
                )
            }
            Command::Rect(rect) => {
                check_drawable("rect", &[rect.corner_a, rect.corner_b])?;
                surface.draw_rect(
                    rect.corner_a,
                    rect.corner_b,
                    StrokeStyle { color: &rect.outline, width: rect.width },
                    rect.fill.as_ref(),
                    tag,
                )
            }
            Command::Retarget(_) => Ok(()),
        }
    }

    /// Draws the command straight into a raster buffer
    pub fn render_flat(&self, image: &mut image::RgbaImage) -> Result<(), RenderError> {
        self.render_interactive(&mut RasterSurface::new(image), None)
    }

    /// Plain record of a drawable; mutators have none
    pub fn to_record(&self) -> Option<CommandRecord> {
        match self {
            Command::Freehand(freehand) => Some(CommandRecord::Freehand {
                points: freehand.points.iter().map(|&p| p.into()).collect(),
                color: freehand.color.clone(),
                width: freehand.width,
            }),
            Command::Line(line) => Some(CommandRecord::Line {
                xy: [line.from.x, line.from.y, line.to.x, line.to.y],
                color: line.color.clone(),
                width: line.width,
            }),
            Command::Rect(rect) => Some(CommandRecord::Rect {
                xy: [rect.corner_a.x, rect.corner_a.y, rect.corner_b.x, rect.corner_b.y],
                outline: rect.outline.clone(),
                width: rect.width,
                fill: rect.fill.clone(),
            }),
            Command::Retarget(_) => None,
        }
    }
}

impl From<Freehand> for Command {
    fn from(freehand: Freehand) -> Self {
        Command::Freehand(freehand)
    }
}

impl From<Line> for Command {
    fn from(line: Line) -> Self {
        Command::Line(line)
    }
}

impl From<Rect> for Command {
    fn from(rect: Rect) -> Self {
        Command::Rect(rect)
    }
}

impl From<Retarget> for Command {
    fn from(retarget: Retarget) -> Self {
        Command::Retarget(retarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    fn color(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = Line::new(Point::new(0, 0), Point::new(5, 5), color("red"), 0).unwrap_err();
        assert_eq!(err, CommandError::ZeroWidth);
        assert!(Rect::new(Point::new(0, 0), Point::new(5, 5), color("red"), 0, None).is_err());
        assert!(Freehand::new(vec![Point::new(1, 1)], color("red"), 0).is_err());
    }

    #[test]
    fn freehand_needs_a_point() {
        assert_eq!(
            Freehand::new(Vec::new(), color("red"), 2).unwrap_err(),
            CommandError::NoPoints
        );
    }

    #[test]
    fn single_point_freehand_draws_nothing() {
        let cmd = Command::from(Freehand::new(vec![Point::new(3, 3)], color("red"), 2).unwrap());
        let mut surface = RecordingSurface::new();
        cmd.render_interactive(&mut surface, Some(ShapeTag(0))).unwrap();
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn recolor_touches_every_color_field() {
        let green = color("#00ff00");
        let mut rect = Command::from(
            Rect::new(Point::new(0, 0), Point::new(10, 10), color("#0000ff"), 2, None).unwrap(),
        );
        assert!(rect.recolor(&green));
        let Command::Rect(inner) = &rect else { unreachable!() };
        assert_eq!(inner.outline(), &green);
        assert_eq!(inner.fill(), Some(&green));

        let mut line = Command::from(Line::new(Point::new(0, 0), Point::new(1, 1), color("red"), 1).unwrap());
        assert!(line.recolor(&green));
        let Command::Line(inner) = &line else { unreachable!() };
        assert_eq!(inner.color(), &green);

        let mut retarget = Command::from(Retarget::new(0, color("red")));
        assert!(!retarget.recolor(&green));
        assert_eq!(retarget, Command::from(Retarget::new(0, color("red"))));
    }

    #[test]
    fn retarget_renders_nothing() {
        let mut surface = RecordingSurface::new();
        Command::from(Retarget::new(0, color("red")))
            .render_interactive(&mut surface, Some(ShapeTag(0)))
            .unwrap();
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn rect_renders_with_tag() {
        let cmd = Command::from(
            Rect::new(Point::new(20, 20), Point::new(100, 80), color("#0000ff"), 2, None).unwrap(),
        );
        let mut surface = RecordingSurface::new();
        cmd.render_interactive(&mut surface, Some(ShapeTag(4))).unwrap();
        match surface.find_tag(ShapeTag(4)) {
            Some(DrawOp::Rect { outline, width, fill, .. }) => {
                assert_eq!(outline.as_str(), "#0000ff");
                assert_eq!(*width, 2);
                assert_eq!(*fill, None);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn unrepresentable_coordinates_fail_to_render() {
        let cmd = Command::from(
            Line::new(Point::new(0, 0), Point::new(i32::MAX, 0), color("red"), 1).unwrap(),
        );
        let mut surface = RecordingSurface::new();
        assert!(matches!(
            cmd.render_interactive(&mut surface, None),
            Err(RenderError::MalformedGeometry(_))
        ));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn flat_render_paints_pixels() {
        let mut image = image::RgbaImage::from_pixel(20, 20, image::Rgba([255, 255, 255, 255]));
        Command::from(Line::new(Point::new(0, 10), Point::new(19, 10), color("#ff0000"), 1).unwrap())
            .render_flat(&mut image)
            .unwrap();
        assert_eq!(image.get_pixel(5, 10), &image::Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(5, 5), &image::Rgba([255, 255, 255, 255]));
    }
}
