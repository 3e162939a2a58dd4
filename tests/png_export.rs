use canvas_paint::command::{Line, Rect, Retarget};
use canvas_paint::{CanvasModel, Color, ExportError, Point, RasterSurface, Surface};
use image::Rgba;

fn color(s: &str) -> Color {
    Color::parse(s).unwrap()
}

fn scenario() -> CanvasModel {
    let mut model = CanvasModel::new(200, 150, "white").unwrap();
    model.add_command(Line::new(Point::new(10, 10), Point::new(190, 10), color("#ff0000"), 3).unwrap());
    model.add_command(Rect::new(Point::new(20, 20), Point::new(100, 80), color("#0000ff"), 2, None).unwrap());
    model
}

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

#[test]
fn export_writes_decodable_png_of_canvas_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.png");

    scenario().export_image(&path).unwrap();

    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (200, 150));
    assert_eq!(decoded.get_pixel(100, 10), &RED);
    assert_eq!(decoded.get_pixel(20, 50), &BLUE);
    assert_eq!(decoded.get_pixel(60, 50), &WHITE);
    assert_eq!(decoded.get_pixel(150, 120), &WHITE);
}

#[test]
fn export_of_empty_canvas_is_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.png");
    CanvasModel::new(12, 7, "#336699").unwrap().export_image(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (12, 7));
    assert!(decoded.pixels().all(|p| *p == Rgba([0x33, 0x66, 0x99, 255])));
}

#[test]
fn export_applies_retargets() {
    let mut model = scenario();
    model.add_command(Retarget::new(1, color("#00ff00")));

    let image = model.render_image();
    assert_eq!(image.get_pixel(20, 50), &GREEN);
    // Retargeting a rect fills it as well
    assert_eq!(image.get_pixel(60, 50), &GREEN);

    model.undo();
    let image = model.render_image();
    assert_eq!(image.get_pixel(20, 50), &BLUE);
    assert_eq!(image.get_pixel(60, 50), &WHITE);
}

#[test]
fn unwritable_path_is_a_file_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.png");
    let model = scenario();

    let err = model.export_image(&path).unwrap_err();
    assert!(matches!(err, ExportError::FileWrite { .. }), "got {err:?}");
    assert!(err.to_string().contains("out.png"));
    // The model is unaffected
    assert_eq!(model.len(), 2);
}

#[test]
fn render_flat_matches_model_export() {
    let model = scenario();
    let mut manual = image::RgbaImage::from_pixel(200, 150, WHITE);
    for command in model.commands() {
        command.render_flat(&mut manual).unwrap();
    }
    assert_eq!(manual, model.render_image());
}

#[test]
fn raster_surface_clear_paints_background() {
    let mut image = image::RgbaImage::from_pixel(3, 3, RED);
    RasterSurface::with_background(&mut image, &color("white")).clear();
    assert!(image.pixels().all(|p| *p == WHITE));
}

#[test]
fn background_export_uses_snapshot_from_call_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("background.png");
    let mut model = scenario();

    let handle = model.export_in_background(&path);
    // Keep editing while the worker runs
    model.add_command(Retarget::new(0, color("#00ff00")));
    model.clear();

    assert_eq!(handle.path(), path.as_path());
    let written = handle.wait().unwrap();
    assert_eq!(written, path);

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(100, 10), &RED);
    assert_eq!(decoded.get_pixel(20, 50), &BLUE);
}

#[test]
fn background_export_reports_write_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.png");
    let result = scenario().export_in_background(path).wait();
    assert!(matches!(result, Err(ExportError::FileWrite { .. })));
}

#[test]
fn try_result_eventually_yields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polled.png");
    let mut handle = scenario().export_in_background(&path);

    let result = loop {
        if let Some(result) = handle.try_result() {
            break result;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    };
    assert_eq!(result.unwrap(), path);
}

#[test]
fn cancelled_background_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cancelled.png");
    let mut model = CanvasModel::new(2000, 2000, "white").unwrap();
    for i in 0..10 {
        model.add_command(
            Rect::new(Point::new(i, i), Point::new(1999 - i, 1999 - i), color("#0000ff"), 5, Some(color("#ff0000")))
                .unwrap(),
        );
    }

    let handle = model.export_in_background(&path);
    handle.cancel();
    let result = handle.wait();

    assert!(matches!(result, Err(ExportError::Cancelled)), "got {result:?}");
    assert!(!path.exists());
    assert_eq!(model.len(), 10);
}
