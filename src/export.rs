use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::channel::oneshot;
use image::{ImageError, ImageFormat, Rgba, RgbaImage};

use crate::canvas::{RenderSummary, Snapshot};
use crate::color::Color;
use crate::command::ShapeTag;
use crate::error::{ExportError, ExportResult, RenderError};
use crate::geometry::{Point, distance_to_segment, normalized_bounds};
use crate::surface::{StrokeStyle, Surface};

/// Flat renderer: paints surface primitives straight into an RGBA buffer.
///
/// Pixel `(x, y)` is covered by a stroke when its distance to the stroke's
/// center line is at most half the stroke width. Tags are ignored.
pub struct RasterSurface<'a> {
    image: &'a mut RgbaImage,
    background: Rgba<u8>,
}

impl<'a> RasterSurface<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        Self::with_background(image, &Color::white())
    }

    pub fn with_background(image: &'a mut RgbaImage, background: &Color) -> Self {
        Self {
            image,
            background: background.to_rgba(),
        }
    }

    /// Inclusive pixel range covering `[min, max]`, clipped to the image
    fn clip(&self, min: (i64, i64), max: (i64, i64)) -> Option<((u32, u32), (u32, u32))> {
        let (w, h) = (i64::from(self.image.width()), i64::from(self.image.height()));
        let x0 = min.0.max(0);
        let y0 = min.1.max(0);
        let x1 = max.0.min(w - 1);
        let y1 = max.1.min(h - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(((x0 as u32, y0 as u32), (x1 as u32, y1 as u32)))
    }

    fn stamp_segment(&mut self, from: Point, to: Point, width: u32, round_caps: bool, color: Rgba<u8>) {
        let half = width as f32 / 2.0;
        let reach = i64::from(width / 2 + 1);
        let min = (i64::from(from.x.min(to.x)) - reach, i64::from(from.y.min(to.y)) - reach);
        let max = (i64::from(from.x.max(to.x)) + reach, i64::from(from.y.max(to.y)) + reach);
        let Some(((x0, y0), (x1, y1))) = self.clip(min, max) else {
            return;
        };

        let a = (from.x as f32, from.y as f32);
        let b = (to.x as f32, to.y as f32);
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len_sq = dx * dx + dy * dy;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = (x as f32, y as f32);
                let covered = if round_caps || len_sq == 0.0 {
                    distance_to_segment(p, a, b) <= half
                } else {
                    // Flat ends: only pixels that project inside the segment
                    let t = ((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq;
                    (0.0..=1.0).contains(&t) && distance_to_segment(p, a, b) <= half
                };
                if covered {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
    }
}

impl Surface for RasterSurface<'_> {
    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    fn draw_polyline(
        &mut self,
        points: &[Point],
        style: StrokeStyle<'_>,
        _tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        let color = style.color.to_rgba();
        for pair in points.windows(2) {
            self.stamp_segment(pair[0], pair[1], style.width, true, color);
        }
        Ok(())
    }

    fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        style: StrokeStyle<'_>,
        _tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        self.stamp_segment(from, to, style.width, false, style.color.to_rgba());
        Ok(())
    }

    fn draw_rect(
        &mut self,
        corner_a: Point,
        corner_b: Point,
        outline: StrokeStyle<'_>,
        fill: Option<&Color>,
        _tag: Option<ShapeTag>,
    ) -> Result<(), RenderError> {
        let (min, max) = normalized_bounds(corner_a, corner_b);
        let Some(((x0, y0), (x1, y1))) = self.clip(
            (i64::from(min.x), i64::from(min.y)),
            (i64::from(max.x), i64::from(max.y)),
        ) else {
            return Ok(());
        };

        let outline_color = outline.color.to_rgba();
        let fill_color = fill.map(Color::to_rgba);
        let width = i64::from(outline.width);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (i64::from(x), i64::from(y));
                let to_edge = (px - i64::from(min.x))
                    .min(i64::from(max.x) - px)
                    .min(py - i64::from(min.y))
                    .min(i64::from(max.y) - py);
                if to_edge < width {
                    self.image.put_pixel(x, y, outline_color);
                } else if let Some(fill_color) = fill_color {
                    self.image.put_pixel(x, y, fill_color);
                }
            }
        }
        Ok(())
    }
}

/// Everything a PNG export needs, detached from the live model
#[derive(Debug, Clone)]
pub struct ExportJob {
    width: u32,
    height: u32,
    background: Color,
    snapshot: Snapshot,
}

impl ExportJob {
    pub(crate) fn new(width: u32, height: u32, background: Color, snapshot: Snapshot) -> Self {
        Self {
            width,
            height,
            background,
            snapshot,
        }
    }

    /// Runs both render passes onto a fresh `width x height` buffer
    pub fn rasterize(self) -> (RgbaImage, RenderSummary) {
        let mut image = RgbaImage::from_pixel(self.width, self.height, self.background.to_rgba());
        let summary = {
            let mut surface = RasterSurface::with_background(&mut image, &self.background);
            self.snapshot.render(&mut surface)
        };
        (image, summary)
    }

    /// Renders and writes the PNG on a worker thread
    pub fn spawn(self, path: impl Into<PathBuf>) -> ExportHandle {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let worker_path = path.clone();
        let worker_cancelled = Arc::clone(&cancelled);
        let spawned = std::thread::Builder::new()
            .name("png-export".to_owned())
            .spawn(move || {
                let result = self.run(&worker_path, &worker_cancelled);
                if sender.send(result).is_err() {
                    log::debug!("export of {} finished after its handle was dropped", worker_path.display());
                }
            });
        if let Err(err) = spawned {
            // The sender went down with the closure, so the handle reports WorkerLost
            log::error!("failed to start export worker: {err}");
        }

        ExportHandle {
            path,
            receiver,
            cancelled,
        }
    }

    fn run(self, path: &Path, cancelled: &AtomicBool) -> ExportResult<PathBuf> {
        if cancelled.load(Ordering::Acquire) {
            return Err(ExportError::Cancelled);
        }
        let (image, summary) = self.rasterize();
        if summary.failed > 0 {
            log::warn!("{} command(s) could not be drawn into {}", summary.failed, path.display());
        }
        if cancelled.load(Ordering::Acquire) {
            return Err(ExportError::Cancelled);
        }
        write_png(&image, path)?;
        Ok(path.to_path_buf())
    }
}

fn file_write(path: &Path, source: io::Error) -> ExportError {
    ExportError::FileWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Encodes `image` as PNG at `path`. A file left half written by a failed
/// encode is removed again.
pub fn write_png(image: &RgbaImage, path: &Path) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| file_write(path, source))?;
    if let Err(err) = encode_png(image, file, path) {
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!("could not remove partial {}: {remove_err}", path.display());
        }
        return Err(err);
    }

    log::info!("exported {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}

fn encode_png(image: &RgbaImage, file: File, path: &Path) -> ExportResult<()> {
    let mut writer = BufWriter::new(file);
    image
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|err| match err {
            ImageError::IoError(source) => file_write(path, source),
            other => ExportError::Encode(other),
        })?;
    writer.flush().map_err(|source| file_write(path, source))
}

/// An export running in the background.
///
/// The worker rendered from a snapshot taken when the export started, so the
/// model can keep changing while the file is written.
#[derive(Debug)]
pub struct ExportHandle {
    path: PathBuf,
    receiver: oneshot::Receiver<ExportResult<PathBuf>>,
    cancelled: Arc<AtomicBool>,
}

impl ExportHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Asks the worker to drop the export. Has no effect once the file is
    /// being written.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Non-blocking poll. Returns `Some` exactly once, when the worker is done.
    pub fn try_result(&mut self) -> Option<ExportResult<PathBuf>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ExportError::WorkerLost)),
        }
    }

    /// Blocks until the worker is done
    pub fn wait(self) -> ExportResult<PathBuf> {
        futures::executor::block_on(self.receiver).unwrap_or(Err(ExportError::WorkerLost))
    }
}
