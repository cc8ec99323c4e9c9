//! Off-screen rendering into a tiny-skia pixmap.
//!
//! Used to export the current frame as a PNG. The host keeps a front and a
//! back buffer: frames are drawn into the back buffer and swapped in on
//! present, so the front buffer only ever holds complete frames.

use crate::error::{ClockError, Result};
use crate::frame::Frame;
use crate::surface::{render_to, DrawSurface, FrameSurface, SurfaceHost};
use crate::types::{PackedColor, Vector2};
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// A double-buffered pixmap surface host.
pub struct PixmapHost {
    width: u32,
    height: u32,
    front: Option<Pixmap>,
    back: Option<Pixmap>,
}

impl PixmapHost {
    /// A host for a `width` x `height` surface. Buffers are allocated on first lock.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            front: None,
            back: None,
        }
    }

    /// The last presented frame, if any.
    pub fn front(&self) -> Option<&Pixmap> {
        self.front.as_ref()
    }

    /// Encodes the last presented frame as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let pixmap = self.front.as_ref().ok_or(ClockError::Pixmap {
            width: self.width,
            height: self.height,
        })?;
        pixmap
            .encode_png()
            .map_err(|e| ClockError::Encode(e.to_string()))
    }
}

impl SurfaceHost for PixmapHost {
    type Surface<'a> = PixmapSurface<'a>;

    fn lock(&mut self) -> Result<PixmapSurface<'_>> {
        if self.back.is_none() {
            let pixmap = Pixmap::new(self.width, self.height).ok_or_else(|| {
                ClockError::SurfaceUnavailable(format!(
                    "cannot allocate {}x{} pixmap",
                    self.width, self.height
                ))
            })?;
            self.back = Some(pixmap);
        }
        Ok(PixmapSurface { host: self })
    }
}

/// The back buffer of a [`PixmapHost`], locked for one frame.
pub struct PixmapSurface<'a> {
    host: &'a mut PixmapHost,
}

impl PixmapSurface<'_> {
    fn pixmap(&mut self) -> Option<&mut Pixmap> {
        self.host.back.as_mut()
    }
}

fn paint_for(color: PackedColor, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.red(), color.green(), color.blue(), color.alpha());
    paint.anti_alias = anti_alias;
    paint
}

impl DrawSurface for PixmapSurface<'_> {
    fn clear(&mut self, color: PackedColor) {
        if let Some(pixmap) = self.pixmap() {
            pixmap.fill(tiny_skia::Color::from_rgba8(
                color.red(),
                color.green(),
                color.blue(),
                color.alpha(),
            ));
        }
    }

    fn draw_line(
        &mut self,
        from: Vector2,
        to: Vector2,
        color: PackedColor,
        width: f32,
        anti_alias: bool,
    ) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        let paint = paint_for(color, anti_alias);
        if let Some(pixmap) = self.pixmap() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn draw_point(&mut self, at: Vector2, color: PackedColor, width: f32, anti_alias: bool) {
        let Some(path) = PathBuilder::from_circle(at.x, at.y, (width * 0.5).max(0.5)) else {
            return;
        };
        let paint = paint_for(color, anti_alias);
        if let Some(pixmap) = self.pixmap() {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

impl FrameSurface for PixmapSurface<'_> {
    fn present(self) {
        std::mem::swap(&mut self.host.front, &mut self.host.back);
    }
}

/// Renders `frame` into a fresh `width` x `height` pixmap and encodes it as PNG.
pub fn render_png(frame: &Frame, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut host = PixmapHost::new(width, height);
    render_to(&mut host, frame)?;
    host.encode_png()
}
