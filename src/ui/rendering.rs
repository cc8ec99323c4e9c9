//! egui-backed drawing surface.
//!
//! Draw calls are collected into shapes on a per-frame surface and only handed
//! over to the host on present. egui repaints every pass, so the host keeps the
//! last presented shapes and replays them until the next frame is ready.

use crate::error::{ClockError, Result};
use crate::surface::{DrawSurface, FrameSurface, SurfaceHost};
use crate::types::{PackedColor, Vector2};
use eframe::egui;

/// Converts a packed color to egui's representation.
pub fn to_color32(color: PackedColor) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.red(), color.green(), color.blue(), color.alpha())
}

/// Converts an egui color back to a packed color.
pub fn from_color32(color: egui::Color32) -> PackedColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    PackedColor::from_argb(a, r, g, b)
}

/// The canvas area of the window, seen as a drawing surface.
#[derive(Debug, Default)]
pub struct EguiHost {
    rect: Option<egui::Rect>,
    shapes: Vec<egui::Shape>,
}

impl EguiHost {
    /// Moves the surface to `rect` (screen coordinates).
    pub fn set_rect(&mut self, rect: egui::Rect) {
        self.rect = Some(rect);
    }

    /// Forgets the surface; further locks fail until [`EguiHost::set_rect`].
    pub fn release(&mut self) {
        self.rect = None;
        self.shapes.clear();
    }

    /// Shapes of the last presented frame.
    pub fn shapes(&self) -> &[egui::Shape] {
        &self.shapes
    }
}

impl SurfaceHost for EguiHost {
    type Surface<'a> = EguiSurface<'a>;

    fn lock(&mut self) -> Result<EguiSurface<'_>> {
        match self.rect {
            Some(rect) if rect.width() >= 1.0 && rect.height() >= 1.0 => Ok(EguiSurface {
                rect,
                shapes: Vec::with_capacity(self.shapes.len()),
                host: self,
            }),
            Some(_) => Err(ClockError::SurfaceUnavailable("canvas has no area".into())),
            None => Err(ClockError::SurfaceUnavailable("canvas not laid out".into())),
        }
    }
}

/// One frame's worth of egui shapes.
pub struct EguiSurface<'a> {
    host: &'a mut EguiHost,
    rect: egui::Rect,
    shapes: Vec<egui::Shape>,
}

impl EguiSurface<'_> {
    fn pos(&self, v: Vector2) -> egui::Pos2 {
        self.rect.min + egui::vec2(v.x, v.y)
    }
}

// egui anti-aliases through the global feathering option, so the per-call
// flag is ignored here.
impl DrawSurface for EguiSurface<'_> {
    fn clear(&mut self, color: PackedColor) {
        self.shapes.clear();
        self.shapes
            .push(egui::Shape::rect_filled(self.rect, 0.0, to_color32(color)));
    }

    fn draw_line(
        &mut self,
        from: Vector2,
        to: Vector2,
        color: PackedColor,
        width: f32,
        _anti_alias: bool,
    ) {
        let shape = egui::Shape::line_segment(
            [self.pos(from), self.pos(to)],
            egui::Stroke::new(width, to_color32(color)),
        );
        self.shapes.push(shape);
    }

    fn draw_point(&mut self, at: Vector2, color: PackedColor, width: f32, _anti_alias: bool) {
        let shape = egui::Shape::circle_filled(self.pos(at), width * 0.5, to_color32(color));
        self.shapes.push(shape);
    }
}

impl FrameSurface for EguiSurface<'_> {
    fn present(self) {
        self.host.shapes = self.shapes;
    }
}
