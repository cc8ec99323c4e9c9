//! The render sink contract.
//!
//! A host hands out a drawing surface for exactly one frame. Dropping the
//! surface discards what was drawn; only [`FrameSurface::present`] makes the
//! frame visible, so a frame is either shown whole or not at all.

use crate::error::Result;
use crate::frame::{Frame, Primitive};
use crate::types::{PackedColor, Vector2};

/// Drawing operations a surface must support.
pub trait DrawSurface {
    /// Fills the whole surface with `color`.
    fn clear(&mut self, color: PackedColor);

    /// Draws a line of the given stroke width.
    fn draw_line(
        &mut self,
        from: Vector2,
        to: Vector2,
        color: PackedColor,
        width: f32,
        anti_alias: bool,
    );

    /// Draws a round dot of the given diameter.
    fn draw_point(&mut self, at: Vector2, color: PackedColor, width: f32, anti_alias: bool);
}

/// A locked surface that can publish what was drawn on it.
///
/// Dropping it without calling [`FrameSurface::present`] discards the frame.
pub trait FrameSurface: DrawSurface {
    /// Publishes everything drawn and releases the surface.
    fn present(self);
}

/// Something that lends out a drawing surface one frame at a time.
pub trait SurfaceHost {
    /// The per-frame surface.
    type Surface<'a>: FrameSurface
    where
        Self: 'a;

    /// Locks the surface for drawing. Fails while the surface is not usable.
    fn lock(&mut self) -> Result<Self::Surface<'_>>;
}

/// Paints every primitive of `frame` onto `surface`, in order.
pub fn paint_frame<S: DrawSurface + ?Sized>(frame: &Frame, surface: &mut S) {
    let anti_alias = frame.anti_alias;
    for primitive in &frame.primitives {
        match *primitive {
            Primitive::Clear(color) => surface.clear(color),
            Primitive::Point { at, color, width } => {
                surface.draw_point(at, color, width, anti_alias)
            }
            Primitive::Line {
                from,
                to,
                color,
                width,
            } => surface.draw_line(from, to, color, width, anti_alias),
        }
    }
}

/// Locks a surface from `host`, paints `frame` and presents it.
///
/// If the surface cannot be locked, nothing is drawn and the error is returned
/// for the caller to log.
pub fn render_to<H: SurfaceHost>(host: &mut H, frame: &Frame) -> Result<()> {
    let mut surface = host.lock()?;
    paint_frame(frame, &mut surface);
    surface.present();
    Ok(())
}
