//! The clock canvas: layout, surface lifecycle and per-pass frame driving.

use super::state::{CanvasLifecycle, FractalClockApp};
use eframe::egui;
use std::time::Instant;

impl FractalClockApp {
    /// Lays out the canvas, draws a frame if one is due and paints the last
    /// presented frame.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `now` - Start of this UI pass
    pub(crate) fn draw_canvas(&mut self, ui: &mut egui::Ui, now: Instant) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        if response.double_clicked() {
            self.show_settings = !self.show_settings;
        }

        if rect.width() < 1.0 || rect.height() < 1.0 {
            self.release_canvas();
            return;
        }
        self.update_canvas(rect, now);

        self.clock.draw_frame(&mut self.surface, self.time.as_ref(), now);

        let anti_alias = self.clock.settings().anti_aliasing;
        ui.ctx()
            .tessellation_options_mut(|options| options.feathering = anti_alias);
        ui.painter_at(rect)
            .extend(self.surface.shapes().iter().cloned());
    }

    /// The canvas collapsed to nothing: treat it as a destroyed surface.
    fn release_canvas(&mut self) {
        if let CanvasLifecycle::Created(_) = self.canvas {
            self.clock.surface_destroyed();
            self.surface.release();
            self.canvas = CanvasLifecycle::NotCreated;
        }
    }
}
