//! Export the current clock frame as a PNG.
//!
//! The frame is composed from the current settings and time, rasterized with
//! tiny-skia at the canvas size, and written wherever the user picks in a save
//! dialog. Native builds only.

use super::state::FractalClockApp;
use crate::error::{ClockError, Result};
use crate::snapshot::render_png;

/// File name suggested by the save dialog.
pub const DEFAULT_PNG_NAME: &str = "fractal-clock.png";

impl FractalClockApp {
    /// Renders the clock as it looks right now into PNG bytes.
    pub fn snapshot_png(&mut self) -> Result<Vec<u8>> {
        let size = self.clock.size();
        let (width, height) = (size.width.round() as u32, size.height.round() as u32);
        if width == 0 || height == 0 {
            return Err(ClockError::Pixmap { width, height });
        }
        let elapsed = self
            .time
            .seconds_since_midnight(self.clock.settings().every_second);
        let frame = self.clock.compose(elapsed);
        render_png(&frame, width, height)
    }

    /// Opens a save dialog and writes a PNG snapshot of the clock.
    pub fn export_png(&mut self) {
        let png = match self.snapshot_png() {
            Ok(png) => png,
            Err(err) => {
                log::warn!("Failed to render PNG snapshot: {err}");
                return;
            }
        };

        if tokio::runtime::Handle::try_current().is_err() {
            log::warn!("No async runtime available; PNG export skipped");
            return;
        }
        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name(DEFAULT_PNG_NAME)
                .save_file()
                .await
            {
                let path = handle.path();
                match std::fs::write(path, &png) {
                    Ok(()) => log::info!("Saved snapshot to {}", path.display()),
                    Err(e) => log::warn!("Failed to save PNG: {}", ClockError::from(e)),
                }
            }
        });
    }
}
