//! # Fractal Clock
//!
//! An animated clock drawn as a recursive tree. Every branch splits into
//! children rotated by the current hour, minute and second angles, so the whole
//! tree turns with the time of day. The deepest generation is drawn as glowing
//! points and the first split doubles as the clock's hands.
//!
//! ## Features
//! - Three clock modes: hour/minute/second, hour/minute, minute/second
//! - Time-driven color cycling with a per-frame theme palette
//! - Optional clock face with hour and minute ticks
//! - Ticking second hand and once-per-second updates
//! - Frame pacing with suspend/resume on visibility changes
//! - PNG snapshots of the current frame (native)
//!
//! The frame pipeline is independent of any windowing toolkit: a [`Frame`] is
//! composed from [`Settings`] and the time of day, then painted onto anything
//! implementing [`SurfaceHost`]. The bundled desktop app uses egui.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod clock;
pub mod clock_face;
pub mod color;
pub mod constants;
pub mod error;
pub mod fractal;
pub mod frame;
pub mod rotation;
pub mod scheduler;
pub mod settings;
#[cfg(not(target_arch = "wasm32"))]
pub mod snapshot;
pub mod surface;
pub mod types;
mod ui;

// Re-export public types and functions
pub use clock::{FractalClock, FrameStats, LocalClock, TimeSource};
pub use error::{ClockError, Result};
pub use frame::{compose_frame, Frame, Primitive, SurfaceSize, ThemeColors};
pub use scheduler::{FrameDelay, FrameScheduler, SchedulerState};
pub use settings::{ClockType, Hand, Settings, SettingsHandle};
pub use surface::{render_to, DrawSurface, FrameSurface, SurfaceHost};
pub use types::*;
pub use ui::FractalClockApp;

/// Runs the fractal clock application.
///
/// This function initializes the egui application window, restores the saved
/// settings and starts the main event loop. A tokio runtime is entered for the
/// lifetime of the window so PNG export can run its save dialog.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use fractal_clock::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> std::result::Result<(), eframe::Error> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| log::warn!("Failed to start async runtime, export disabled: {err}"))
        .ok();
    let _guard = runtime.as_ref().map(|rt| rt.enter());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([240.0, 240.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Fractal Clock",
        options,
        Box::new(|cc| Ok(Box::new(FractalClockApp::from_storage(cc.storage)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock_face::{ClockFace, FaceKey};

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(settings.draw_clock);
        assert!(settings.draw_branches);
        assert_eq!(settings.clock_type, ClockType::HourMinuteSecond);
        assert_eq!(settings.iteration_count(), 9);
    }

    #[test]
    fn test_frame_starts_with_background() {
        let settings = Settings {
            max_iterations: 5,
            ..Settings::default()
        };
        let size = SurfaceSize::new(320.0, 240.0);
        let face = ClockFace::build(&FaceKey {
            width: size.width,
            height: size.height,
            scaling_factor: settings.scaling_factor,
            color: settings.clock_face_color,
        });
        let frame = compose_frame(&settings, size, 45_296.5, &face);
        assert_eq!(
            frame.primitives.first(),
            Some(&Primitive::Clear(settings.background_color))
        );
        assert!(frame.line_count() > 0);
        assert!(frame.point_count() > 0);
    }
}
