//! Application state.
//!
//! The app owns one [`FractalClock`] for its canvas plus the editable copy of
//! the settings shown in the side panel. Edits are published through the
//! clock's settings handle and take effect on the next frame.

use super::rendering::EguiHost;
use crate::clock::{FractalClock, LocalClock, TimeSource};
use crate::frame::SurfaceSize;
use crate::scheduler::SchedulerState;
use crate::settings::{Settings, SettingsHandle};
use eframe::egui;

/// Storage key of the persisted settings.
pub const SETTINGS_KEY: &str = "settings";

/// Lifecycle of the canvas as seen by the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasLifecycle {
    /// No layout pass has happened yet
    NotCreated,
    /// The canvas exists with this size
    Created(SurfaceSize),
}

/// The main application structure.
pub struct FractalClockApp {
    /// Frame driver for the canvas
    pub clock: FractalClock,
    /// Publishes edits to the clock
    pub settings_handle: SettingsHandle,
    /// Settings as edited in the panel
    pub draft: Settings,
    /// Whether the settings panel is open
    pub show_settings: bool,
    /// The canvas surface
    pub surface: EguiHost,
    /// Canvas creation state
    pub canvas: CanvasLifecycle,
    /// Whether the window is currently visible (not minimized)
    pub visible: bool,
    /// Where "now" comes from
    pub time: Box<dyn TimeSource>,
}

impl Default for FractalClockApp {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl FractalClockApp {
    /// Creates the app with `settings`.
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let (clock, settings_handle) = FractalClock::new(settings.clone());
        Self {
            clock,
            settings_handle,
            draft: settings,
            show_settings: true,
            surface: EguiHost::default(),
            canvas: CanvasLifecycle::NotCreated,
            visible: true,
            time: Box::new(LocalClock),
        }
    }

    /// Restores settings from eframe storage, falling back to defaults.
    pub fn from_storage(storage: Option<&dyn eframe::Storage>) -> Self {
        let settings = storage
            .and_then(|s| s.get_string(SETTINGS_KEY))
            .and_then(|json| match Settings::from_json(&json) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    log::warn!("Ignoring stored settings: {err}");
                    None
                }
            })
            .unwrap_or_default();
        Self::new(settings)
    }

    /// Replaces the time source, e.g. with a fixed clock in tests.
    pub fn with_time_source(mut self, time: Box<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Sends the draft settings to the clock.
    pub fn publish_settings(&mut self) {
        self.draft = self.draft.sanitized();
        if !self.settings_handle.publish(self.draft.clone()) {
            log::warn!("Clock is gone; settings change dropped");
        }
    }

    /// Tells the clock about the canvas rect laid out this pass.
    pub fn update_canvas(&mut self, rect: egui::Rect, now: std::time::Instant) {
        let size = SurfaceSize::new(rect.width(), rect.height());
        self.surface.set_rect(rect);
        match self.canvas {
            CanvasLifecycle::NotCreated => {
                self.clock.surface_created(size, now);
                // A surface destroyed earlier left the scheduler marked hidden.
                if self.visible && self.clock.scheduler().state() == SchedulerState::Suspended {
                    self.clock.visibility_changed(true, now);
                }
            }
            CanvasLifecycle::Created(old) if old != size => self.clock.surface_changed(size, now),
            CanvasLifecycle::Created(_) => {}
        }
        self.canvas = CanvasLifecycle::Created(size);
    }

    /// Follows window minimise/restore.
    pub fn update_visibility(&mut self, visible: bool, now: std::time::Instant) {
        if visible != self.visible {
            log::debug!("Window visibility changed: {visible}");
            self.visible = visible;
            self.clock.visibility_changed(visible, now);
        }
    }
}
