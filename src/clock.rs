//! The per-surface frame driver.
//!
//! [`FractalClock`] owns everything that lives across frames: the settings
//! inbox, the cached clock face, the scheduler and the last captured hand
//! positions. Each frame it snapshots the settings, composes, paints onto a
//! freshly locked surface and schedules the next frame. Any failure skips the
//! frame and is logged.

use crate::clock_face::{ClockFaceCache, FaceKey};
use crate::frame::{compose_frame, Frame, SurfaceSize, ThemeColors};
use crate::rotation::wall_clock_now;
use crate::scheduler::{FrameDelay, FrameScheduler};
use crate::settings::{Settings, SettingsHandle, SettingsInbox};
use crate::surface::{render_to, SurfaceHost};
use crate::types::HandEndpoints;
use std::time::Instant;

/// Source of "seconds since local midnight".
pub trait TimeSource {
    /// Current time of day in seconds; whole seconds when `every_second` is set.
    fn seconds_since_midnight(&self, every_second: bool) -> f64;
}

/// The system's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn seconds_since_midnight(&self, every_second: bool) -> f64 {
        wall_clock_now(every_second)
    }
}

/// Frame counters, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames presented
    pub drawn: u64,
    /// Frames skipped because the surface was unavailable
    pub skipped: u64,
}

/// Drives the fractal clock on one surface.
#[derive(Debug)]
pub struct FractalClock {
    settings: SettingsInbox,
    face: ClockFaceCache,
    scheduler: FrameScheduler,
    size: SurfaceSize,
    hands: HandEndpoints,
    theme: Option<ThemeColors>,
    stats: FrameStats,
}

impl FractalClock {
    /// Creates a clock with `initial` settings and the handle used to change them.
    pub fn new(initial: Settings) -> (Self, SettingsHandle) {
        let (settings, handle) = SettingsInbox::new(initial);
        let clock = Self {
            settings,
            face: ClockFaceCache::default(),
            scheduler: FrameScheduler::new(),
            size: SurfaceSize::new(0.0, 0.0),
            hands: HandEndpoints::default(),
            theme: None,
            stats: FrameStats::default(),
        };
        (clock, handle)
    }

    /// Settings snapshot of the last frame.
    pub fn settings(&self) -> &Settings {
        self.settings.current()
    }

    /// Hand positions captured by the last frame drawn with the overlay on.
    pub fn hand_endpoints(&self) -> HandEndpoints {
        self.hands
    }

    /// Theme colors of the last presented frame.
    pub fn theme_colors(&self) -> Option<ThemeColors> {
        self.theme
    }

    /// Frame counters.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Current surface size.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Read access to the scheduler.
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// The host created the surface.
    pub fn surface_created(&mut self, size: SurfaceSize, now: Instant) {
        log::info!("Surface created ({}x{})", size.width, size.height);
        self.size = size;
        self.scheduler.surface_created(now);
    }

    /// The host resized the surface. The face is rebuilt on the next frame.
    pub fn surface_changed(&mut self, size: SurfaceSize, now: Instant) {
        if size != self.size {
            log::debug!("Surface resized to {}x{}", size.width, size.height);
            self.size = size;
            self.face.invalidate();
        }
        self.scheduler.surface_changed(now);
    }

    /// The host destroyed the surface. Pending frames are dropped.
    pub fn surface_destroyed(&mut self) {
        log::info!("Surface destroyed");
        self.scheduler.surface_destroyed();
    }

    /// The surface was shown or hidden.
    pub fn visibility_changed(&mut self, visible: bool, now: Instant) {
        self.scheduler.visibility_changed(visible, now);
    }

    /// Composes a frame for `elapsed` without drawing it or touching the scheduler.
    pub fn compose(&mut self, elapsed: f64) -> Frame {
        let settings = self.settings.current();
        let face = self.face.get(FaceKey {
            width: self.size.width,
            height: self.size.height,
            scaling_factor: settings.scaling_factor,
            color: settings.clock_face_color,
        });
        compose_frame(settings, self.size, elapsed, face)
    }

    /// Runs one frame if one is due at `now`.
    ///
    /// Returns the delay until the next frame, or `None` when no frame was due
    /// or the scheduler is suspended.
    pub fn draw_frame<H: SurfaceHost, T: TimeSource + ?Sized>(
        &mut self,
        host: &mut H,
        time: &T,
        now: Instant,
    ) -> Option<FrameDelay> {
        if !self.scheduler.begin_frame(now) {
            return None;
        }
        if self.settings.refresh() {
            log::debug!("Applied new settings snapshot");
        }

        let elapsed = time.seconds_since_midnight(self.settings.current().every_second);
        let frame = self.compose(elapsed);
        match render_to(host, &frame) {
            Ok(()) => {
                if let Some(capture) = &frame.hands {
                    capture.apply_to(&mut self.hands);
                }
                self.theme = Some(frame.theme);
                self.stats.drawn += 1;
            }
            Err(err) => {
                self.stats.skipped += 1;
                log::debug!("Skipping frame: {err}");
            }
        }

        self.scheduler
            .frame_completed(now, Instant::now(), self.settings.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SchedulerState;
    use crate::settings::ClockType;
    use crate::surface::recording::RecordingHost;
    use crate::types::Vector2;

    struct FixedClock(f64);

    impl TimeSource for FixedClock {
        fn seconds_since_midnight(&self, every_second: bool) -> f64 {
            if every_second {
                self.0.floor()
            } else {
                self.0
            }
        }
    }

    fn small_settings() -> Settings {
        Settings {
            max_iterations: 6,
            clock_type: ClockType::HourMinute,
            frames_per_second: 0.0,
            ..Settings::default()
        }
    }

    #[test]
    fn nothing_is_drawn_before_the_surface_exists() {
        let (mut clock, _handle) = FractalClock::new(small_settings());
        let mut host = RecordingHost::default();
        assert_eq!(clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now()), None);
        assert_eq!(host.lock_attempts, 0);
    }

    #[test]
    fn draws_and_captures_hands() {
        let (mut clock, _handle) = FractalClock::new(small_settings());
        let mut host = RecordingHost::default();
        let now = Instant::now();
        clock.surface_created(SurfaceSize::new(400.0, 400.0), now);

        let delay = clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now());
        assert_eq!(delay, Some(FrameDelay::Immediate));
        assert_eq!(host.presented.len(), 1);
        assert_eq!(clock.stats().drawn, 1);

        let hands = clock.hand_endpoints();
        assert_eq!(hands.base, Vector2::new(200.0, 200.0));
        assert!(hands.hour.y < hands.base.y);
        assert!(clock.theme_colors().is_some());
    }

    #[test]
    fn unavailable_surface_skips_but_keeps_scheduling() {
        let (mut clock, _handle) = FractalClock::new(small_settings());
        let mut host = RecordingHost {
            available: false,
            ..RecordingHost::default()
        };
        let now = Instant::now();
        clock.surface_created(SurfaceSize::new(100.0, 100.0), now);

        assert!(clock.draw_frame(&mut host, &FixedClock(10.0), Instant::now()).is_some());
        assert_eq!(clock.stats().skipped, 1);
        assert!(host.presented.is_empty());
        assert_eq!(clock.hand_endpoints(), HandEndpoints::default());

        host.available = true;
        assert!(clock.draw_frame(&mut host, &FixedClock(10.0), Instant::now()).is_some());
        assert_eq!(host.presented.len(), 1);
    }

    #[test]
    fn settings_apply_between_frames() {
        let (mut clock, handle) = FractalClock::new(small_settings());
        let mut host = RecordingHost::default();
        let now = Instant::now();
        clock.surface_created(SurfaceSize::new(200.0, 100.0), now);
        clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now());
        let first = host.presented[0].len();

        handle.publish(Settings {
            max_iterations: 7,
            ..small_settings()
        });
        assert_eq!(clock.settings().max_iterations, 6, "not applied mid-frame");
        clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now());
        assert_eq!(clock.settings().max_iterations, 7);
        assert!(host.presented[1].len() > first);
    }

    #[test]
    fn hidden_surface_draws_nothing() {
        let (mut clock, _handle) = FractalClock::new(small_settings());
        let mut host = RecordingHost::default();
        let now = Instant::now();
        clock.surface_created(SurfaceSize::new(200.0, 200.0), now);
        clock.visibility_changed(false, now);
        assert_eq!(clock.scheduler().state(), SchedulerState::Suspended);
        assert_eq!(clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now()), None);

        clock.surface_destroyed();
        clock.visibility_changed(true, now);
        assert!(clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now()).is_some());
    }

    #[test]
    fn resize_moves_the_tree() {
        let (mut clock, _handle) = FractalClock::new(small_settings());
        let mut host = RecordingHost::default();
        let now = Instant::now();
        clock.surface_created(SurfaceSize::new(200.0, 200.0), now);
        clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now());
        clock.surface_changed(SurfaceSize::new(600.0, 300.0), now);
        clock.draw_frame(&mut host, &FixedClock(0.0), Instant::now());
        assert_eq!(clock.hand_endpoints().base, Vector2::new(300.0, 150.0));
        assert_eq!(clock.size(), SurfaceSize::new(600.0, 300.0));
    }
}
