//! Frame pacing and visibility-driven suspend/resume.
//!
//! The scheduler never runs anything itself. The host asks it whether a frame
//! is due, draws, and reports back; the scheduler then decides when the next
//! frame should run. At most one frame is ever pending.

use crate::constants::MILLIS_PER_SECOND;
use crate::settings::Settings;
use std::time::{Duration, Instant};

/// Whether frames are being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Surface hidden or gone; nothing is pending
    Suspended,
    /// Surface visible; a frame is pending or being drawn
    Running,
}

/// When the next frame should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDelay {
    /// Unthrottled: run again right away
    Immediate,
    /// Run after this many milliseconds. Negative values are kept as computed
    /// and simply mean the frame is already late.
    After(i64),
}

impl FrameDelay {
    /// Absolute deadline for this delay, counted from `now`.
    pub fn deadline(self, now: Instant) -> Instant {
        match self {
            FrameDelay::Immediate => now,
            FrameDelay::After(ms) if ms >= 0 => now + Duration::from_millis(ms as u64),
            FrameDelay::After(ms) => now
                .checked_sub(Duration::from_millis(ms.unsigned_abs()))
                .unwrap_or(now),
        }
    }
}

/// Delay before the next frame, given how long the last one took.
///
/// * `fps <= 0`: immediately.
/// * `every_second`: whatever is left of the current second.
/// * otherwise: whatever is left of the frame interval.
pub fn next_frame_delay(
    frames_per_second: f32,
    every_second: bool,
    frame_time: Duration,
) -> FrameDelay {
    if frames_per_second <= 0.0 {
        return FrameDelay::Immediate;
    }
    let spent = frame_time.as_millis() as f64;
    let interval = if every_second {
        MILLIS_PER_SECOND
    } else {
        MILLIS_PER_SECOND / frames_per_second as f64
    };
    FrameDelay::After((interval - spent) as i64)
}

/// Two-state frame scheduler for one surface.
#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    visible: bool,
    pending: Option<Instant>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// A scheduler for a surface that does not exist yet.
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Suspended,
            visible: true,
            pending: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Deadline of the pending frame, if any.
    pub fn pending(&self) -> Option<Instant> {
        self.pending
    }

    /// The surface exists; start drawing if it is visible.
    pub fn surface_created(&mut self, now: Instant) {
        self.pending = None;
        if self.visible {
            self.resume(now);
        }
    }

    /// The surface changed size or format; redraw right away.
    pub fn surface_changed(&mut self, now: Instant) {
        self.pending = None;
        if self.visible {
            self.resume(now);
        }
    }

    /// The surface is gone. Any pending frame is cancelled.
    pub fn surface_destroyed(&mut self) {
        self.visible = false;
        self.suspend();
    }

    /// The surface became visible or hidden.
    pub fn visibility_changed(&mut self, visible: bool, now: Instant) {
        self.visible = visible;
        self.pending = None;
        if visible {
            self.resume(now);
        } else {
            self.suspend();
        }
    }

    /// Whether a pending frame's deadline has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.state == SchedulerState::Running && self.pending.is_some_and(|at| at <= now)
    }

    /// Claims the pending frame if it is due. Returns `false` when nothing should be drawn.
    pub fn begin_frame(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Schedules the next frame after one that started at `frame_start`.
    ///
    /// Returns the delay that was applied, or `None` while suspended.
    pub fn frame_completed(
        &mut self,
        frame_start: Instant,
        now: Instant,
        settings: &Settings,
    ) -> Option<FrameDelay> {
        if self.state != SchedulerState::Running {
            return None;
        }
        let delay = next_frame_delay(
            settings.frames_per_second,
            settings.every_second,
            now.saturating_duration_since(frame_start),
        );
        self.pending = Some(delay.deadline(now));
        Some(delay)
    }

    fn resume(&mut self, now: Instant) {
        if self.state == SchedulerState::Suspended {
            log::debug!("Frame scheduler resumed");
        }
        self.state = SchedulerState::Running;
        self.pending = Some(now);
    }

    fn suspend(&mut self) {
        if self.state == SchedulerState::Running {
            log::debug!("Frame scheduler suspended");
        }
        self.state = SchedulerState::Suspended;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn unthrottled_runs_immediately() {
        assert_eq!(next_frame_delay(0.0, false, ms(5)), FrameDelay::Immediate);
        assert_eq!(next_frame_delay(-3.0, true, ms(5)), FrameDelay::Immediate);
    }

    #[test]
    fn fixed_rate_subtracts_frame_time() {
        assert_eq!(next_frame_delay(50.0, false, ms(5)), FrameDelay::After(15));
        assert_eq!(next_frame_delay(60.0, false, ms(0)), FrameDelay::After(16));
    }

    #[test]
    fn every_second_aligns_to_the_second() {
        assert_eq!(next_frame_delay(60.0, true, ms(120)), FrameDelay::After(880));
    }

    #[test]
    fn slow_frames_give_negative_delays() {
        assert_eq!(next_frame_delay(100.0, false, ms(25)), FrameDelay::After(-15));
        let now = Instant::now();
        assert!(FrameDelay::After(-15).deadline(now) <= now);
    }

    #[test]
    fn starts_suspended_and_runs_once_created() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();
        assert_eq!(scheduler.state(), SchedulerState::Suspended);
        assert!(!scheduler.begin_frame(now));

        scheduler.surface_created(now);
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert!(scheduler.begin_frame(now));
        assert!(!scheduler.begin_frame(now), "a frame is only claimed once");
    }

    #[test]
    fn completed_frame_schedules_next() {
        let mut scheduler = FrameScheduler::new();
        let start = Instant::now();
        scheduler.surface_created(start);
        assert!(scheduler.begin_frame(start));

        let settings = Settings {
            frames_per_second: 10.0,
            every_second: false,
            ..Settings::default()
        };
        let done = start + ms(20);
        assert_eq!(
            scheduler.frame_completed(start, done, &settings),
            Some(FrameDelay::After(80))
        );
        assert!(!scheduler.is_due(done + ms(79)));
        assert!(scheduler.is_due(done + ms(80)));
    }

    #[test]
    fn hiding_cancels_pending_frame() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();
        scheduler.surface_created(now);
        scheduler.visibility_changed(false, now);
        assert_eq!(scheduler.state(), SchedulerState::Suspended);
        assert!(scheduler.pending().is_none());
        assert_eq!(
            scheduler.frame_completed(now, now, &Settings::default()),
            None
        );

        scheduler.visibility_changed(true, now);
        assert!(scheduler.begin_frame(now));
    }

    #[test]
    fn destroyed_surface_stays_down_until_visible_again() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();
        scheduler.surface_created(now);
        scheduler.surface_destroyed();
        assert!(!scheduler.is_due(now));

        // Recreated while still flagged invisible: no frames.
        scheduler.surface_created(now);
        assert_eq!(scheduler.state(), SchedulerState::Suspended);

        scheduler.visibility_changed(true, now);
        assert!(scheduler.is_due(now));
    }

    #[test]
    fn resize_redraws_immediately() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();
        scheduler.surface_created(now);
        assert!(scheduler.begin_frame(now));
        scheduler.frame_completed(now, now, &Settings::default());
        scheduler.surface_changed(now);
        assert!(scheduler.is_due(now));
    }
}
