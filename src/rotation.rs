//! Time-of-day to hand rotations.
//!
//! Converts seconds since local midnight into the three unit vectors that
//! rotate each level of the fractal, and holds the per-hand shrink ratios.

use crate::constants::{RATIO_HOUR, RATIO_MINUTE, RATIO_SECOND, TICK_DAMPING, TICK_FREQUENCY};
use crate::settings::Hand;
use crate::types::Vector2;
use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike};
use std::f64::consts::TAU;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_HALF_DAY: f64 = 43_200.0;

/// Per-hand shrink factors, constant for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchRatio {
    /// Hour branch factor
    pub hour: f32,
    /// Minute branch factor
    pub minute: f32,
    /// Second branch factor
    pub second: f32,
}

impl BranchRatio {
    /// The ratios the clock always uses.
    pub const STANDARD: BranchRatio = BranchRatio {
        hour: RATIO_HOUR,
        minute: RATIO_MINUTE,
        second: RATIO_SECOND,
    };

    /// Largest of the three; sizes the trunk so the whole tree stays on screen.
    pub fn max(&self) -> f32 {
        self.hour.max(self.minute).max(self.second)
    }

    /// Ratio for one hand.
    pub fn for_hand(&self, hand: Hand) -> f32 {
        match hand {
            Hand::Second => self.second,
            Hand::Minute => self.minute,
            Hand::Hour => self.hour,
        }
    }
}

impl Default for BranchRatio {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Hand angles in radians, clockwise from the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockAngles {
    /// Hour hand angle
    pub hours: f64,
    /// Minute hand angle
    pub minutes: f64,
    /// Second hand angle
    pub seconds: f64,
}

impl ClockAngles {
    /// Angles for `elapsed` seconds since midnight, optionally tick-eased.
    pub fn from_elapsed(elapsed: f64, use_tick: bool) -> Self {
        let t = if use_tick { apply_tick(elapsed) } else { elapsed };
        Self {
            seconds: TAU * t.rem_euclid(SECONDS_PER_MINUTE) / SECONDS_PER_MINUTE,
            minutes: TAU * t.rem_euclid(SECONDS_PER_HOUR) / SECONDS_PER_HOUR,
            hours: TAU * t.rem_euclid(SECONDS_PER_HALF_DAY) / SECONDS_PER_HALF_DAY,
        }
    }
}

/// Unit rotation vectors for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Hour rotation
    pub hour: Vector2,
    /// Minute rotation
    pub minute: Vector2,
    /// Second rotation
    pub second: Vector2,
}

impl RotationState {
    /// Rotations for `elapsed` seconds since midnight.
    pub fn from_elapsed(elapsed: f64, use_tick: bool) -> Self {
        Self::from_angles(ClockAngles::from_elapsed(elapsed, use_tick))
    }

    /// Maps each angle to `(cos, sin)`.
    pub fn from_angles(angles: ClockAngles) -> Self {
        let unit = |angle: f64| Vector2::new(angle.cos() as f32, angle.sin() as f32);
        Self {
            hour: unit(angles.hours),
            minute: unit(angles.minutes),
            second: unit(angles.seconds),
        }
    }

    /// Rotation for one hand.
    pub fn for_hand(&self, hand: Hand) -> Vector2 {
        match hand {
            Hand::Second => self.second,
            Hand::Minute => self.minute,
            Hand::Hour => self.hour,
        }
    }
}

/// Damped-oscillation easing of a fractional second: overshoots, then settles.
pub fn tick_ease(x: f64) -> f64 {
    1.0 - (TICK_FREQUENCY * x).cos() * (-TICK_DAMPING * x).exp()
}

/// Replaces the fractional-second part of `elapsed` with its eased value.
pub fn apply_tick(elapsed: f64) -> f64 {
    let x = elapsed.rem_euclid(1.0);
    elapsed - x + tick_ease(x)
}

/// Seconds since local midnight for `now`, with millisecond precision.
///
/// With `every_second` the milliseconds are dropped so the hands jump once a second.
pub fn seconds_since_midnight<Tz: TimeZone>(now: &DateTime<Tz>, every_second: bool) -> f64 {
    let time: NaiveTime = now.time();
    let whole = time.num_seconds_from_midnight() as f64;
    if every_second {
        return whole;
    }
    // Leap seconds report >= 1000 ms; fold them into the last second.
    let millis = (time.nanosecond() / 1_000_000).min(999);
    whole + millis as f64 / 1000.0
}

/// Seconds since local midnight right now.
pub fn wall_clock_now(every_second: bool) -> f64 {
    seconds_since_midnight(&Local::now(), every_second)
}
