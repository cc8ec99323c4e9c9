//! User settings consumed by the clock.
//!
//! The core only ever reads a [`Settings`] snapshot. Changes made elsewhere are
//! delivered through a [`SettingsHandle`] and picked up between frames.

use crate::constants::{MAX_ITERATIONS, MIN_ITERATIONS, THREE_BRANCH_DEPTH_PENALTY};
use crate::error::Result;
use crate::types::PackedColor;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Which hands take part in the fractal.
///
/// Serialized by variant name; deserialization goes through
/// [`ClockType::from_key`] so older stores holding `"1"`, `"2"` or `"3"` load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClockType {
    /// Three branches: second, minute and hour
    HourMinuteSecond,
    /// Two branches: minute and hour
    HourMinute,
    /// Two branches: second and minute
    MinuteSecond,
}

/// One of the three clock hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    /// Second hand
    Second,
    /// Minute hand
    Minute,
    /// Hour hand
    Hour,
}

impl ClockType {
    /// All clock types in display order.
    pub const ALL: [ClockType; 3] = [
        ClockType::HourMinuteSecond,
        ClockType::HourMinute,
        ClockType::MinuteSecond,
    ];

    /// Active hands in recursion order. The order only affects draw overlap.
    pub const fn hands(self) -> &'static [Hand] {
        match self {
            ClockType::HourMinuteSecond => &[Hand::Second, Hand::Minute, Hand::Hour],
            ClockType::HourMinute => &[Hand::Minute, Hand::Hour],
            ClockType::MinuteSecond => &[Hand::Second, Hand::Minute],
        }
    }

    /// Number of children per fractal node.
    pub const fn branch_factor(self) -> usize {
        self.hands().len()
    }

    /// Parses a variant name or one of the legacy preference keys `"1"`, `"2"`
    /// and `"3"`. Unknown keys fall back to [`ClockType::HourMinuteSecond`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "2" | "HourMinute" => ClockType::HourMinute,
            "3" | "MinuteSecond" => ClockType::MinuteSecond,
            _ => ClockType::HourMinuteSecond,
        }
    }

    /// Human-friendly name for the settings panel.
    pub const fn label(self) -> &'static str {
        match self {
            ClockType::HourMinuteSecond => "Hour / Minute / Second",
            ClockType::HourMinute => "Hour / Minute",
            ClockType::MinuteSecond => "Minute / Second",
        }
    }
}

impl<'de> Deserialize<'de> for ClockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(ClockType::from_key(&key))
    }
}

/// Snapshot of every user-tunable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw the clock hands and face on top of the fractal
    pub draw_clock: bool,
    /// Draw the fractal's branch lines (leaf points are always drawn)
    pub draw_branches: bool,
    /// Anti-alias lines and points
    pub anti_aliasing: bool,
    /// Quantize time to whole seconds and redraw once per second
    pub every_second: bool,
    /// Ease the fractional second into a mechanical tick
    pub use_tick: bool,
    /// Target frame rate; zero or less means unthrottled
    pub frames_per_second: f32,
    /// Which hands branch the fractal
    pub clock_type: ClockType,
    /// Maximum recursion depth before the mode-specific reduction
    pub max_iterations: i32,
    /// Color of the hands, ticks and deepest fractal level
    pub clock_face_color: PackedColor,
    /// Surface clear color
    pub background_color: PackedColor,
    /// Geometry scale in `(0, 1]`
    pub scaling_factor: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_clock: true,
            draw_branches: true,
            anti_aliasing: true,
            every_second: false,
            use_tick: false,
            frames_per_second: 60.0,
            clock_type: ClockType::HourMinuteSecond,
            max_iterations: 12,
            clock_face_color: PackedColor::from_argb(192, 255, 255, 255),
            background_color: PackedColor::from_rgb(16, 16, 16),
            scaling_factor: 0.5,
        }
    }
}

impl Settings {
    /// Returns a copy with every numeric field forced into its safe range.
    pub fn sanitized(&self) -> Self {
        let scaling_factor = if self.scaling_factor.is_finite() {
            self.scaling_factor.clamp(0.01, 1.0)
        } else {
            Settings::default().scaling_factor
        };
        let frames_per_second = if self.frames_per_second.is_finite() {
            self.frames_per_second
        } else {
            0.0
        };
        Self {
            max_iterations: self.max_iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS),
            scaling_factor,
            frames_per_second,
            ..self.clone()
        }
    }

    /// Number of depth levels the fractal uses, never less than one.
    ///
    /// The three-branch mode grows as 3^depth, so it runs three levels shallower.
    pub fn iteration_count(&self) -> usize {
        let max = self.max_iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        let count = match self.clock_type {
            ClockType::HourMinuteSecond => max - THREE_BRANCH_DEPTH_PENALTY,
            ClockType::HourMinute | ClockType::MinuteSecond => max,
        };
        count.max(1) as usize
    }

    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Sending half of the settings channel, handed to whoever edits settings.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    sender: Sender<Settings>,
}

impl SettingsHandle {
    /// Publishes a new snapshot. Returns `false` if the clock is gone.
    pub fn publish(&self, settings: Settings) -> bool {
        self.sender.send(settings).is_ok()
    }
}

/// Receiving half: holds the current snapshot and folds in pending updates.
#[derive(Debug)]
pub struct SettingsInbox {
    current: Settings,
    receiver: Receiver<Settings>,
}

impl SettingsInbox {
    /// Creates an inbox seeded with `initial` and the matching handle.
    pub fn new(initial: Settings) -> (Self, SettingsHandle) {
        let (sender, receiver) = channel();
        (
            Self {
                current: initial.sanitized(),
                receiver,
            },
            SettingsHandle { sender },
        )
    }

    /// Applies every pending update, keeping only the newest.
    /// Returns `true` when the snapshot changed.
    pub fn refresh(&mut self) -> bool {
        let mut latest = None;
        while let Ok(settings) = self.receiver.try_recv() {
            latest = Some(settings);
        }
        match latest {
            Some(settings) => {
                let settings = settings.sanitized();
                let changed = settings != self.current;
                self.current = settings;
                changed
            }
            None => false,
        }
    }

    /// The snapshot in effect for the current frame.
    pub fn current(&self) -> &Settings {
        &self.current
    }
}
