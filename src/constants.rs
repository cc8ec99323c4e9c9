//! Shared application-wide constants.
//! Centralizes tweakable values used across geometry, rendering and scheduling.

// Fractal geometry
/// Shrink ratio applied to the hour branch at every recursion level.
pub const RATIO_HOUR: f32 = 0.5;
/// Shrink ratio applied to the minute branch (`sqrt(0.5)`).
pub const RATIO_MINUTE: f32 = std::f32::consts::FRAC_1_SQRT_2;
/// Shrink ratio applied to the second branch (`sqrt(0.5)`).
pub const RATIO_SECOND: f32 = std::f32::consts::FRAC_1_SQRT_2;

// Iteration bounds
/// Lowest accepted `max_iterations` value.
pub const MIN_ITERATIONS: i32 = 1;
/// Highest accepted `max_iterations` value. Node count grows as 3^depth.
pub const MAX_ITERATIONS: i32 = 16;
/// Depth reduction for the three-branch mode.
pub const THREE_BRANCH_DEPTH_PENALTY: i32 = 3;

// Tick easing
/// Angular frequency of the tick overshoot.
pub const TICK_FREQUENCY: f64 = 30.0;
/// Exponential damping of the tick overshoot.
pub const TICK_DAMPING: f64 = 14.0;

// Color oscillators (radians per second of day)
/// Frequency of the value oscillator.
pub const VALUE_FREQUENCY: f32 = 0.017;
/// Frequency of the hue oscillator.
pub const HUE_FREQUENCY: f32 = 0.011;
/// Frequency of the saturation oscillator.
pub const SATURATION_FREQUENCY: f32 = 0.003;
/// Alpha of the depth-0 glow color.
pub const GLOW_ALPHA: u8 = 128;

// Clock face
/// Number of tick marks around the face.
pub const TICK_COUNT: usize = 60;
/// Every n-th tick is an hour tick.
pub const HOUR_TICK_EVERY: usize = 5;
/// Inner radius of hour ticks as a fraction of the start magnitude.
pub const HOUR_TICK_INNER_RADIUS: f32 = 0.9;
/// Inner radius of minute ticks as a fraction of the start magnitude.
pub const MINUTE_TICK_INNER_RADIUS: f32 = 0.95;

// Stroke widths (surface pixels)
/// Fractal branch lines.
pub const BRANCH_STROKE: f32 = 2.0;
/// Hour hand.
pub const HOUR_HAND_STROKE: f32 = 5.0;
/// Minute hand.
pub const MINUTE_HAND_STROKE: f32 = 4.0;
/// Second hand.
pub const SECOND_HAND_STROKE: f32 = 2.0;
/// Hour ticks on the face.
pub const HOUR_TICK_STROKE: f32 = 4.0;
/// Minute ticks on the face.
pub const MINUTE_TICK_STROKE: f32 = 2.0;

// Scheduling
/// One second in milliseconds.
pub const MILLIS_PER_SECOND: f64 = 1000.0;
