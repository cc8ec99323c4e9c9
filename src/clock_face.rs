//! Static tick marks around the clock.
//!
//! The face only depends on the surface size, the scaling factor and the face
//! color, so it is built once and cached until one of those changes.

use crate::constants::{
    HOUR_TICK_EVERY, HOUR_TICK_INNER_RADIUS, MINUTE_TICK_INNER_RADIUS, TICK_COUNT,
};
use crate::fractal::Layout;
use crate::rotation::BranchRatio;
use crate::types::{PackedColor, Vector2, Vertex};
use std::f32::consts::TAU;

/// One tick: inner and outer endpoint in scaled space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockFaceMark {
    /// Endpoint nearer the center
    pub inner: Vertex,
    /// Endpoint on the rim
    pub outer: Vertex,
}

/// Inputs the face is a pure function of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceKey {
    /// Surface width in pixels
    pub width: f32,
    /// Surface height in pixels
    pub height: f32,
    /// Geometry scaling factor
    pub scaling_factor: f32,
    /// Tick color
    pub color: PackedColor,
}

/// The 60 tick marks, split into hour and minute groups.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockFace {
    /// Every fifth tick, drawn longer and thicker
    pub hour_marks: Vec<ClockFaceMark>,
    /// The remaining ticks
    pub minute_marks: Vec<ClockFaceMark>,
}

impl ClockFace {
    /// Builds the face for `key`.
    pub fn build(key: &FaceKey) -> Self {
        let layout = Layout::new(key.width, key.height, key.scaling_factor, &BranchRatio::STANDARD);
        let mut hour_marks = Vec::with_capacity(TICK_COUNT / HOUR_TICK_EVERY);
        let mut minute_marks = Vec::with_capacity(TICK_COUNT - TICK_COUNT / HOUR_TICK_EVERY);

        for i in 0..TICK_COUNT {
            let direction = Vector2::from_angle(i as f32 * TAU / TICK_COUNT as f32);
            let is_hour = i % HOUR_TICK_EVERY == 0;
            let inner_radius = if is_hour {
                HOUR_TICK_INNER_RADIUS
            } else {
                MINUTE_TICK_INNER_RADIUS
            };
            let mark = ClockFaceMark {
                inner: Vertex::new(
                    layout.center + direction * (layout.start_magnitude * inner_radius),
                    key.color,
                ),
                outer: Vertex::new(layout.center + direction * layout.start_magnitude, key.color),
            };
            if is_hour {
                hour_marks.push(mark);
            } else {
                minute_marks.push(mark);
            }
        }

        Self {
            hour_marks,
            minute_marks,
        }
    }

    /// Total number of marks.
    pub fn len(&self) -> usize {
        self.hour_marks.len() + self.minute_marks.len()
    }

    /// True when the face has no marks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps the last built face and rebuilds only when its inputs change.
#[derive(Debug, Default)]
pub struct ClockFaceCache {
    entry: Option<(FaceKey, ClockFace)>,
}

impl ClockFaceCache {
    /// Returns the face for `key`, rebuilding if needed.
    pub fn get(&mut self, key: FaceKey) -> &ClockFace {
        let stale = !matches!(&self.entry, Some((cached, _)) if *cached == key);
        if stale {
            log::debug!(
                "Rebuilding clock face for {}x{} at scale {}",
                key.width,
                key.height,
                key.scaling_factor
            );
            self.entry = None;
        }
        let (_, face) = self
            .entry
            .get_or_insert_with(|| (key, ClockFace::build(&key)));
        face
    }

    /// Drops the cached face so the next request rebuilds it.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a face is currently cached.
    pub fn is_built(&self) -> bool {
        self.entry.is_some()
    }
}
