//! Per-frame palette generation.
//!
//! Each recursion depth gets one color. Hue, saturation and value drift slowly
//! with the time of day, so the tree cycles through palettes over hours.

use crate::constants::{GLOW_ALPHA, HUE_FREQUENCY, SATURATION_FREQUENCY, VALUE_FREQUENCY};
use crate::types::PackedColor;
use std::ops::Index;

/// Converts HSV in `[0, 1]` to an opaque packed color using six hue sectors.
pub fn hsv_to_color(h: f32, s: f32, v: f32) -> PackedColor {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    PackedColor::from_rgb_f32(r, g, b)
}

/// One color per recursion depth, index 0 being the leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    colors: Vec<PackedColor>,
}

impl ColorScheme {
    /// Builds the palette for time `t` (seconds since midnight).
    ///
    /// Depth 0 is a half-transparent glow. The deepest entry becomes
    /// `clock_face_color` while the clock overlay is drawn. With a single
    /// depth the glow wins.
    pub fn generate(
        t: f32,
        iteration_count: usize,
        draw_clock: bool,
        clock_face_color: PackedColor,
    ) -> Self {
        let r1 = (t * VALUE_FREQUENCY).sin() * 0.5 + 0.5;
        let r2 = (t * HUE_FREQUENCY).sin() * 0.5 + 0.5;
        let r3 = (t * SATURATION_FREQUENCY).sin() * 0.5 + 0.5;

        let last = iteration_count.saturating_sub(1);
        let colors = (0..iteration_count)
            .map(|i| {
                let a = if last == 0 { 0.0 } else { i as f32 / last as f32 };
                let h = (r2 + 0.5 * a).rem_euclid(1.0);
                let s = 0.5 + 0.5 * r3 - 0.5 * (1.0 - a);
                let v = 0.3 + 0.5 * r1;
                if i == 0 {
                    hsv_to_color(h, 1.0, 1.0).with_alpha(GLOW_ALPHA)
                } else if i == last && draw_clock {
                    clock_face_color
                } else {
                    hsv_to_color(h, s, v)
                }
            })
            .collect();
        Self { colors }
    }

    /// Number of depths covered.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the scheme has no entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for `depth`, clamped to the deepest entry.
    pub fn at(&self, depth: usize) -> PackedColor {
        self.colors
            .get(depth)
            .or_else(|| self.colors.last())
            .copied()
            .unwrap_or(PackedColor::TRANSPARENT)
    }

    /// The glow color used for leaf points.
    pub fn glow(&self) -> PackedColor {
        self.at(0)
    }
}

impl Index<usize> for ColorScheme {
    type Output = PackedColor;

    fn index(&self, depth: usize) -> &PackedColor {
        &self.colors[depth]
    }
}
