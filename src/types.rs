//! Core value types shared by the geometry, color and rendering modules.
//!
//! Everything here is a plain value: vectors, packed colors, vertices and the
//! captured clock-hand positions. None of it carries identity across frames.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// A 2D vector in either scaled geometry space or surface-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component
    pub x: f32,
    /// Vertical component (grows downwards, like the surface)
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians from the positive x axis.
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Complex multiplication: rotates `self` by the unit vector `rot`.
    pub fn rotate(self, rot: Vector2) -> Self {
        Self::new(
            self.x * rot.x - self.y * rot.y,
            self.y * rot.x + self.x * rot.y,
        )
    }

    /// Squared Euclidean length.
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

/// A color packed as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedColor(pub u32);

impl PackedColor {
    /// Opaque white.
    pub const WHITE: PackedColor = PackedColor(0xFFFF_FFFF);
    /// Fully transparent black.
    pub const TRANSPARENT: PackedColor = PackedColor(0);

    /// Packs the four channels.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        PackedColor(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Packs an opaque color.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    /// Packs an opaque color from channels in `[0, 1]`, rounding to the nearest step.
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_rgb(channel(r), channel(g), channel(b))
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same color with a replaced alpha channel.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::from_argb(alpha, self.red(), self.green(), self.blue())
    }
}

/// A colored position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position of the vertex
    pub position: Vector2,
    /// Color of the vertex
    pub color: PackedColor,
}

impl Vertex {
    /// Creates a vertex.
    pub const fn new(position: Vector2, color: PackedColor) -> Self {
        Self { position, color }
    }
}

/// Positions of the traditional clock hands in surface-pixel space.
///
/// Captured once per frame from the top-level fork of the fractal when the
/// clock overlay is enabled. Hands that the current clock type does not use
/// keep their previous value, matching a long-lived readout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HandEndpoints {
    /// Common origin of all hands
    pub base: Vector2,
    /// Tip of the hour hand
    pub hour: Vector2,
    /// Tip of the minute hand
    pub minute: Vector2,
    /// Tip of the second hand
    pub second: Vector2,
}
