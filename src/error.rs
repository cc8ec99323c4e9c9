//! Error types for the fractal clock.
//!
//! None of these ever reach the user: the frame driver logs them and skips the
//! frame.

use thiserror::Error;

/// Everything that can go wrong while producing or exporting a frame.
#[derive(Error, Debug)]
pub enum ClockError {
    /// The drawing surface is not ready or is being torn down
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// An off-screen pixmap could not be allocated
    #[error("Failed to create pixmap {width}x{height}")]
    Pixmap {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// PNG encoding failed
    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    /// File system error while saving an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored settings could not be parsed or written
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ClockError>;
