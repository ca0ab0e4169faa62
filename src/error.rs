//! Startup error types
//!
//! Only asset and settings loading can fail. Once the loop is running,
//! missing or stale data disables the affected rule for that tick instead.

use thiserror::Error;

/// Failures while building textures, masks and sprites
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("mask {width}x{height} expects {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("mask has zero area ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("sub-rectangle {rect:?} lies outside {width}x{height} texture")]
    SubRectOutOfBounds {
        rect: [i32; 4],
        width: u32,
        height: u32,
    },

    #[error("invalid scale factor ({sx}, {sy})")]
    InvalidScale { sx: f32, sy: f32 },
}

/// Failures while reading runtime settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
