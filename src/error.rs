//! Error types for scene setup, presets and output.
//!
//! The wave evaluator itself is total and never produces these.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised outside the per-frame evaluation path.
#[derive(Debug, Error)]
pub enum WaterError {
    /// Preset file could not be read or written.
    #[error("failed to read/write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preset file is not valid JSON for a scene.
    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Preset could not be serialised.
    #[error("failed to serialize preset: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Color string is not `#rrggbb`.
    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    /// Window surface creation failed.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter compatible with the surface.
    #[error("failed to find a suitable GPU adapter")]
    NoAdapter,

    /// Device request rejected by the adapter.
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Snapshot image could not be written.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

pub type Result<T> = std::result::Result<T, WaterError>;
