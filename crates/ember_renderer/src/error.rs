//! Error type for the renderer.

use ember_core::ConfigError;
use ember_math::MathError;
use thiserror::Error;

/// Errors that can occur while building a scene, camera or image, or while
/// rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("pixel buffer is {buffer_width}x{buffer_height} but the camera renders {camera_width}x{camera_height}")]
    DimensionMismatch {
        buffer_width: u32,
        buffer_height: u32,
        camera_width: u32,
        camera_height: u32,
    },

    #[error("pixel ({col}, {row}) is outside the {width}x{height} image")]
    PixelOutOfBounds {
        col: u32,
        row: u32,
        width: u32,
        height: u32,
    },

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("degenerate camera: {0}")]
    DegenerateCamera(String),

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("material already exists: [{0}]")]
    DuplicateMaterial(String),

    #[error("material not found: [{0}]")]
    MaterialNotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
