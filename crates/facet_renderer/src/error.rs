//! Render errors.

use facet_core::SceneError;
use facet_math::Vec3;
use thiserror::Error;

use crate::pixel::PixelId;

/// Errors that abort a render pass.
///
/// Configuration errors are raised before any sample is shaded. Aggregation
/// errors mean the sampler and aggregator disagree about the pixel set and
/// indicate a bug, not bad input data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid sample pattern: {0}")]
    InvalidPattern(&'static str),

    #[error("max_ray_distance must be finite and positive, got {0}")]
    InvalidMaxDistance(f32),

    #[error("Camera origin must be finite, got {0:?}")]
    InvalidCamera(Vec3),

    #[error("Invalid screen: {0}")]
    InvalidScreen(&'static str),

    #[error("Camera coincides with a sample of pixel {pixel} at {position:?}")]
    CameraCoincidesWithSample { pixel: PixelId, position: Vec3 },

    #[error("Pixel {0} appears more than once in the input cells")]
    DuplicatePixel(PixelId),

    #[error("Shaded sample refers to pixel {0}, which is not in the input cells")]
    UnknownPixel(PixelId),

    #[error("Pixel {0} received no samples")]
    EmptyPixel(PixelId),

    #[error("Pixel {pixel} received sample {ordinal} twice")]
    DuplicateSample { pixel: PixelId, ordinal: u8 },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Render pass was cancelled")]
    Cancelled,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
