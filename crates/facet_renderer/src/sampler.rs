//! Deterministic per-pixel sample patterns.
//!
//! A pattern places an optional center sample plus four samples on the
//! segments from the cell center towards its corners. There is no
//! randomness: the same cell and pattern always give the same samples.

use facet_math::Vec3;
use serde::Deserialize;

use crate::error::{RenderError, RenderResult};
use crate::pixel::{PixelCell, PixelId};

/// Ordinal of the center sample within its cell.
pub const CENTER_ORDINAL: u8 = 0;

/// One evaluation point of a pixel cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub pixel: PixelId,
    /// Position of this sample within its cell's pattern (0 = center,
    /// 1..=4 = corners). Only used to give reduction a fixed order.
    pub ordinal: u8,
    pub position: Vec3,
}

/// Which samples to take inside each pixel cell.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplePattern {
    /// Emit the cell center as a sample
    pub include_center: bool,
    /// Interpolation from center (0) to corner (1) for the four corner samples
    pub corner_bias: f32,
}

impl Default for SamplePattern {
    fn default() -> Self {
        Self::quincunx()
    }
}

impl SamplePattern {
    /// Center plus four samples halfway to the corners.
    pub fn quincunx() -> Self {
        Self {
            include_center: true,
            corner_bias: 0.5,
        }
    }

    /// The four cell corners only.
    pub fn grid() -> Self {
        Self {
            include_center: false,
            corner_bias: 1.0,
        }
    }

    /// One sample at the cell center, no anti-aliasing.
    pub fn center_only() -> Self {
        Self {
            include_center: true,
            corner_bias: 0.0,
        }
    }

    pub fn with_corner_bias(mut self, corner_bias: f32) -> Self {
        self.corner_bias = corner_bias;
        self
    }

    pub fn with_center(mut self, include_center: bool) -> Self {
        self.include_center = include_center;
        self
    }

    /// Corner samples collapse onto the center at zero bias and are skipped.
    fn emits_corners(&self) -> bool {
        self.corner_bias > 0.0
    }

    /// Number of samples generated for every cell.
    pub fn samples_per_cell(&self) -> usize {
        usize::from(self.include_center) + if self.emits_corners() { 4 } else { 0 }
    }

    pub fn validate(&self) -> RenderResult<()> {
        if !(0.0..=1.0).contains(&self.corner_bias) {
            return Err(RenderError::InvalidPattern("corner_bias must lie in [0, 1]"));
        }
        if self.samples_per_cell() == 0 {
            return Err(RenderError::InvalidPattern(
                "pattern emits no samples; enable include_center or use a positive corner_bias",
            ));
        }
        Ok(())
    }
}

/// Generate the samples of one cell.
pub fn generate(cell: &PixelCell, pattern: &SamplePattern) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(pattern.samples_per_cell());

    if pattern.include_center {
        samples.push(Sample {
            pixel: cell.id,
            ordinal: CENTER_ORDINAL,
            position: cell.center,
        });
    }

    if pattern.emits_corners() {
        for (i, corner) in cell.corners.iter().enumerate() {
            samples.push(Sample {
                pixel: cell.id,
                ordinal: CENTER_ORDINAL + 1 + i as u8,
                position: cell.center.lerp(*corner, pattern.corner_bias),
            });
        }
    }

    samples
}
