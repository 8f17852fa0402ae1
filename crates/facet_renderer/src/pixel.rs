//! Pixel cells on the projection plane.

use std::fmt;

use facet_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Identity of one output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelId(pub u32);

impl fmt::Display for PixelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A planar quadrilateral on the projection plane that becomes one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PixelCell {
    pub id: PixelId,
    pub center: Vec3,
    /// Corners in perimeter order
    pub corners: [Vec3; 4],
}

impl PixelCell {
    pub fn new(id: PixelId, center: Vec3, corners: [Vec3; 4]) -> Self {
        Self { id, center, corners }
    }
}

/// A rectangular projection plane divided into a regular grid of cells.
///
/// `right` and `up` are half-extent vectors from `center`, so the plane
/// spans `center ± right ± up`. Cells are numbered row-major from the top
/// left starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenGrid {
    pub center: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub width: u32,
    pub height: u32,
}

impl ScreenGrid {
    pub fn new(center: Vec3, right: Vec3, up: Vec3, width: u32, height: u32) -> Self {
        Self {
            center,
            right,
            up,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Id of the cell at column `x`, row `y`.
    pub fn pixel_id(&self, x: u32, y: u32) -> PixelId {
        PixelId(y * self.width + x)
    }

    /// Generate every cell of the grid in id order.
    pub fn cells(&self) -> RenderResult<Vec<PixelCell>> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidScreen("resolution must be non-zero"));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(RenderError::InvalidScreen("too many pixels"));
        }
        if !self.center.is_finite() || !self.right.is_finite() || !self.up.is_finite() {
            return Err(RenderError::InvalidScreen("plane vectors must be finite"));
        }
        if self.right.cross(self.up).length_squared() == 0.0 {
            return Err(RenderError::InvalidScreen("plane has zero area"));
        }

        let du = self.right * 2.0 / self.width as f32;
        let dv = -self.up * 2.0 / self.height as f32;
        let top_left = self.center - self.right + self.up;

        let mut cells = Vec::with_capacity(self.pixel_count());
        for y in 0..self.height {
            for x in 0..self.width {
                let corner = top_left + du * x as f32 + dv * y as f32;
                cells.push(PixelCell {
                    id: self.pixel_id(x, y),
                    center: corner + (du + dv) * 0.5,
                    corners: [corner, corner + du, corner + du + dv, corner + dv],
                });
            }
        }

        Ok(cells)
    }
}
