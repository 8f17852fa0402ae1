//! Presentation of rendered pixels: tone clamp, gamma and file output.

use std::path::Path;

use anyhow::{bail, Context, Result};
use facet_renderer::{Color, RenderedPixels, ScreenGrid};
use serde::Serialize;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA, clamping out-of-range values.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Row-major image assembled from rendered pixels of a screen grid.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Lay out the rendered pixels of `grid` as an image.
    pub fn from_grid(grid: &ScreenGrid, rendered: &RenderedPixels) -> Result<Self> {
        let mut pixels = Vec::with_capacity(grid.pixel_count());
        for y in 0..grid.height {
            for x in 0..grid.width {
                let id = grid.pixel_id(x, y);
                match rendered.get(id) {
                    Some(color) => pixels.push(color),
                    None => bail!("Pixel {} is missing from the render output", id),
                }
            }
        }

        Ok(Self {
            width: grid.width,
            height: grid.height,
            pixels,
        })
    }

    /// Convert to RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[derive(Serialize)]
struct PixelRecord {
    id: u32,
    color: [f32; 3],
}

/// Write the raw, unclamped pixel colors as a JSON array.
pub fn save_json(rendered: &RenderedPixels, path: &Path) -> Result<()> {
    let records: Vec<PixelRecord> = rendered
        .iter()
        .map(|p| PixelRecord {
            id: p.id.0,
            color: p.color.to_array(),
        })
        .collect();

    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::new(4.0, 1.0, -2.0)), [255, 255, 0, 255]);
        assert_eq!(color_to_rgba(Color::splat(0.25)), [128, 128, 128, 255]);
    }
}
