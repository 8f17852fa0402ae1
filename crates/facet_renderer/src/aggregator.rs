//! Per-pixel reduction of shaded samples.
//!
//! Samples are grouped by pixel identity into a pre-sized accumulator and
//! each group is averaged. Within a group, samples are summed in ordinal
//! order, so the result is bit-identical no matter in which order the
//! samples arrived.

use std::collections::HashMap;

use facet_core::Color;

use crate::error::{RenderError, RenderResult};
use crate::pixel::PixelId;

/// Shading result of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedSample {
    pub pixel: PixelId,
    pub ordinal: u8,
    pub color: Color,
}

/// Final color of one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelOutput {
    pub id: PixelId,
    /// Mean of the pixel's sample colors
    pub color: Color,
    pub sample_count: usize,
}

/// Averaged colors for every input pixel, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPixels {
    pixels: Vec<PixelOutput>,
    index: HashMap<PixelId, usize>,
}

impl RenderedPixels {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color of a pixel, if it was part of the render.
    pub fn get(&self, id: PixelId) -> Option<Color> {
        self.index.get(&id).map(|&slot| self.pixels[slot].color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PixelOutput> {
        self.pixels.iter()
    }

    pub fn as_slice(&self) -> &[PixelOutput] {
        &self.pixels
    }
}

/// Collects shaded samples for a fixed set of pixels.
#[derive(Debug)]
pub struct PixelAccumulator {
    ids: Vec<PixelId>,
    index: HashMap<PixelId, usize>,
    slots: Vec<Vec<(u8, Color)>>,
}

impl PixelAccumulator {
    /// Create an accumulator for `ids`, expecting about `samples_per_pixel`
    /// samples each. Duplicate ids are rejected.
    pub fn new(ids: impl IntoIterator<Item = PixelId>, samples_per_pixel: usize) -> RenderResult<Self> {
        let ids: Vec<PixelId> = ids.into_iter().collect();
        let mut index = HashMap::with_capacity(ids.len());
        for (slot, id) in ids.iter().enumerate() {
            if index.insert(*id, slot).is_some() {
                return Err(RenderError::DuplicatePixel(*id));
            }
        }

        let slots = (0..ids.len())
            .map(|_| Vec::with_capacity(samples_per_pixel))
            .collect();

        Ok(Self { ids, index, slots })
    }

    /// Add one shaded sample to its pixel's group.
    pub fn add(&mut self, sample: ShadedSample) -> RenderResult<()> {
        let slot = *self
            .index
            .get(&sample.pixel)
            .ok_or(RenderError::UnknownPixel(sample.pixel))?;
        self.slots[slot].push((sample.ordinal, sample.color));
        Ok(())
    }

    /// Average every group. Fails if any pixel received no samples.
    pub fn finish(self) -> RenderResult<RenderedPixels> {
        let mut pixels = Vec::with_capacity(self.ids.len());

        for (id, mut group) in self.ids.into_iter().zip(self.slots) {
            if group.is_empty() {
                return Err(RenderError::EmptyPixel(id));
            }

            group.sort_unstable_by_key(|(ordinal, _)| *ordinal);
            if let Some(pair) = group.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(RenderError::DuplicateSample {
                    pixel: id,
                    ordinal: pair[0].0,
                });
            }

            let sum = group.iter().fold(Color::ZERO, |acc, (_, color)| acc + *color);
            pixels.push(PixelOutput {
                id,
                color: sum / group.len() as f32,
                sample_count: group.len(),
            });
        }

        Ok(RenderedPixels {
            pixels,
            index: self.index,
        })
    }
}

/// Reduce a complete set of shaded samples to one mean color per pixel.
///
/// Every id in `pixel_ids` appears exactly once in the output.
pub fn reduce(
    samples: impl IntoIterator<Item = ShadedSample>,
    pixel_ids: impl IntoIterator<Item = PixelId>,
) -> RenderResult<RenderedPixels> {
    let mut accumulator = PixelAccumulator::new(pixel_ids, 0)?;
    for sample in samples {
        accumulator.add(sample)?;
    }
    accumulator.finish()
}
