//! Render pass driver.
//!
//! A pass runs in three phases:
//! - sample generation and primary rays (configuration errors surface here)
//! - a parallel map of trace + shade over every sample
//! - a barrier, then the per-pixel reduction
//!
//! The scene is only read during a pass, so workers share it by reference.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use facet_core::Scene;
use facet_math::Ray;
use rayon::prelude::*;
use serde::Deserialize;

use crate::aggregator::{PixelAccumulator, RenderedPixels, ShadedSample};
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::intersector::Intersector;
use crate::pixel::PixelCell;
use crate::sampler::{self, Sample, SamplePattern};
use crate::shader::Shader;

/// Default far clip for primary rays.
pub const DEFAULT_MAX_RAY_DISTANCE: f32 = 1.0e6;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples taken inside each pixel cell
    #[serde(flatten)]
    pub sampling: SamplePattern,
    /// Hits farther than this along a ray count as misses
    pub max_ray_distance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sampling: SamplePattern::default(),
            max_ray_distance: DEFAULT_MAX_RAY_DISTANCE,
        }
    }
}

impl RenderConfig {
    pub fn with_sampling(mut self, sampling: SamplePattern) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_max_ray_distance(mut self, max_ray_distance: f32) -> Self {
        self.max_ray_distance = max_ray_distance;
        self
    }
}

/// A validated scene, camera and configuration, ready to render pixel cells.
pub struct Renderer<'a> {
    camera: Camera,
    config: RenderConfig,
    intersector: Intersector<'a>,
    shader: Shader<'a>,
}

impl<'a> Renderer<'a> {
    /// Validate the configuration. Nothing is sampled yet.
    pub fn new(scene: &'a Scene, camera: Camera, config: RenderConfig) -> RenderResult<Self> {
        camera.validate()?;
        config.sampling.validate()?;
        let intersector = Intersector::new(scene, config.max_ray_distance)?;

        Ok(Self {
            camera,
            config,
            intersector,
            shader: Shader::new(scene),
        })
    }

    /// Render every cell in parallel.
    pub fn render(&self, cells: &[PixelCell]) -> RenderResult<RenderedPixels> {
        self.render_cancellable(cells, &AtomicBool::new(false))
    }

    /// Render every cell in parallel, giving up as soon as `cancel` is set.
    ///
    /// A cancelled pass returns `RenderError::Cancelled` and discards all
    /// in-flight samples; no partial pixel colors are produced.
    pub fn render_cancellable(&self, cells: &[PixelCell], cancel: &AtomicBool) -> RenderResult<RenderedPixels> {
        let start = Instant::now();
        let accumulator = self.accumulator(cells)?;

        let primary: Vec<(Sample, Ray)> = cells
            .par_iter()
            .flat_map_iter(|cell| sampler::generate(cell, &self.config.sampling))
            .map(|sample| self.camera.make_ray(&sample).map(|ray| (sample, ray)))
            .collect::<RenderResult<_>>()?;
        log::debug!("Generated {} primary rays in {:?}", primary.len(), start.elapsed());

        let shaded: Vec<ShadedSample> = primary
            .par_iter()
            .map(|(sample, ray)| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(RenderError::Cancelled);
                }
                self.shade_sample(sample, ray)
            })
            .collect::<RenderResult<_>>()?;

        self.finish(accumulator, shaded, start, cancel)
    }

    /// Render every cell on the calling thread.
    ///
    /// Produces the same colors, bit for bit, as [`Renderer::render`].
    pub fn render_serial(&self, cells: &[PixelCell]) -> RenderResult<RenderedPixels> {
        let start = Instant::now();
        let accumulator = self.accumulator(cells)?;

        let primary: Vec<(Sample, Ray)> = cells
            .iter()
            .flat_map(|cell| sampler::generate(cell, &self.config.sampling))
            .map(|sample| self.camera.make_ray(&sample).map(|ray| (sample, ray)))
            .collect::<RenderResult<_>>()?;

        let shaded: Vec<ShadedSample> = primary
            .iter()
            .map(|(sample, ray)| self.shade_sample(sample, ray))
            .collect::<RenderResult<_>>()?;

        self.finish(accumulator, shaded, start, &AtomicBool::new(false))
    }

    /// Trace and shade one sample.
    fn shade_sample(&self, sample: &Sample, ray: &Ray) -> RenderResult<ShadedSample> {
        let hit = self.intersector.trace(ray);
        let color = self.shader.shade(&hit, self.camera.origin)?;

        Ok(ShadedSample {
            pixel: sample.pixel,
            ordinal: sample.ordinal,
            color,
        })
    }

    fn accumulator(&self, cells: &[PixelCell]) -> RenderResult<PixelAccumulator> {
        log::info!(
            "Rendering {} pixels at {} samples each",
            cells.len(),
            self.config.sampling.samples_per_cell()
        );
        PixelAccumulator::new(cells.iter().map(|c| c.id), self.config.sampling.samples_per_cell())
    }

    fn finish(
        &self,
        mut accumulator: PixelAccumulator,
        shaded: Vec<ShadedSample>,
        start: Instant,
        cancel: &AtomicBool,
    ) -> RenderResult<RenderedPixels> {
        // Samples finishing after a late cancel are still discarded
        if cancel.load(Ordering::Relaxed) {
            log::debug!("Pass cancelled with {} samples shaded", shaded.len());
            return Err(RenderError::Cancelled);
        }

        let sample_count = shaded.len();
        for sample in shaded {
            accumulator.add(sample)?;
        }
        let pixels = accumulator.finish()?;

        log::info!(
            "Rendered {} pixels from {} samples in {:?}",
            pixels.len(),
            sample_count,
            start.elapsed()
        );
        Ok(pixels)
    }
}
