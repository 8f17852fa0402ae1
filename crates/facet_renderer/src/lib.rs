//! Facet Renderer - point-sampled direct illumination.
//!
//! Casts a fixed pattern of rays through every pixel cell of a projection
//! plane, shades each nearest hit with Blinn-Phong, and averages the
//! samples of each pixel.
//!
//! Sampler -> camera -> intersector -> shader run independently per
//! sample; the aggregator joins them per pixel once every sample is done.

mod aggregator;
mod camera;
mod error;
mod intersector;
mod pixel;
mod renderer;
mod sampler;
mod shader;

pub use aggregator::{reduce, PixelAccumulator, PixelOutput, RenderedPixels, ShadedSample};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use intersector::Intersector;
pub use pixel::{PixelCell, PixelId, ScreenGrid};
pub use renderer::{RenderConfig, Renderer, DEFAULT_MAX_RAY_DISTANCE};
pub use sampler::{generate, Sample, SamplePattern, CENTER_ORDINAL};
pub use shader::{blinn_phong, blinn_specular, lambertian, Shader};

/// Re-export the scene types renderer users need alongside it
pub use facet_core::{Color, Hit, PointLight, Scene};
pub use facet_math::{Ray, Vec3};
