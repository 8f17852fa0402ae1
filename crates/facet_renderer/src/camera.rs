//! Camera and primary ray generation.

use facet_math::{Ray, Vec3};
use serde::Deserialize;

use crate::error::{RenderError, RenderResult};
use crate::sampler::Sample;

/// A pinhole camera: rays leave each sample point on the projection plane
/// in the direction away from the camera origin.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Camera {
    pub origin: Vec3,
}

impl Camera {
    pub fn new(origin: Vec3) -> Self {
        Self { origin }
    }

    pub fn validate(&self) -> RenderResult<()> {
        if !self.origin.is_finite() {
            return Err(RenderError::InvalidCamera(self.origin));
        }
        Ok(())
    }

    /// Build the primary ray for a sample.
    ///
    /// The ray starts at the sample position and points along
    /// `sample - origin`. A sample sitting on the camera origin has no
    /// direction and is a configuration error.
    pub fn make_ray(&self, sample: &Sample) -> RenderResult<Ray> {
        Ray::away_from(self.origin, sample.position).ok_or(RenderError::CameraCoincidesWithSample {
            pixel: sample.pixel,
            position: sample.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelId;

    fn sample_at(position: Vec3) -> Sample {
        Sample {
            pixel: PixelId(3),
            ordinal: 0,
            position,
        }
    }

    #[test]
    fn test_make_ray() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let ray = camera.make_ray(&sample_at(Vec3::new(0.0, 3.0, 6.0))).unwrap();

        assert_eq!(ray.origin(), Vec3::new(0.0, 3.0, 6.0));
        assert!((ray.direction() - Vec3::new(0.0, 0.6, -0.8)).length() < 1e-6);
        assert!((ray.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_camera_is_an_error() {
        let camera = Camera::new(Vec3::ONE);

        assert_eq!(
            camera.make_ray(&sample_at(Vec3::ONE)),
            Err(RenderError::CameraCoincidesWithSample {
                pixel: PixelId(3),
                position: Vec3::ONE,
            })
        );
    }

    #[test]
    fn test_validate() {
        assert!(Camera::new(Vec3::ZERO).validate().is_ok());
        assert!(Camera::new(Vec3::new(f32::NAN, 0.0, 0.0)).validate().is_err());
    }
}
