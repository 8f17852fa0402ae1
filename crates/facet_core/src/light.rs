//! Point lights.

use facet_math::Vec3;
use serde::Deserialize;

use crate::attribute::Color;
use crate::scene::{SceneError, SceneResult};

/// An isotropic point light. Immutable during a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    /// RGB in [0, 1]
    pub color: Color,
    /// Non-negative scale applied to `color`
    pub power: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, power: f32) -> Self {
        Self {
            position,
            color,
            power,
        }
    }

    /// White light of the given power.
    pub fn white(position: Vec3, power: f32) -> Self {
        Self::new(position, Color::ONE, power)
    }

    /// Check position, color range and power. `index` is used in the error.
    pub fn validate(&self, index: usize) -> SceneResult<()> {
        let reason = if !self.position.is_finite() {
            Some("position must be finite")
        } else if !self.color.is_finite()
            || self.color.min_element() < 0.0
            || self.color.max_element() > 1.0
        {
            Some("color components must lie in [0, 1]")
        } else if !self.power.is_finite() || self.power < 0.0 {
            Some("power must be finite and non-negative")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SceneError::InvalidLight { index, reason }),
            None => Ok(()),
        }
    }

    /// Color scaled by power.
    pub fn intensity(&self) -> Color {
        self.color * self.power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_light() {
        assert!(PointLight::white(Vec3::Y, 10.0).validate(0).is_ok());
        assert!(PointLight::white(Vec3::Y, 0.0).validate(0).is_ok());

        let too_bright = PointLight::new(Vec3::Y, Vec3::new(1.5, 0.0, 0.0), 1.0);
        assert!(matches!(
            too_bright.validate(3),
            Err(SceneError::InvalidLight { index: 3, .. })
        ));

        let negative = PointLight::white(Vec3::Y, -1.0);
        assert!(negative.validate(0).is_err());

        let nowhere = PointLight::white(Vec3::new(f32::INFINITY, 0.0, 0.0), 1.0);
        assert!(nowhere.validate(0).is_err());
    }

    #[test]
    fn test_intensity() {
        let light = PointLight::new(Vec3::ZERO, Vec3::new(1.0, 0.5, 0.0), 4.0);
        assert_eq!(light.intensity(), Vec3::new(4.0, 2.0, 0.0));
    }
}
