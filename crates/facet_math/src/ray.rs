use crate::Vec3;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// The direction is normalized on construction and the fields are private,
/// so a `Ray` can never carry a zero or unnormalized direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// Returns `None` if `direction` has zero (or non-finite) length.
    pub fn try_new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Create a ray that starts at `origin` and points away from `from`.
    ///
    /// Returns `None` when the two points coincide.
    pub fn away_from(from: Vec3, origin: Vec3) -> Option<Self> {
        Self::try_new(origin, origin - from)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
