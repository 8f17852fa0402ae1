//! Surface primitives: a shape plus its validated attribute set.

use std::fmt;

use facet_math::{Aabb, Interval, Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeName, AttributeValue, SurfaceAttributes, SurfaceSample};
use crate::scene::{SceneError, SceneResult};
use crate::shape::{Shape, ShapeHit};

/// Stable identity of a primitive for the lifetime of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveId(pub u32);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A renderable surface. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct SurfacePrimitive {
    id: PrimitiveId,
    shape: Shape,
    attributes: SurfaceAttributes,
    bbox: Aabb,
}

impl SurfacePrimitive {
    /// Create a primitive, validating its shape and attribute schema.
    pub fn new(id: PrimitiveId, shape: Shape, attributes: SurfaceAttributes) -> SceneResult<Self> {
        if let Some(reason) = shape.degeneracy() {
            return Err(SceneError::DegenerateShape { primitive: id, reason });
        }
        attributes.validate(id, shape.vertex_count())?;

        Ok(Self {
            id,
            bbox: shape.bounding_box(),
            shape,
            attributes,
        })
    }

    pub fn id(&self) -> PrimitiveId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn attributes(&self) -> &SurfaceAttributes {
        &self.attributes
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Intersect after a cheap bounding-box rejection.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }
        self.shape.intersect(ray, ray_t)
    }

    /// Evaluate every attribute at a parametric coordinate.
    pub fn surface_at(&self, uv: Vec2) -> SurfaceSample {
        self.attributes.evaluate(&self.shape.parametric_weights(uv))
    }

    /// Evaluate only the shading normal at a parametric coordinate.
    pub fn normal_at(&self, uv: Vec2) -> Vec3 {
        self.attributes.normal.evaluate(&self.shape.parametric_weights(uv))
    }

    /// Evaluate a single attribute at a parametric coordinate.
    pub fn attribute_at(&self, uv: Vec2, name: AttributeName) -> AttributeValue {
        self.attributes
            .evaluate_named(name, &self.shape.parametric_weights(uv))
    }
}
