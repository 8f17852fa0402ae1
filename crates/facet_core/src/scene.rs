//! The surface store.
//!
//! A `Scene` owns every primitive and light for the duration of a render
//! and is only ever read afterwards, so it can be shared across worker
//! threads by reference.

use facet_math::{Aabb, Interval, Ray, Vec2, Vec3};
use thiserror::Error;

use crate::attribute::{AttributeName, AttributeValue, SurfaceSample};
use crate::light::PointLight;
use crate::primitive::{PrimitiveId, SurfacePrimitive};

/// Errors in the scene description. All of them are configuration errors
/// and are reported before any rendering starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("primitive {primitive}: unknown attribute `{name}`")]
    UnknownAttribute { primitive: PrimitiveId, name: String },

    #[error("primitive {primitive}: missing required attribute `{name}`")]
    MissingAttribute { primitive: PrimitiveId, name: AttributeName },

    #[error("primitive {primitive}: attribute `{name}` must be {expected}")]
    AttributeKind {
        primitive: PrimitiveId,
        name: AttributeName,
        expected: &'static str,
    },

    #[error("primitive {primitive}: attribute `{name}` has {found} values, shape needs {expected}")]
    AttributeArity {
        primitive: PrimitiveId,
        name: AttributeName,
        expected: usize,
        found: usize,
    },

    #[error("primitive {primitive}: shininess must be finite and non-negative, got {value}")]
    InvalidShininess { primitive: PrimitiveId, value: f32 },

    #[error("primitive {primitive}: {reason}")]
    DegenerateShape { primitive: PrimitiveId, reason: &'static str },

    #[error("duplicate primitive id {0}")]
    DuplicatePrimitive(PrimitiveId),

    #[error("no primitive with id {0}")]
    UnknownPrimitive(PrimitiveId),

    #[error("light {index}: {reason}")]
    InvalidLight { index: usize, reason: &'static str },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A ray/surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub primitive_id: PrimitiveId,
    /// Distance along the ray
    pub distance: f32,
    pub position: Vec3,
    pub parametric_coord: Vec2,
    /// Normal read from the primitive's `normal` attribute
    pub normal: Vec3,
}

/// Result of a nearest-hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Miss,
    Surface(SurfaceHit),
}

impl Hit {
    pub fn is_miss(&self) -> bool {
        matches!(self, Hit::Miss)
    }

    pub fn surface(&self) -> Option<&SurfaceHit> {
        match self {
            Hit::Miss => None,
            Hit::Surface(hit) => Some(hit),
        }
    }
}

/// Read-only collection of primitives and lights.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Sorted by id ascending
    primitives: Vec<SurfacePrimitive>,
    lights: Vec<PointLight>,
    bounds: Aabb,
}

impl Scene {
    /// Build a scene, rejecting duplicate primitive ids and invalid lights.
    pub fn new(mut primitives: Vec<SurfacePrimitive>, lights: Vec<PointLight>) -> SceneResult<Self> {
        primitives.sort_by_key(|p| p.id());
        if let Some(pair) = primitives.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(SceneError::DuplicatePrimitive(pair[0].id()));
        }

        for (index, light) in lights.iter().enumerate() {
            light.validate(index)?;
        }
        if lights.is_empty() {
            log::warn!("Scene has no lights; only emit and ambient terms will be visible");
        }

        let bounds = primitives
            .iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::surrounding(&acc, &p.bounding_box()));

        log::debug!(
            "Scene built with {} primitives and {} lights",
            primitives.len(),
            lights.len()
        );

        Ok(Self {
            primitives,
            lights,
            bounds,
        })
    }

    /// Primitives in id order.
    pub fn primitives(&self) -> &[SurfacePrimitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Box enclosing every primitive. Empty for a scene without primitives.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Look up a primitive by id.
    pub fn primitive(&self, id: PrimitiveId) -> SceneResult<&SurfacePrimitive> {
        self.primitives
            .binary_search_by_key(&id, |p| p.id())
            .map(|index| &self.primitives[index])
            .map_err(|_| SceneError::UnknownPrimitive(id))
    }

    /// Find the closest intersection along the ray within `ray_t`.
    ///
    /// Rays that miss the scene bounds return early. Otherwise every
    /// primitive is tested. Primitives are visited in id order and a later
    /// hit only wins if it is strictly closer, so equal distances resolve
    /// to the lowest id.
    pub fn nearest_intersection(&self, ray: &Ray, ray_t: Interval) -> Hit {
        if !self.bounds.hit(ray, ray_t) {
            return Hit::Miss;
        }

        let mut closest: Option<(&SurfacePrimitive, f32, Vec2)> = None;
        let mut search = ray_t;

        for primitive in &self.primitives {
            if let Some(hit) = primitive.intersect(ray, search) {
                let closer = closest.map_or(true, |(_, t, _)| hit.t < t);
                if closer {
                    closest = Some((primitive, hit.t, hit.uv));
                    search = search.with_max(hit.t);
                }
            }
        }

        match closest {
            None => Hit::Miss,
            Some((primitive, distance, uv)) => Hit::Surface(SurfaceHit {
                primitive_id: primitive.id(),
                distance,
                position: ray.at(distance),
                parametric_coord: uv,
                normal: primitive.normal_at(uv),
            }),
        }
    }

    /// Evaluate one attribute of a primitive at a parametric coordinate.
    pub fn attribute_at(&self, id: PrimitiveId, uv: Vec2, name: AttributeName) -> SceneResult<AttributeValue> {
        Ok(self.primitive(id)?.attribute_at(uv, name))
    }

    /// Evaluate all shading attributes of a primitive at a parametric coordinate.
    pub fn surface_at(&self, id: PrimitiveId, uv: Vec2) -> SceneResult<SurfaceSample> {
        Ok(self.primitive(id)?.surface_at(uv))
    }
}
