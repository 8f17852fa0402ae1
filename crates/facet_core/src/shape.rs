//! Intersectable shapes.
//!
//! Each shape reports the ray distance of a hit together with its
//! parametric coordinate, which is what surface attributes are looked up
//! by. Shapes are two-sided: no back-face culling.

use std::f32::consts::PI;

use facet_math::{Aabb, Interval, Ray, Vec2, Vec3};
use serde::Deserialize;

/// Geometric part of a surface primitive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Triangle; the parametric coordinate is the barycentric (u, v) of v1, v2
    Triangle { v0: Vec3, v1: Vec3, v2: Vec3 },
    /// Parallelogram spanned from `origin` by two edges; (u, v) in [0, 1]^2
    Quad { origin: Vec3, edge_u: Vec3, edge_v: Vec3 },
    /// Sphere; (u, v) are longitude and latitude mapped to [0, 1]
    Sphere { center: Vec3, radius: f32 },
}

/// Ray distance and parametric coordinate of a shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    pub t: f32,
    pub uv: Vec2,
}

/// Interpolation weights for per-vertex attribute values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricWeights {
    weights: [f32; 4],
    len: usize,
}

impl ParametricWeights {
    /// A single unit weight, for evaluating constant attributes.
    pub fn constant() -> Self {
        Self {
            weights: [1.0, 0.0, 0.0, 0.0],
            len: 1,
        }
    }

    fn barycentric(uv: Vec2) -> Self {
        Self {
            weights: [1.0 - uv.x - uv.y, uv.x, uv.y, 0.0],
            len: 3,
        }
    }

    /// Bilinear weights in perimeter order: (0,0), (1,0), (1,1), (0,1).
    fn bilinear(uv: Vec2) -> Self {
        let (u, v) = (uv.x, uv.y);
        Self {
            weights: [(1.0 - u) * (1.0 - v), u * (1.0 - v), u * v, (1.0 - u) * v],
            len: 4,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.weights[..self.len]
    }
}

impl Shape {
    /// Number of values a per-vertex attribute needs on this shape.
    pub fn vertex_count(&self) -> usize {
        match self {
            Shape::Triangle { .. } => 3,
            Shape::Quad { .. } | Shape::Sphere { .. } => 4,
        }
    }

    /// Interpolation weights at a parametric coordinate.
    pub fn parametric_weights(&self, uv: Vec2) -> ParametricWeights {
        match self {
            Shape::Triangle { .. } => ParametricWeights::barycentric(uv),
            Shape::Quad { .. } | Shape::Sphere { .. } => ParametricWeights::bilinear(uv),
        }
    }

    /// Returns a description of why the shape cannot be rendered, if it can't.
    pub fn degeneracy(&self) -> Option<&'static str> {
        let finite = |vs: &[Vec3]| vs.iter().all(|v| v.is_finite());
        match *self {
            Shape::Triangle { v0, v1, v2 } => {
                if !finite(&[v0, v1, v2]) {
                    Some("triangle has non-finite vertices")
                } else if (v1 - v0).cross(v2 - v0).length_squared() < 1e-12 {
                    Some("triangle has zero area")
                } else {
                    None
                }
            }
            Shape::Quad { origin, edge_u, edge_v } => {
                if !finite(&[origin, edge_u, edge_v]) {
                    Some("quad has non-finite corners")
                } else if edge_u.cross(edge_v).length_squared() < 1e-12 {
                    Some("quad has zero area")
                } else {
                    None
                }
            }
            Shape::Sphere { center, radius } => {
                if !center.is_finite() || !radius.is_finite() {
                    Some("sphere has non-finite center or radius")
                } else if radius <= 0.0 {
                    Some("sphere radius must be positive")
                } else {
                    None
                }
            }
        }
    }

    /// Axis-aligned bounds of the shape.
    pub fn bounding_box(&self) -> Aabb {
        match *self {
            Shape::Triangle { v0, v1, v2 } => Aabb::enclosing(&[v0, v1, v2]),
            Shape::Quad { origin, edge_u, edge_v } => Aabb::enclosing(&[
                origin,
                origin + edge_u,
                origin + edge_u + edge_v,
                origin + edge_v,
            ]),
            Shape::Sphere { center, radius } => {
                let rvec = Vec3::splat(radius);
                Aabb::from_points(center - rvec, center + rvec)
            }
        }
    }

    /// Intersect a ray with the shape, accepting only distances in `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        match *self {
            Shape::Triangle { v0, v1, v2 } => intersect_triangle(ray, ray_t, v0, v1, v2),
            Shape::Quad { origin, edge_u, edge_v } => intersect_quad(ray, ray_t, origin, edge_u, edge_v),
            Shape::Sphere { center, radius } => intersect_sphere(ray, ray_t, center, radius),
        }
    }
}

/// Möller-Trumbore ray-triangle intersection.
fn intersect_triangle(ray: &Ray, ray_t: Interval, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<ShapeHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.contains(t) {
        return None;
    }

    Some(ShapeHit {
        t,
        uv: Vec2::new(u, v),
    })
}

fn intersect_quad(ray: &Ray, ray_t: Interval, origin: Vec3, edge_u: Vec3, edge_v: Vec3) -> Option<ShapeHit> {
    let n = edge_u.cross(edge_v);
    let denom = n.dot(ray.direction());

    // Ray is parallel to the plane
    if denom.abs() < 1e-8 {
        return None;
    }

    let t = n.dot(origin - ray.origin()) / denom;
    if !ray_t.contains(t) {
        return None;
    }

    // Planar coordinates of the hit point in the (edge_u, edge_v) basis
    let w = n / n.length_squared();
    let planar = ray.at(t) - origin;
    let u = w.dot(planar.cross(edge_v));
    let v = w.dot(edge_u.cross(planar));
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }

    Some(ShapeHit {
        t,
        uv: Vec2::new(u, v),
    })
}

fn intersect_sphere(ray: &Ray, ray_t: Interval, center: Vec3, radius: f32) -> Option<ShapeHit> {
    // Direction is unit length, so the quadratic's `a` term is 1
    let oc = center - ray.origin();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = h - sqrtd;
    if !ray_t.contains(root) {
        root = h + sqrtd;
        if !ray_t.contains(root) {
            return None;
        }
    }

    let outward = (ray.at(root) - center) / radius;
    Some(ShapeHit {
        t: root,
        uv: sphere_uv(outward),
    })
}

/// UV coordinates for a point on the unit sphere.
fn sphere_uv(p: Vec3) -> Vec2 {
    // theta: angle down from +Y, phi: angle around Y from +X
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    Vec2::new(phi / (2.0 * PI), theta / PI)
}
