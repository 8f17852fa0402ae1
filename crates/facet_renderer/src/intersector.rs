//! Nearest-hit queries with a far clip.

use facet_core::{Hit, Scene};
use facet_math::{Interval, Ray};

use crate::error::{RenderError, RenderResult};

/// Wraps the scene's nearest-hit query and treats anything farther than
/// `max_distance` along the ray as a miss.
#[derive(Debug, Clone, Copy)]
pub struct Intersector<'a> {
    scene: &'a Scene,
    range: Interval,
}

impl<'a> Intersector<'a> {
    pub fn new(scene: &'a Scene, max_distance: f32) -> RenderResult<Self> {
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(RenderError::InvalidMaxDistance(max_distance));
        }
        Ok(Self {
            scene,
            range: Interval::new(0.0, max_distance),
        })
    }

    pub fn trace(&self, ray: &Ray) -> Hit {
        self.scene.nearest_intersection(ray, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{PrimitiveId, Shape, SurfaceAttributes, SurfacePrimitive};
    use facet_math::Vec3;

    fn scene_with_quad_at(z: f32) -> Scene {
        let quad = SurfacePrimitive::new(
            PrimitiveId(0),
            Shape::Quad {
                origin: Vec3::new(-1.0, -1.0, z),
                edge_u: Vec3::new(2.0, 0.0, 0.0),
                edge_v: Vec3::new(0.0, 2.0, 0.0),
            },
            SurfaceAttributes::constant(Vec3::ONE, Vec3::ZERO, 1.0, Vec3::Z),
        )
        .unwrap();
        Scene::new(vec![quad], vec![]).unwrap()
    }

    #[test]
    fn test_far_clip_turns_hits_into_misses() {
        let scene = scene_with_quad_at(-50.0);
        let ray = Ray::try_new(Vec3::ZERO, Vec3::NEG_Z).unwrap();

        let near = Intersector::new(&scene, 10.0).unwrap();
        assert!(near.trace(&ray).is_miss());

        let far = Intersector::new(&scene, 100.0).unwrap();
        let hit = far.trace(&ray);
        assert!((hit.surface().unwrap().distance - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_hits_behind_the_origin_are_ignored() {
        let scene = scene_with_quad_at(5.0);
        let ray = Ray::try_new(Vec3::ZERO, Vec3::NEG_Z).unwrap();

        let intersector = Intersector::new(&scene, 100.0).unwrap();
        assert!(intersector.trace(&ray).is_miss());
    }

    #[test]
    fn test_invalid_max_distance() {
        let scene = scene_with_quad_at(0.0);

        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Intersector::new(&scene, bad),
                Err(RenderError::InvalidMaxDistance(_))
            ));
        }
    }
}
