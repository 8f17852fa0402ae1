//! Blinn-Phong direct illumination.
//!
//! Each point light contributes a diffuse (Lambertian) and a specular
//! (half-vector) term scaled by its power and inverse-square falloff.
//! Results are linear and unclamped.

use facet_core::{Color, Hit, PointLight, Scene, SurfaceHit, SurfaceSample};
use facet_math::Vec3;

use crate::error::RenderResult;

/// Cosine falloff between the light direction and the surface normal,
/// clamped to zero for surfaces facing away.
#[inline]
pub fn lambertian(light_dir: Vec3, normal: Vec3) -> f32 {
    light_dir.dot(normal).max(0.0)
}

/// Blinn-Phong specular factor `max(H·N, 0)^shininess`.
///
/// A view exactly opposite the light has no half vector and no highlight.
#[inline]
pub fn blinn_specular(light_dir: Vec3, view_dir: Vec3, normal: Vec3, shininess: f32) -> f32 {
    let half = (light_dir + view_dir).normalize_or_zero();
    if half == Vec3::ZERO {
        return 0.0;
    }
    half.dot(normal).max(0.0).powf(shininess)
}

/// Shade a surface hit under a set of point lights.
///
/// Emit and ambient colors are added once, after the light loop.
pub fn blinn_phong(hit: &SurfaceHit, surface: &SurfaceSample, lights: &[PointLight], view_origin: Vec3) -> Color {
    let normal = hit.normal.normalize();
    let mut color = Color::ZERO;

    for (index, light) in lights.iter().enumerate() {
        let to_light = light.position - hit.position;
        let distance2 = to_light.length_squared();
        if distance2 == 0.0 {
            log::warn!(
                "Light {} coincides with the hit point on primitive {}; skipping its contribution",
                index,
                hit.primitive_id
            );
            continue;
        }

        let light_dir = to_light / distance2.sqrt();
        let diffuse = lambertian(light_dir, normal);

        // Surfaces facing away from the light never pay for the power term
        let specular = if diffuse > 0.0 {
            let view_dir = (view_origin - hit.position).normalize();
            blinn_specular(light_dir, view_dir, normal, surface.shininess)
        } else {
            0.0
        };

        let radiance = light.intensity() / distance2;
        color += (surface.diffuse_color * diffuse + surface.specular_color * specular) * radiance;
    }

    color + surface.emit_color + surface.ambient_color
}

/// Shades hits against a scene's surfaces and lights.
#[derive(Debug, Clone, Copy)]
pub struct Shader<'a> {
    scene: &'a Scene,
}

impl<'a> Shader<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Color of a hit seen from `view_origin`. Misses are black.
    pub fn shade(&self, hit: &Hit, view_origin: Vec3) -> RenderResult<Color> {
        match hit {
            Hit::Miss => Ok(Color::ZERO),
            Hit::Surface(hit) => {
                let surface = self.scene.surface_at(hit.primitive_id, hit.parametric_coord)?;
                Ok(blinn_phong(hit, &surface, self.scene.lights(), view_origin))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{PrimitiveId, Shape, SurfaceAttributes, SurfacePrimitive};
    use facet_math::Vec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn hit_at_origin(normal: Vec3) -> SurfaceHit {
        SurfaceHit {
            primitive_id: PrimitiveId(0),
            distance: 1.0,
            position: Vec3::ZERO,
            parametric_coord: Vec2::splat(0.5),
            normal,
        }
    }

    fn surface(diffuse: Color, specular: Color, shininess: f32) -> SurfaceSample {
        SurfaceSample {
            diffuse_color: diffuse,
            specular_color: specular,
            shininess,
            normal: Vec3::Z,
            emit_color: Color::ZERO,
            ambient_color: Color::ZERO,
        }
    }

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if let Some(n) = v.try_normalize() {
                return n;
            }
        }
    }

    #[test]
    fn test_lambertian_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10_000 {
            let l = random_unit(&mut rng);
            let n = random_unit(&mut rng);
            let value = lambertian(l, n);
            assert!((0.0..=1.0 + 1e-6).contains(&value), "lambertian = {}", value);
        }
    }

    #[test]
    fn test_overhead_light() {
        let d = 4.0;
        let p = 32.0;
        let lights = [PointLight::white(Vec3::new(0.0, 0.0, d), p)];
        let view = Vec3::new(3.0, 0.0, 1.0);

        let color = blinn_phong(
            &hit_at_origin(Vec3::Z),
            &surface(Color::ONE, Color::ZERO, 10.0),
            &lights,
            view,
        );

        let expected = p / (d * d);
        assert!((color - Color::splat(expected)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_specular_peaks_when_aligned() {
        let lights = [PointLight::white(Vec3::new(0.0, 0.0, 1.0), 1.0)];
        let s = surface(Color::ZERO, Color::ONE, 50.0);

        // View straight down the normal: half vector == normal
        let aligned = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::new(0.0, 0.0, 2.0));
        assert!((aligned - Color::ONE).abs().max_element() < 1e-5);

        // Grazing view: specular falls off sharply
        let grazing = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::new(5.0, 0.0, 0.1));
        assert!(grazing.x < 0.01);
    }

    #[test]
    fn test_back_facing_light_contributes_nothing() {
        let lights = [PointLight::white(Vec3::new(0.0, 0.0, -2.0), 100.0)];
        let s = surface(Color::ONE, Color::ONE, 0.0);

        // shininess 0 would give a specular of 1 if the power term ran
        let color = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_lights_add_and_normal_is_normalized() {
        let one = [PointLight::white(Vec3::new(0.0, 0.0, 2.0), 4.0)];
        let two = [one[0], PointLight::new(Vec3::new(0.0, 0.0, 1.0), Color::X, 1.0)];
        let s = surface(Color::ONE, Color::ZERO, 1.0);
        let view = Vec3::new(0.0, 1.0, 1.0);

        let single = blinn_phong(&hit_at_origin(Vec3::new(0.0, 0.0, 7.0)), &s, &one, view);
        assert!((single - Color::ONE).abs().max_element() < 1e-5);

        let double = blinn_phong(&hit_at_origin(Vec3::Z), &s, &two, view);
        assert!((double - Color::new(2.0, 1.0, 1.0)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_coincident_light_is_skipped() {
        let lights = [
            PointLight::white(Vec3::ZERO, 10.0),
            PointLight::white(Vec3::new(0.0, 0.0, 1.0), 1.0),
        ];
        let s = surface(Color::ONE, Color::ZERO, 1.0);

        let color = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::Z);
        assert!(color.is_finite());
        assert!((color - Color::ONE).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_emit_and_ambient_added_once() {
        let lights = [
            PointLight::white(Vec3::new(0.0, 0.0, -1.0), 1.0),
            PointLight::white(Vec3::new(0.0, 0.0, -2.0), 1.0),
        ];
        let mut s = surface(Color::ONE, Color::ZERO, 1.0);
        s.emit_color = Color::new(0.25, 0.0, 0.0);
        s.ambient_color = Color::new(0.0, 0.0, 0.5);

        // Both lights are behind the surface
        let color = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::Z);
        assert_eq!(color, Color::new(0.25, 0.0, 0.5));
    }

    #[test]
    fn test_specular_without_half_vector_is_zero() {
        for shininess in [0.0, 1.0, 64.0] {
            let value = blinn_specular(Vec3::Z, Vec3::NEG_Z, Vec3::Z, shininess);
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_view_opposite_light_keeps_diffuse_only() {
        // Light in front of the normal, eye behind the surface on the same line
        let lights = [PointLight::white(Vec3::new(0.0, 0.0, 2.0), 8.0)];
        let s = surface(Color::ONE, Color::ONE, 0.0);

        let color = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::new(0.0, 0.0, -10.0));
        assert!(color.is_finite());
        assert!((color - Color::splat(2.0)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_unclamped_output() {
        let lights = [PointLight::white(Vec3::new(0.0, 0.0, 0.1), 1.0)];
        let s = surface(Color::ONE, Color::ZERO, 1.0);

        let color = blinn_phong(&hit_at_origin(Vec3::Z), &s, &lights, Vec3::Z);
        assert!(color.x > 1.0);
    }

    #[test]
    fn test_miss_is_black_for_any_lights() {
        let quad = SurfacePrimitive::new(
            PrimitiveId(0),
            Shape::Quad {
                origin: Vec3::ZERO,
                edge_u: Vec3::X,
                edge_v: Vec3::Y,
            },
            SurfaceAttributes::constant(Color::ONE, Color::ONE, 4.0, Vec3::Z)
                .with_emit_color(Color::ONE)
                .with_ambient_color(Color::ONE),
        )
        .unwrap();
        let scene = Scene::new(
            vec![quad],
            vec![
                PointLight::white(Vec3::new(0.0, 0.0, 1.0), 1000.0),
                PointLight::new(Vec3::new(3.0, 0.0, 1.0), Color::Y, 5.0),
            ],
        )
        .unwrap();

        let shader = Shader::new(&scene);
        assert_eq!(shader.shade(&Hit::Miss, Vec3::Z).unwrap(), Color::ZERO);
    }
}
