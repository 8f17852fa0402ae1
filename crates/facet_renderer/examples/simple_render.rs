//! Simple Blinn-Phong example.
//!
//! Renders a ground quad with a few shiny spheres and saves to PPM format.

use std::fs::File;
use std::io::{BufWriter, Write};

use facet_core::{PrimitiveId, Shape, SurfaceAttributes, SurfacePrimitive};
use facet_renderer::{
    Camera, Color, PointLight, RenderConfig, RenderedPixels, Renderer, SamplePattern, Scene, ScreenGrid, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    env_logger::init();

    println!("facet - simple Blinn-Phong example");
    println!("==================================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let camera = Camera::new(Vec3::new(0.0, 1.5, 8.0));
    let grid = ScreenGrid::new(Vec3::new(0.0, 1.2, 6.0), Vec3::new(1.6, 0.0, 0.0), Vec3::new(0.0, 0.9, 0.0), 800, 450);
    let config = RenderConfig::default().with_sampling(SamplePattern::quincunx());

    let cells = grid.cells().expect("valid screen grid");
    let renderer = Renderer::new(&scene, camera, config).expect("valid render setup");

    println!(
        "Rendering {}x{} @ {} samples per pixel...",
        grid.width,
        grid.height,
        config.sampling.samples_per_cell()
    );

    let start = std::time::Instant::now();
    let pixels = renderer.render(&cells).expect("render failed");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&grid, &pixels, filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut primitives = Vec::new();

    // Ground
    primitives.push(
        SurfacePrimitive::new(
            PrimitiveId(0),
            Shape::Quad {
                origin: Vec3::new(-20.0, 0.0, 20.0),
                edge_u: Vec3::new(40.0, 0.0, 0.0),
                edge_v: Vec3::new(0.0, 0.0, -40.0),
            },
            SurfaceAttributes::constant(Color::splat(0.5), Color::ZERO, 1.0, Vec3::Y)
                .with_ambient_color(Color::splat(0.03)),
        )
        .expect("valid ground"),
    );

    // Small spheres with random colors and glossiness
    let mut rng = StdRng::seed_from_u64(2024);
    let mut next_id = 1;
    for a in -3..3 {
        for b in -3..3 {
            let center = Vec3::new(
                a as f32 * 1.2 + 0.6 * rng.gen::<f32>(),
                0.35,
                b as f32 * 1.2 + 0.6 * rng.gen::<f32>(),
            );
            let diffuse = Color::new(rng.gen(), rng.gen(), rng.gen()) * 0.8;
            let shininess = 2.0_f32.powf(rng.gen_range(1.0..8.0));

            primitives.push(
                SurfacePrimitive::new(
                    PrimitiveId(next_id),
                    Shape::Sphere { center, radius: 0.35 },
                    // Camera-facing normal; attributes are not derived from geometry
                    SurfaceAttributes::constant(diffuse, Color::splat(0.6), shininess, Vec3::Z),
                )
                .expect("valid sphere"),
            );
            next_id += 1;
        }
    }

    let lights = vec![
        PointLight::white(Vec3::new(3.0, 6.0, 4.0), 120.0),
        PointLight::new(Vec3::new(-4.0, 2.0, 2.0), Color::new(0.3, 0.5, 1.0), 20.0),
    ];

    println!("Created {} primitives", primitives.len());
    Scene::new(primitives, lights).expect("valid scene")
}

fn save_ppm(grid: &ScreenGrid, pixels: &RenderedPixels, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", grid.width, grid.height)?;
    writeln!(writer, "255")?;

    let to_byte = |c: f32| (255.0 * c.max(0.0).sqrt().min(1.0)).round() as u8;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let color = pixels.get(grid.pixel_id(x, y)).unwrap_or(Color::ZERO);
            writeln!(writer, "{} {} {}", to_byte(color.x), to_byte(color.y), to_byte(color.z))?;
        }
    }

    Ok(())
}
