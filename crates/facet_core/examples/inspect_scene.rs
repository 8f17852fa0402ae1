//! Example: Load and inspect a JSON scene description.
//!
//! Run with: cargo run --example inspect_scene -- demos/two_quads.json

use std::env;

use facet_core::{load_scene, Shape};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene-json>");
        return;
    }

    let path = &args[1];
    println!("Loading scene: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\nPrimitives: {}", scene.primitive_count());
            println!("Lights: {}", scene.lights().len());
            if scene.primitive_count() > 0 {
                let bounds = scene.bounds();
                println!(
                    "Bounds: x [{}, {}], y [{}, {}], z [{}, {}]",
                    bounds.x.min, bounds.x.max, bounds.y.min, bounds.y.max, bounds.z.min, bounds.z.max
                );
            }

            println!("\n--- Primitives ---");
            for prim in scene.primitives() {
                let kind = match prim.shape() {
                    Shape::Triangle { .. } => "triangle",
                    Shape::Quad { .. } => "quad",
                    Shape::Sphere { .. } => "sphere",
                };
                let bounds = prim.bounding_box();
                println!(
                    "  [{}] {} - centroid {:?}",
                    prim.id(),
                    kind,
                    bounds.centroid()
                );
            }

            println!("\n--- Lights ---");
            for (i, light) in scene.lights().iter().enumerate() {
                println!(
                    "  [{}] at {:?}, color {:?}, power {}",
                    i, light.position, light.color, light.power
                );
            }
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
