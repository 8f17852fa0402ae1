//! `facet` - render a JSON scene file to PNG or JSON.

mod image_buffer;
mod scene_file;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use facet_renderer::Renderer;

use crate::image_buffer::{save_json, ImageBuffer};
use crate::scene_file::SceneFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Clamped, gamma-corrected 8-bit image (needs a grid screen)
    Png,
    /// Raw linear pixel colors keyed by pixel id
    Json,
}

/// Point-sampled Blinn-Phong renderer.
#[derive(Debug, Parser)]
#[command(name = "facet", version, about)]
struct Args {
    /// Scene file (JSON)
    scene: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Corner sample placement, 0 (center) to 1 (corners)
    #[arg(long)]
    corner_bias: Option<f32>,

    /// Skip the center sample
    #[arg(long)]
    no_center: bool,

    /// Far clip distance for rays
    #[arg(long)]
    max_distance: Option<f32>,

    /// Render on the calling thread only
    #[arg(long)]
    serial: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let file = SceneFile::load(&args.scene)?;

    let mut config = file.render;
    if let Some(bias) = args.corner_bias {
        config.sampling.corner_bias = bias;
    }
    if args.no_center {
        config.sampling.include_center = false;
    }
    if let Some(distance) = args.max_distance {
        config.max_ray_distance = distance;
    }

    let grid = match args.format {
        OutputFormat::Png => Some(
            file.screen
                .grid()
                .context("PNG output needs a grid screen; use --format json for explicit cells")?,
        ),
        OutputFormat::Json => None,
    };

    let start = Instant::now();
    let scene = file
        .scene
        .into_scene()
        .with_context(|| format!("Invalid scene in {}", args.scene.display()))?;
    let cells = file.screen.cells()?;
    log::info!("Scene loaded in {:?}", start.elapsed());

    let renderer = Renderer::new(&scene, file.camera, config)?;
    let rendered = if args.serial {
        renderer.render_serial(&cells)?
    } else {
        renderer.render(&cells)?
    };

    match grid {
        Some(grid) => ImageBuffer::from_grid(grid, &rendered)?.save_png(&args.output)?,
        None => save_json(&rendered, &args.output)?,
    }

    log::info!("Saved {} pixels to {}", rendered.len(), args.output.display());
    Ok(())
}
