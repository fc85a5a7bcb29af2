//! `ember` - render a scene file to an image.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::{load_scene, Config};
use ember_renderer::{render, Camera, PixelBuffer, RenderSettings, Scene};

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    log::info!(
        "Config: {}x{}, {} spp, depth {}, fov {}",
        config.image_width,
        config.image_height(),
        config.samples_per_pixel,
        config.max_depth,
        config.field_of_view
    );

    let description = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let scene = Scene::from_description(&description).context("Failed to build scene")?;
    log::info!(
        "Scene: {} materials, {} objects",
        scene.material_count(),
        scene.object_count()
    );

    let camera = Camera::from_config(&config).context("Failed to set up camera")?;
    let mut settings = RenderSettings::from(&config).with_tile_size(args.tile_size);
    if let Some(threads) = args.threads {
        settings = settings.with_threads(usize::from(threads));
    }

    let mut buffer = PixelBuffer::new(camera.image_width(), camera.image_height())
        .context("Failed to allocate image")?;
    let summary = render(&scene, &camera, &settings, &mut buffer).context("Render failed")?;
    log::info!(
        "Rendered {} pixels in {} tiles on {} workers in {:.2?}",
        summary.pixels,
        summary.tiles,
        summary.workers,
        summary.elapsed
    );

    buffer
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
