//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative ray tracing with configurable depth
//! - A two-colour sky background
//! - Gamma correction
//! - Anti-aliasing via jittered multi-sampling
//! - Parallel tile rendering with per-worker random streams

use std::time::{Duration, Instant};

use ember_core::Config;
use ember_math::{checked_div, Interval, Ray};
use rand::RngCore;
use rayon::prelude::*;

use crate::rng::{generate_seeds, pixel_jitter, WorkerStreams, MAX_THREADS};
use crate::tile::{assign_tiles, generate_tiles, render_tile, TileResult, DEFAULT_TILE_SIZE};
use crate::{Camera, Color, Pixel, PixelBuffer, RenderError, RenderResult, Scene};

/// Sky colours blended by the vertical component of a ray's direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    /// Colour looking straight down
    pub light: Color,
    /// Colour looking straight up
    pub dark: Color,
}

/// Render settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub gamma: f64,
    pub background: Background,
    /// Master seed for sub-pixel jitter
    pub ray_seed: u64,
    /// Master seed for material scattering
    pub material_seed: u64,
    /// Worker threads; capped at `MAX_THREADS`
    pub max_threads: usize,
    /// Tile edge in pixels
    pub tile_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RenderSettings {
    fn from(config: &Config) -> Self {
        let max_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(MAX_THREADS);

        Self {
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            gamma: config.gamma,
            background: Background {
                light: config.background_light_color,
                dark: config.background_dark_color,
            },
            ray_seed: config.ray_rng_seed,
            material_seed: config.material_rng_seed,
            max_threads,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl RenderSettings {
    /// Set the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    /// Set the tile edge.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Workers actually used.
    pub fn worker_count(&self) -> usize {
        self.max_threads.clamp(1, MAX_THREADS)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if !(self.gamma > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "gamma must be positive, got {}",
                self.gamma
            )));
        }
        if self.tile_size == 0 {
            return Err(RenderError::InvalidSettings(
                "tile_size must be at least 1".to_string(),
            ));
        }
        if self.max_threads == 0 {
            return Err(RenderError::InvalidSettings(
                "max_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a finished render did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    pub tiles: usize,
    pub workers: usize,
    pub pixels: usize,
    pub elapsed: Duration,
}

/// Sky colour seen along `ray`.
pub fn background_color(ray: &Ray, background: &Background) -> Color {
    let m = (ray.direction().y + 1.0) / 2.0;
    background.light * (1.0 - m) + background.dark * m
}

/// Compute the color seen by a ray.
///
/// Follows the ray through up to `depth` scattering events, carrying the
/// product of attenuations. Running out of depth yields black, as does
/// hitting an object whose material is missing.
pub fn trace(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..depth {
        let Some(hit) = scene.intersect(&ray) else {
            return throughput * background_color(&ray, background);
        };
        let Some(material) = scene.material_by_name(hit.material) else {
            return Color::ZERO;
        };

        let scatter = material.scatter(ray.direction(), hit.normal, rng);
        throughput *= scatter.attenuation;
        ray = Ray::new(hit.point, scatter.direction);
    }

    Color::ZERO
}

/// Gamma-correct a linear colour and quantize it to 8 bits.
pub fn tone_map(color: Color, gamma: f64) -> Pixel {
    let channel = |c: f64| (Interval::UNIT.clamp(c.powf(1.0 / gamma)) * 255.99) as u8;
    Pixel::new(channel(color.x), channel(color.y), channel(color.z))
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    row: u32,
    col: u32,
    streams: &mut WorkerStreams,
) -> RenderResult<Pixel> {
    let mut pixel_color = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        let (jx, jy) = pixel_jitter(&mut streams.ray);
        let ray = camera.generate_ray(row, col, jx, jy);
        pixel_color += trace(
            &ray,
            scene,
            settings.max_depth,
            &settings.background,
            &mut streams.material,
        );
    }

    // Average the samples
    let average = checked_div(pixel_color, f64::from(settings.samples_per_pixel))?;
    Ok(tone_map(average, settings.gamma))
}

/// Render the scene into `buffer`.
///
/// Tiles are dealt round-robin to the workers before any rendering starts.
/// Each worker seeds its streams from its own seed pair and renders its
/// tiles in order, so for a fixed worker count, tile size and seeds the
/// output is bit-identical from run to run.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    buffer: &mut PixelBuffer,
) -> RenderResult<RenderSummary> {
    settings.validate()?;

    if buffer.width() != camera.image_width() || buffer.height() != camera.image_height() {
        return Err(RenderError::DimensionMismatch {
            buffer_width: buffer.width(),
            buffer_height: buffer.height(),
            camera_width: camera.image_width(),
            camera_height: camera.image_height(),
        });
    }

    let workers = settings.worker_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("ember-worker-{i}"))
        .build()?;

    let ray_seeds = generate_seeds(settings.ray_seed, workers);
    let material_seeds = generate_seeds(settings.material_seed, workers);

    let tiles = generate_tiles(buffer.width(), buffer.height(), settings.tile_size);
    let assignments = assign_tiles(&tiles, workers);
    log::debug!(
        "Rendering {}x{} with {} workers, {} tiles of {}px, {} spp, depth {}",
        buffer.width(),
        buffer.height(),
        workers,
        tiles.len(),
        settings.tile_size,
        settings.samples_per_pixel,
        settings.max_depth
    );

    let start = Instant::now();
    let per_worker: Vec<Vec<TileResult>> = pool.install(|| {
        assignments
            .par_iter()
            .enumerate()
            .map(|(worker, own_tiles)| {
                log::trace!(
                    "Worker {worker}: {} tiles, seeds ({}, {})",
                    own_tiles.len(),
                    ray_seeds[worker],
                    material_seeds[worker]
                );
                let mut streams = WorkerStreams::new(ray_seeds[worker], material_seeds[worker]);
                own_tiles
                    .iter()
                    .map(|tile| render_tile(tile, scene, camera, settings, &mut streams))
                    .collect::<RenderResult<Vec<_>>>()
            })
            .collect::<RenderResult<Vec<_>>>()
    })?;

    let mut summary = RenderSummary {
        tiles: 0,
        workers,
        pixels: 0,
        elapsed: Duration::ZERO,
    };
    for result in per_worker.iter().flatten() {
        result.write_into(buffer)?;
        summary.tiles += 1;
        summary.pixels += result.pixels.len();
    }
    summary.elapsed = start.elapsed();

    log::debug!("Render finished in {:.2?}", summary.elapsed);
    Ok(summary)
}
