//! Image tiling and the static tile-to-worker schedule.
//!
//! The image is cut into a row-major grid of tiles. Before any parallel
//! work starts, worker `w` of `n` is handed tiles `w, w + n, w + 2n, ...`
//! and renders them in that order with its own streams, so the pixels each
//! stream feeds never depend on thread scheduling.

use crate::renderer::{render_pixel, RenderSettings};
use crate::rng::WorkerStreams;
use crate::{Camera, Pixel, PixelBuffer, RenderResult, Scene};

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Rectangle of pixels `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Cut a `width` x `height` image into tiles of at most `tile_size` square,
/// in row-major order. Edge tiles are clipped; a size of 1 gives one tile
/// per pixel.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let step = tile_size.max(1);

    (0..height)
        .step_by(step as usize)
        .flat_map(|y| {
            (0..width)
                .step_by(step as usize)
                .map(move |x| Tile::new(x, y, step.min(width - x), step.min(height - y)))
        })
        .collect()
}

/// Deal tiles round-robin to `workers` workers.
///
/// Entry `w` of the result lists worker `w`'s tiles in render order.
pub fn assign_tiles(tiles: &[Tile], workers: usize) -> Vec<Vec<Tile>> {
    let workers = workers.max(1);
    (0..workers)
        .map(|w| tiles.iter().skip(w).step_by(workers).copied().collect())
        .collect()
}

/// Pixels of one finished tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    /// Row-major within the tile
    pub pixels: Vec<Pixel>,
}

impl TileResult {
    pub fn new(tile: Tile, pixels: Vec<Pixel>) -> Self {
        Self { tile, pixels }
    }

    /// Copy the tile's pixels into the buffer.
    pub fn write_into(&self, buffer: &mut PixelBuffer) -> RenderResult<()> {
        let width = self.tile.width as usize;
        for (i, pixel) in self.pixels.iter().enumerate() {
            let col = self.tile.x + (i % width) as u32;
            let row = self.tile.y + (i / width) as u32;
            buffer.set_pixel(col, row, *pixel)?;
        }
        Ok(())
    }
}

/// Render every pixel of a tile, row by row, drawing from `streams`.
pub fn render_tile(
    tile: &Tile,
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    streams: &mut WorkerStreams,
) -> RenderResult<TileResult> {
    let mut pixels = Vec::with_capacity(tile.pixel_count());

    for row in tile.y..tile.y + tile.height {
        for col in tile.x..tile.x + tile.width {
            pixels.push(render_pixel(scene, camera, settings, row, col, streams)?);
        }
    }

    log::trace!("Tile at ({}, {}) done", tile.x, tile.y);
    Ok(TileResult::new(*tile, pixels))
}
