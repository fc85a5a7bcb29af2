//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres and capped cylinders lit by a
//! two-colour sky. Materials are matte, metal and refractive. The image is
//! split into tiles rendered in parallel on a rayon pool, each worker
//! drawing from its own seeded random streams.

mod buffer;
mod camera;
mod cylinder;
mod error;
mod hittable;
mod material;
pub mod renderer;
pub mod rng;
mod scene;
mod sphere;
pub mod tile;

pub use buffer::{Pixel, PixelBuffer};
pub use camera::Camera;
pub use cylinder::Cylinder;
pub use error::{RenderError, RenderResult};
pub use hittable::{Hit, Hittable, Object, EPSILON};
pub use material::{Color, Material, Scatter};
pub use renderer::{
    background_color, render, render_pixel, tone_map, trace, Background, RenderSettings,
    RenderSummary,
};
pub use rng::{WorkerStreams, MAX_THREADS};
pub use scene::Scene;
pub use sphere::Sphere;
pub use tile::{assign_tiles, generate_tiles, render_tile, Tile, TileResult, DEFAULT_TILE_SIZE};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Interval, Ray, Vec3};
