//! Random streams for rendering.
//!
//! Two master generators (ray and material) are seeded from the
//! configuration and expanded into one seed per worker slot before any
//! parallel work starts. Each worker then owns a `WorkerStreams` pair and
//! passes it by `&mut` into every call that draws randomness.

use ember_math::Vec3;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Upper bound on worker threads (and so on seed slots).
pub const MAX_THREADS: usize = 64;

/// The two generators owned by one worker.
#[derive(Debug, Clone)]
pub struct WorkerStreams {
    /// Sub-pixel jitter
    pub ray: StdRng,
    /// Material scattering
    pub material: StdRng,
}

impl WorkerStreams {
    pub fn new(ray_seed: u64, material_seed: u64) -> Self {
        Self {
            ray: StdRng::seed_from_u64(ray_seed),
            material: StdRng::seed_from_u64(material_seed),
        }
    }
}

/// Expand a master seed into `count` worker seeds.
pub fn generate_seeds(master_seed: u64, count: usize) -> Vec<u64> {
    let mut master = StdRng::seed_from_u64(master_seed);
    (0..count).map(|_| master.gen::<u64>()).collect()
}

/// Sub-pixel jitter in [-0.5, 0.5), x drawn before y.
pub fn pixel_jitter(rng: &mut dyn RngCore) -> (f64, f64) {
    let dist = Uniform::new(-0.5, 0.5);
    let jx = dist.sample(rng);
    let jy = dist.sample(rng);
    (jx, jy)
}

/// Vector with components drawn from U[-1, 1] in x, y, z order.
pub fn random_in_cube(rng: &mut dyn RngCore) -> Vec3 {
    let dist = Uniform::new_inclusive(-1.0, 1.0);
    let x = dist.sample(rng);
    let y = dist.sample(rng);
    let z = dist.sample(rng);
    Vec3::new(x, y, z)
}
