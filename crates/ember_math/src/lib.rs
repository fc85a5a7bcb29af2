//! Ember math - vector algebra, rays and intervals.
//!
//! Vectors are glam's double precision `DVec3`, re-exported as [`Vec3`].
//! The helpers in [`vector`] add the guarded operations the renderer relies
//! on: normalization that leaves the zero vector alone and scalar division
//! that reports a zero divisor instead of producing infinities.

pub use glam;
pub use glam::DVec3 as Vec3;

mod interval;
mod ray;
pub mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{checked_div, safe_normalize, MathError, MathResult};
