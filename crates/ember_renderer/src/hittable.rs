//! Hittable trait and Hit record for ray-object intersection.

use ember_math::{Interval, Ray, Vec3};

use crate::{Cylinder, Sphere};

/// Minimum ray parameter accepted as a hit; keeps secondary rays from
/// re-hitting the surface they leave.
pub const EPSILON: f64 = 1e-3;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Outward surface normal (not oriented against the ray)
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Name of the material at the intersection
    pub material: &'a str,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest hit with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>>;
}

/// Any primitive a scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Sphere(Sphere),
    Cylinder(Cylinder),
}

impl Object {
    /// Name of the material this object is made of.
    pub fn material(&self) -> &str {
        match self {
            Object::Sphere(sphere) => sphere.material(),
            Object::Cylinder(cylinder) => cylinder.material(),
        }
    }
}

impl Hittable for Object {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        match self {
            Object::Sphere(sphere) => sphere.hit(ray, ray_t),
            Object::Cylinder(cylinder) => cylinder.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Object::Sphere(sphere)
    }
}

impl From<Cylinder> for Object {
    fn from(cylinder: Cylinder) -> Self {
        Object::Cylinder(cylinder)
    }
}
