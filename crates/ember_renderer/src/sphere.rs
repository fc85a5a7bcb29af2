//! Sphere primitive for ray tracing.

use crate::hittable::{Hit, Hittable};
use ember_math::{safe_normalize, Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: String,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f64, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &str {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let rc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * ray.direction().dot(rc);
        let c = rc.dot(rc) - self.radius * self.radius;

        // Grazing tangents count as misses
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 1e-8 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-b - sqrtd) / (2.0 * a);
        if !ray_t.surrounds(root) {
            root = (-b + sqrtd) / (2.0 * a);
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        Some(Hit {
            point,
            normal: safe_normalize(point - self.center),
            t: root,
            material: &self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::EPSILON;

    fn window() -> Interval {
        Interval::new(EPSILON, f64::INFINITY)
    }

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, "grey");
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = sphere.hit(&ray, window()).unwrap();
        assert!((hit.t - 0.5).abs() < 1e-9); // |O - C| - r
        assert!(((hit.point - sphere.center()).length() - 0.5).abs() < 1e-9);
        assert!((hit.normal - Vec3::Z).length() < 1e-9);
        assert_eq!(hit.material, "grey");
    }

    #[test]
    fn test_sphere_hit_toward_center_offset() {
        let center = Vec3::new(3.0, -2.0, 7.0);
        let origin = Vec3::new(-4.0, 1.0, -5.0);
        let sphere = Sphere::new(center, 1.25, "m");
        let ray = Ray::new(origin, center - origin);

        let hit = sphere.hit(&ray, window()).unwrap();
        let expected = (origin - center).length() - 1.25;
        assert!((hit.t - expected).abs() < 1e-9);
        assert!(((hit.point - center).length() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_hit_from_inside_reports_exit() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, "glass");
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::X);

        let hit = sphere.hit(&ray, window()).unwrap();
        assert!((hit.t - 1.5).abs() < 1e-9);
        assert!((hit.point - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-9);
        // Normal stays outward
        assert!((hit.normal - Vec3::X).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, "grey");

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, window()).is_none());

        // Sphere entirely behind the origin
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(sphere.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_sphere_tangent_is_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, "m");
        let ray = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z);
        assert!(sphere.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_sphere_respects_window_max() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, "m");
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(sphere.hit(&ray, Interval::new(EPSILON, 5.0)).is_none());
        assert!(sphere.hit(&ray, Interval::new(EPSILON, 9.5)).is_some());
    }
}
