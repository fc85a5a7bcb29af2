//! Capped cylinder primitive.

use crate::hittable::{Hit, Hittable, EPSILON};
use ember_math::{safe_normalize, Interval, Ray, Vec3};

/// A closed cylinder centred on `center`, extending `height / 2` along its
/// axis in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    center: Vec3,
    radius: f64,
    /// Unit axis
    axis: Vec3,
    height: f64,
    material: String,
}

impl Cylinder {
    /// Create a cylinder from a full-height axis vector.
    ///
    /// The axis is normalized and its length becomes the height.
    pub fn new(center: Vec3, radius: f64, axis: Vec3, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            axis: safe_normalize(axis),
            height: axis.length(),
            material: material.into(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    /// Component of `v` perpendicular to the axis.
    #[inline]
    fn perpendicular(&self, v: Vec3) -> Vec3 {
        v - v.dot(self.axis) * self.axis
    }

    /// Nearest valid hit on the curved surface: (t, normal).
    fn hit_lateral(&self, ray: &Ray, ray_t: Interval) -> Option<(f64, Vec3)> {
        let d_perp = self.perpendicular(ray.direction());
        let rc_perp = self.perpendicular(ray.origin() - self.center);

        let a = d_perp.dot(d_perp);
        if a.abs() < 1e-8 {
            // Ray runs parallel to the axis
            return None;
        }
        let b = 2.0 * d_perp.dot(rc_perp);
        let c = rc_perp.dot(rc_perp) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 1e-8 {
            return None;
        }
        let sqrtd = discriminant.sqrt();
        let half_height = self.height / 2.0;

        [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
            .into_iter()
            .find_map(|t| {
                if !ray_t.surrounds(t) {
                    return None;
                }
                let offset = ray.at(t) - self.center;
                if offset.dot(self.axis).abs() > half_height {
                    return None;
                }
                Some((t, safe_normalize(self.perpendicular(offset))))
            })
    }

    /// Hit on the disc centred at `cap_center` with outward normal `normal`.
    fn hit_cap(
        &self,
        ray: &Ray,
        ray_t: Interval,
        cap_center: Vec3,
        normal: Vec3,
    ) -> Option<(f64, Vec3)> {
        let denom = ray.direction().dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (cap_center - ray.origin()).dot(normal) / denom;
        if t < EPSILON || !ray_t.surrounds(t) {
            return None;
        }
        if (ray.at(t) - cap_center).length() > self.radius {
            return None;
        }
        Some((t, normal))
    }
}

impl Hittable for Cylinder {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let half_axis = self.axis * (self.height / 2.0);
        let top = self.hit_cap(ray, ray_t, self.center + half_axis, self.axis);
        let bottom = self.hit_cap(ray, ray_t, self.center - half_axis, -self.axis);

        // Later candidates only replace earlier ones when strictly nearer
        let (t, normal) = [top, bottom]
            .into_iter()
            .flatten()
            .fold(self.hit_lateral(ray, ray_t), |best, candidate| match best {
                Some(current) if current.0 <= candidate.0 => Some(current),
                _ => Some(candidate),
            })?;

        Some(Hit {
            point: ray.at(t),
            normal,
            t,
            material: &self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Interval {
        Interval::new(EPSILON, f64::INFINITY)
    }

    fn unit_cylinder() -> Cylinder {
        // Radius 1, height 2 along +Y, caps at y = -1 and y = 1
        Cylinder::new(Vec3::ZERO, 1.0, Vec3::new(0.0, 2.0, 0.0), "m")
    }

    #[test]
    fn test_cylinder_axis_normalized() {
        let cylinder = Cylinder::new(Vec3::ZERO, 0.5, Vec3::new(0.0, 0.0, 4.0), "m");
        assert!((cylinder.axis() - Vec3::Z).length() < 1e-12);
        assert!((cylinder.height() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cylinder_lateral_hit() {
        let cylinder = unit_cylinder();
        let ray = Ray::new(Vec3::new(0.0, 0.3, -5.0), Vec3::Z);

        let hit = cylinder.hit(&ray, window()).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert!((hit.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
        assert!(hit.normal.dot(cylinder.axis()).abs() < 1e-9);
    }

    #[test]
    fn test_cylinder_lateral_normals_perpendicular_to_axis() {
        let axis = Vec3::new(1.0, 1.0, 0.5);
        let cylinder = Cylinder::new(Vec3::new(1.0, -1.0, 2.0), 0.75, axis * 3.0, "m");
        let origin = Vec3::new(6.0, -4.0, 2.0);

        let mut lateral = 0;
        for i in 0..20 {
            let target = cylinder.center() + axis.normalize() * (i as f64 * 0.1 - 1.0);
            let ray = Ray::new(origin, target - origin);
            if let Some(hit) = cylinder.hit(&ray, window()) {
                let along = (hit.point - cylinder.center()).dot(cylinder.axis()).abs();
                if along < cylinder.height() / 2.0 - 1e-6 {
                    lateral += 1;
                    assert!(hit.normal.dot(cylinder.axis()).abs() < 1e-9);
                    assert!((hit.normal.length() - 1.0).abs() < 1e-9);
                }
            }
        }
        assert!(lateral > 0);
    }

    #[test]
    fn test_cylinder_cap_hit() {
        let cylinder = unit_cylinder();

        // Straight down onto the top cap
        let ray = Ray::new(Vec3::new(0.2, 5.0, 0.1), -Vec3::Y);
        let hit = cylinder.hit(&ray, window()).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert!((hit.normal - Vec3::Y).length() < 1e-9);

        // Straight up onto the bottom cap
        let ray = Ray::new(Vec3::new(-0.3, -5.0, 0.0), Vec3::Y);
        let hit = cylinder.hit(&ray, window()).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert!((hit.normal + Vec3::Y).length() < 1e-9);
        assert!(hit.normal.cross(cylinder.axis()).length() < 1e-9);
    }

    #[test]
    fn test_cylinder_cap_outside_radius_misses() {
        let cylinder = unit_cylinder();
        let ray = Ray::new(Vec3::new(1.5, 5.0, 0.0), -Vec3::Y);
        assert!(cylinder.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_cylinder_above_caps_misses_lateral() {
        let cylinder = unit_cylinder();
        // Passes beside the infinite cylinder's surface but above the top cap
        let ray = Ray::new(Vec3::new(0.0, 1.5, -5.0), Vec3::Z);
        assert!(cylinder.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_cylinder_from_inside() {
        let cylinder = unit_cylinder();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let hit = cylinder.hit(&ray, window()).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-9);
        assert!((hit.normal - Vec3::X).length() < 1e-9);
    }

    #[test]
    fn test_cylinder_nearest_of_cap_and_side() {
        let cylinder = unit_cylinder();
        // Enters through the top cap, would exit through the side
        let origin = Vec3::new(0.0, 3.0, 0.0);
        let ray = Ray::new(origin, Vec3::new(0.9, -2.5, 0.0) - origin);

        let hit = cylinder.hit(&ray, window()).unwrap();
        assert!((hit.normal - Vec3::Y).length() < 1e-9);
        assert!((hit.point.y - 1.0).abs() < 1e-9);
    }
}
