//! Surface scattering models.

use ember_core::MaterialKind;
use ember_math::vector::{near_zero, reflect};
use ember_math::{safe_normalize, Vec3};
use rand::RngCore;

use crate::rng::random_in_cube;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Unit outgoing direction
    pub direction: Vec3,
    /// Per-channel attenuation applied to light arriving along `direction`
    pub attenuation: Color,
}

/// How light interacts with a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lambertian (diffuse)
    Matte { reflectance: Color },
    /// Specular reflector; fuzz 0 is a perfect mirror, 1 very rough
    Metal { reflectance: Color, fuzz: f64 },
    /// Clear dielectric (glass, water)
    Refractive { ior: f64 },
}

impl Material {
    pub fn matte(reflectance: Color) -> Self {
        Material::Matte { reflectance }
    }

    /// Create a metal; fuzz is clamped to [0, 1].
    pub fn metal(reflectance: Color, fuzz: f64) -> Self {
        Material::Metal {
            reflectance,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a dielectric with index of refraction `ior`
    /// (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn refractive(ior: f64) -> Self {
        Material::Refractive { ior }
    }

    /// Scatter a ray arriving along `incoming` at a surface with normal
    /// `normal`. Neither input needs to be normalized.
    pub fn scatter(&self, incoming: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Scatter {
        let incoming = safe_normalize(incoming);
        let normal = safe_normalize(normal);

        match *self {
            Material::Matte { reflectance } => {
                let n = facing(incoming, normal);
                let mut direction = n + random_in_cube(rng);

                // Catch degenerate scatter direction
                if near_zero(direction, 1e-8) {
                    direction = n;
                }

                Scatter {
                    direction: safe_normalize(direction),
                    attenuation: reflectance,
                }
            }
            Material::Metal { reflectance, fuzz } => {
                let n = facing(incoming, normal);
                let mirror = safe_normalize(reflect(incoming, n));
                let direction = mirror + fuzz * random_in_cube(rng);

                Scatter {
                    direction: safe_normalize(direction),
                    attenuation: reflectance,
                }
            }
            Material::Refractive { ior } => Scatter {
                direction: refract_or_reflect(incoming, normal, ior),
                attenuation: Color::ONE,
            },
        }
    }
}

impl From<&MaterialKind> for Material {
    fn from(kind: &MaterialKind) -> Self {
        match *kind {
            MaterialKind::Matte { reflectance } => Material::matte(reflectance),
            MaterialKind::Metal { reflectance, fuzz } => Material::metal(reflectance, fuzz),
            MaterialKind::Refractive { ior } => Material::refractive(ior),
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Flip `n` so it faces against `incoming`.
#[inline]
fn facing(incoming: Vec3, n: Vec3) -> Vec3 {
    if incoming.dot(n) > 0.0 {
        -n
    } else {
        n
    }
}

/// Refract through the surface, or mirror on total internal reflection.
fn refract_or_reflect(incoming: Vec3, normal: Vec3, ior: f64) -> Vec3 {
    let front_face = incoming.dot(normal) < 0.0;
    let (n, ratio) = if front_face {
        (normal, 1.0 / ior)
    } else {
        (-normal, ior)
    };

    let cos_theta = (-incoming).dot(n).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    if ratio * sin_theta > 1.0 {
        return safe_normalize(reflect(incoming, n));
    }

    let r_out_perp = ratio * (incoming + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    safe_normalize(r_out_perp + r_out_parallel)
}
