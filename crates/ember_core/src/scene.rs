//! Scene description types.
//!
//! A `SceneDescription` is what the scene file loader produces: named
//! materials plus an ordered list of objects that reference them by name.
//! It carries no intersection logic; the renderer builds its own scene
//! from it.

use ember_math::Vec3;

/// Surface response of a named material.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    /// Lambertian diffuse
    Matte { reflectance: Vec3 },
    /// Mirror with optional fuzz (0 = perfect mirror)
    Metal { reflectance: Vec3, fuzz: f64 },
    /// Clear dielectric with an index of refraction
    Refractive { ior: f64 },
}

/// A material declared in a scene file.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDef {
    pub name: String,
    pub kind: MaterialKind,
}

/// A primitive declared in a scene file.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectDef {
    Sphere {
        center: Vec3,
        radius: f64,
        material: String,
    },
    /// `axis` spans the full height; its length is the cylinder height.
    Cylinder {
        center: Vec3,
        radius: f64,
        axis: Vec3,
        material: String,
    },
}

impl ObjectDef {
    /// Name of the material this object is made of.
    pub fn material(&self) -> &str {
        match self {
            ObjectDef::Sphere { material, .. } | ObjectDef::Cylinder { material, .. } => material,
        }
    }
}

/// Materials and objects in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    pub materials: Vec<MaterialDef>,
    pub objects: Vec<ObjectDef>,
}

impl SceneDescription {
    /// Create an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a material by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDef> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn has_material(&self, name: &str) -> bool {
        self.material(name).is_some()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_lookup() {
        let mut scene = SceneDescription::new();
        scene.materials.push(MaterialDef {
            name: "glass".to_string(),
            kind: MaterialKind::Refractive { ior: 1.5 },
        });

        assert!(scene.has_material("glass"));
        assert!(!scene.has_material("steel"));
        assert_eq!(
            scene.material("glass").map(|m| &m.kind),
            Some(&MaterialKind::Refractive { ior: 1.5 })
        );
    }

    #[test]
    fn test_object_material_name() {
        let cylinder = ObjectDef::Cylinder {
            center: Vec3::ZERO,
            radius: 1.0,
            axis: Vec3::Y,
            material: "red".to_string(),
        };
        assert_eq!(cylinder.material(), "red");
    }
}
