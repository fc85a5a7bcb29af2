//! Renderable scene: material table plus object list.

use std::collections::HashMap;

use ember_core::{ObjectDef, SceneDescription};
use ember_math::{Interval, Ray};

use crate::hittable::{Hit, Hittable, Object, EPSILON};
use crate::{Cylinder, Material, RenderError, RenderResult, Sphere};

/// Named materials and the objects that use them.
///
/// Intersection is a linear scan over every object.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: HashMap<String, Material>,
    objects: Vec<Object>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a loaded description.
    pub fn from_description(description: &SceneDescription) -> RenderResult<Self> {
        let mut scene = Self::new();

        for def in &description.materials {
            scene.add_material(def.name.clone(), Material::from(&def.kind))?;
        }

        for def in &description.objects {
            let object: Object = match def {
                ObjectDef::Sphere {
                    center,
                    radius,
                    material,
                } => Sphere::new(*center, *radius, material.clone()).into(),
                ObjectDef::Cylinder {
                    center,
                    radius,
                    axis,
                    material,
                } => Cylinder::new(*center, *radius, *axis, material.clone()).into(),
            };
            scene.add_object(object)?;
        }

        log::debug!(
            "Built scene with {} materials and {} objects",
            scene.material_count(),
            scene.object_count()
        );
        Ok(scene)
    }

    /// Register a material under a unique name.
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        material: Material,
    ) -> RenderResult<()> {
        let name = name.into();
        if self.materials.contains_key(&name) {
            return Err(RenderError::DuplicateMaterial(name));
        }
        self.materials.insert(name, material);
        Ok(())
    }

    /// Add an object whose material is already registered.
    pub fn add_object(&mut self, object: impl Into<Object>) -> RenderResult<()> {
        let object = object.into();
        if !self.materials.contains_key(object.material()) {
            return Err(RenderError::MaterialNotFound(object.material().to_string()));
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn material_by_name(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Nearest hit along the ray beyond `EPSILON`.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.hit(ray, Interval::new(EPSILON, f64::INFINITY))
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let mut closest: Option<Hit<'_>> = None;

        for object in &self.objects {
            let max = closest.map_or(ray_t.max, |hit| hit.t);
            if let Some(hit) = object.hit(ray, Interval::new(ray_t.min, max)) {
                closest = Some(hit);
            }
        }

        closest
    }
}
