//! Scene file parser.
//!
//! # Supported Syntax
//!
//! - `matte: name r g b`
//! - `metal: name r g b fuzz`
//! - `refractive: name ior`
//! - `sphere: cx cy cz radius material`
//! - `cylinder: cx cy cz radius ax ay az material`
//!
//! Blank lines are skipped. Materials must be declared before the objects
//! that use them.

use std::fs;
use std::path::{Path, PathBuf};

use ember_math::Vec3;
use thiserror::Error;

use crate::scene::{MaterialDef, MaterialKind, ObjectDef, SceneDescription};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("cannot open scene file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown entity: [{0}]")]
    UnknownEntity(String),

    #[error("invalid {entity} parameters\nline: \"{line}\"")]
    InvalidParameters { entity: String, line: String },

    #[error("extra data after {entity} parameters: [{extra}]\nline: \"{line}\"")]
    ExtraData {
        entity: String,
        extra: String,
        line: String,
    },

    #[error("material already exists: [{name}]\nline: \"{line}\"")]
    MaterialExists { name: String, line: String },

    #[error("material not found: [{name}]\nline: \"{line}\"")]
    MaterialNotFound { name: String, line: String },
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Per-line context handed to every entity parser.
struct Line<'a> {
    entity: &'static str,
    tokens: Vec<&'a str>,
    raw: &'a str,
}

impl<'a> Line<'a> {
    fn invalid(&self) -> SceneError {
        SceneError::InvalidParameters {
            entity: self.entity.to_string(),
            line: self.raw.to_string(),
        }
    }

    /// Require exactly `count` tokens.
    fn expect_tokens(&self, count: usize) -> SceneResult<()> {
        if self.tokens.len() < count {
            return Err(self.invalid());
        }
        if let Some(extra) = self.tokens.get(count) {
            return Err(SceneError::ExtraData {
                entity: self.entity.to_string(),
                extra: extra.to_string(),
                line: self.raw.to_string(),
            });
        }
        Ok(())
    }

    fn real(&self, index: usize) -> SceneResult<f64> {
        self.tokens[index]
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid())
    }

    fn vec3(&self, index: usize) -> SceneResult<Vec3> {
        Ok(Vec3::new(
            self.real(index)?,
            self.real(index + 1)?,
            self.real(index + 2)?,
        ))
    }

    fn positive(&self, index: usize) -> SceneResult<f64> {
        self.real(index)
            .ok()
            .filter(|v| *v > 0.0)
            .ok_or_else(|| self.invalid())
    }
}

type EntityParser = fn(&mut SceneDescription, &Line) -> SceneResult<()>;

/// Tag -> (entity name, parser) dispatch table.
const ENTITY_PARSERS: &[(&str, &str, EntityParser)] = &[
    ("matte:", "matte material", parse_matte),
    ("metal:", "metal material", parse_metal),
    ("refractive:", "refractive material", parse_refractive),
    ("sphere:", "sphere", parse_sphere),
    ("cylinder:", "cylinder", parse_cylinder),
];

/// Load a scene file from disk.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<SceneDescription> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let scene = parse_scene(&contents)?;
    log::debug!(
        "Loaded {} materials and {} objects from {}",
        scene.material_count(),
        scene.object_count(),
        path.display()
    );
    Ok(scene)
}

/// Parse scene text into a description.
pub fn parse_scene(contents: &str) -> SceneResult<SceneDescription> {
    let mut scene = SceneDescription::new();

    for raw in contents.lines() {
        let mut tokens = raw.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };

        let (_, entity, parser) = ENTITY_PARSERS
            .iter()
            .find(|(name, _, _)| *name == tag)
            .ok_or_else(|| SceneError::UnknownEntity(tag.to_string()))?;

        let line = Line {
            entity: *entity,
            tokens: tokens.collect(),
            raw,
        };
        parser(&mut scene, &line)?;
    }

    Ok(scene)
}

fn declare_material(
    scene: &mut SceneDescription,
    line: &Line,
    kind: MaterialKind,
) -> SceneResult<()> {
    let name = line.tokens[0];
    if scene.has_material(name) {
        return Err(SceneError::MaterialExists {
            name: name.to_string(),
            line: line.raw.to_string(),
        });
    }
    scene.materials.push(MaterialDef {
        name: name.to_string(),
        kind,
    });
    Ok(())
}

fn referenced_material(scene: &SceneDescription, line: &Line, index: usize) -> SceneResult<String> {
    let name = line.tokens[index];
    if !scene.has_material(name) {
        return Err(SceneError::MaterialNotFound {
            name: name.to_string(),
            line: line.raw.to_string(),
        });
    }
    Ok(name.to_string())
}

fn parse_matte(scene: &mut SceneDescription, line: &Line) -> SceneResult<()> {
    line.expect_tokens(4)?;
    let reflectance = line.vec3(1)?;
    declare_material(scene, line, MaterialKind::Matte { reflectance })
}

fn parse_metal(scene: &mut SceneDescription, line: &Line) -> SceneResult<()> {
    line.expect_tokens(5)?;
    let reflectance = line.vec3(1)?;
    let fuzz = line.real(4)?;
    declare_material(scene, line, MaterialKind::Metal { reflectance, fuzz })
}

fn parse_refractive(scene: &mut SceneDescription, line: &Line) -> SceneResult<()> {
    line.expect_tokens(2)?;
    let ior = line.positive(1)?;
    declare_material(scene, line, MaterialKind::Refractive { ior })
}

fn parse_sphere(scene: &mut SceneDescription, line: &Line) -> SceneResult<()> {
    line.expect_tokens(5)?;
    let center = line.vec3(0)?;
    let radius = line.positive(3)?;
    let material = referenced_material(scene, line, 4)?;
    scene.objects.push(ObjectDef::Sphere {
        center,
        radius,
        material,
    });
    Ok(())
}

fn parse_cylinder(scene: &mut SceneDescription, line: &Line) -> SceneResult<()> {
    line.expect_tokens(8)?;
    let center = line.vec3(0)?;
    let radius = line.positive(3)?;
    let axis = line.vec3(4)?;
    let material = referenced_material(scene, line, 7)?;
    scene.objects.push(ObjectDef::Cylinder {
        center,
        radius,
        axis,
        material,
    });
    Ok(())
}
