//! Ember Core - configuration and scene descriptions for the path tracer.
//!
//! This crate provides:
//!
//! - **Configuration**: the `Config` record and its line-based file format
//! - **Scene descriptions**: `SceneDescription` with named materials and
//!   an ordered list of objects, plus the scene file loader
//!
//! Both formats are `key: values` text files parsed through static
//! dispatch tables. Loading never touches the renderer; the renderer turns a
//! `SceneDescription` into its own intersectable scene.
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{load_scene, Config};
//!
//! let config = Config::load("render.cfg")?;
//! let scene = load_scene("spheres.scn")?;
//! println!("{} materials, {} objects",
//!     scene.material_count(),
//!     scene.object_count());
//! ```

pub mod config;
pub mod parser;
pub mod scene;

// Re-export commonly used types
pub use config::{Config, ConfigError, ConfigResult};
pub use parser::{load_scene, parse_scene, SceneError, SceneResult};
pub use scene::{MaterialDef, MaterialKind, ObjectDef, SceneDescription};
