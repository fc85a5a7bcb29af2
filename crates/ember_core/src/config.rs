//! Render configuration record and its file format.
//!
//! A configuration file is a list of `key: values` lines. Blank lines are
//! skipped and every recognised key is dispatched through a static table of
//! handlers. Each handler validates the token count and the value range of
//! its key; anything it rejects is reported with the offending line.
//!
//! Keys that never appear keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use ember_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot open configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown configuration key: [{0}]")]
    UnknownKey(String),

    #[error("invalid value for key: [{key}]\nline: \"{line}\"")]
    InvalidValue { key: String, line: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validated render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Aspect ratio as width:height, both positive
    pub aspect_w: u32,
    pub aspect_h: u32,
    /// Image width in pixels; the height is derived from the aspect ratio
    pub image_width: u32,
    /// Gamma used when converting radiance to 8-bit output
    pub gamma: f64,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    /// Up hint used to build the camera basis
    pub camera_north: Vec3,
    /// Vertical field of view in degrees
    pub field_of_view: f64,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub material_rng_seed: u64,
    pub ray_rng_seed: u64,
    /// Sky colour straight up
    pub background_dark_color: Vec3,
    /// Sky colour straight down
    pub background_light_color: Vec3,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aspect_w: 16,
            aspect_h: 9,
            image_width: 1920,
            gamma: 2.2,
            camera_position: Vec3::new(0.0, 0.0, -10.0),
            camera_target: Vec3::ZERO,
            camera_north: Vec3::Y,
            field_of_view: 90.0,
            samples_per_pixel: 20,
            max_depth: 5,
            material_rng_seed: 13,
            ray_rng_seed: 19,
            background_dark_color: Vec3::new(0.25, 0.5, 1.0),
            background_light_color: Vec3::ONE,
        }
    }
}

type Handler = fn(&mut Config, &[&str]) -> Option<()>;

/// Key -> handler dispatch table.
const HANDLERS: &[(&str, Handler)] = &[
    ("aspect_ratio:", set_aspect_ratio),
    ("image_width:", set_image_width),
    ("gamma:", set_gamma),
    ("camera_position:", set_camera_position),
    ("camera_target:", set_camera_target),
    ("camera_north:", set_camera_north),
    ("field_of_view:", set_field_of_view),
    ("samples_per_pixel:", set_samples_per_pixel),
    ("max_depth:", set_max_depth),
    ("material_rng_seed:", set_material_rng_seed),
    ("ray_rng_seed:", set_ray_rng_seed),
    ("background_dark_color:", set_background_dark_color),
    ("background_light_color:", set_background_light_color),
];

impl Config {
    /// Load a configuration file, starting from the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text, starting from the defaults.
    pub fn parse(contents: &str) -> ConfigResult<Self> {
        let mut config = Self::default();

        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let colon = line
                .find(':')
                .ok_or_else(|| ConfigError::UnknownKey(line.to_string()))?;
            let key = line[..=colon].trim();
            let rest = line[colon + 1..].trim();

            let handler = HANDLERS
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, handler)| *handler)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let tokens: Vec<&str> = rest.split_whitespace().collect();
            handler(&mut config, &tokens).ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                line: raw.to_string(),
            })?;
        }

        Ok(config)
    }

    /// Image height derived from the width and aspect ratio (truncated).
    pub fn image_height(&self) -> u32 {
        (f64::from(self.image_width) * f64::from(self.aspect_h) / f64::from(self.aspect_w)) as u32
    }

    /// Re-check the invariants the file format enforces.
    ///
    /// Useful for records built in code rather than loaded from a file.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |key: &str, value: String| ConfigError::InvalidValue {
            key: key.to_string(),
            line: value,
        };

        if self.aspect_w == 0 || self.aspect_h == 0 {
            return Err(invalid(
                "aspect_ratio:",
                format!("{} {}", self.aspect_w, self.aspect_h),
            ));
        }
        if self.image_width == 0 {
            return Err(invalid("image_width:", self.image_width.to_string()));
        }
        if !(self.gamma > 0.0) {
            return Err(invalid("gamma:", self.gamma.to_string()));
        }
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel:", "0".to_string()));
        }
        if self.max_depth == 0 {
            return Err(invalid("max_depth:", "0".to_string()));
        }
        if self.material_rng_seed == 0 {
            return Err(invalid("material_rng_seed:", "0".to_string()));
        }
        if self.ray_rng_seed == 0 {
            return Err(invalid("ray_rng_seed:", "0".to_string()));
        }
        if !is_color(self.background_dark_color) {
            return Err(invalid(
                "background_dark_color:",
                format!("{}", self.background_dark_color),
            ));
        }
        if !is_color(self.background_light_color) {
            return Err(invalid(
                "background_light_color:",
                format!("{}", self.background_light_color),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn single<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    match tokens {
        [value] => Some(*value),
        _ => None,
    }
}

fn parse_real(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_positive<T>(token: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    token.parse::<T>().ok().filter(|v| *v > T::default())
}

fn parse_vec3(tokens: &[&str]) -> Option<Vec3> {
    match tokens {
        [x, y, z] => Some(Vec3::new(parse_real(x)?, parse_real(y)?, parse_real(z)?)),
        _ => None,
    }
}

fn is_color(c: Vec3) -> bool {
    [c.x, c.y, c.z].iter().all(|v| (0.0..=1.0).contains(v))
}

fn set_aspect_ratio(config: &mut Config, tokens: &[&str]) -> Option<()> {
    let [w, h] = tokens else { return None };
    config.aspect_w = parse_positive(w)?;
    config.aspect_h = parse_positive(h)?;
    Some(())
}

fn set_image_width(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.image_width = parse_positive(single(tokens)?)?;
    Some(())
}

fn set_gamma(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.gamma = parse_real(single(tokens)?).filter(|g| *g > 0.0)?;
    Some(())
}

fn set_camera_position(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.camera_position = parse_vec3(tokens)?;
    Some(())
}

fn set_camera_target(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.camera_target = parse_vec3(tokens)?;
    Some(())
}

fn set_camera_north(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.camera_north = parse_vec3(tokens)?;
    Some(())
}

fn set_field_of_view(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.field_of_view = parse_real(single(tokens)?)?;
    Some(())
}

fn set_samples_per_pixel(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.samples_per_pixel = parse_positive(single(tokens)?)?;
    Some(())
}

fn set_max_depth(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.max_depth = parse_positive(single(tokens)?)?;
    Some(())
}

fn set_material_rng_seed(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.material_rng_seed = parse_positive(single(tokens)?)?;
    Some(())
}

fn set_ray_rng_seed(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.ray_rng_seed = parse_positive(single(tokens)?)?;
    Some(())
}

fn set_background_dark_color(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.background_dark_color = parse_vec3(tokens).filter(|c| is_color(*c))?;
    Some(())
}

fn set_background_light_color(config: &mut Config, tokens: &[&str]) -> Option<()> {
    config.background_light_color = parse_vec3(tokens).filter(|c| is_color(*c))?;
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
aspect_ratio: 4 3
image_width: 400
gamma: 2.0

camera_position: 1 2 3
camera_target: 0 0 0
camera_north: 0 0 1
field_of_view: 45.5
samples_per_pixel: 8
max_depth: 12
material_rng_seed: 7
ray_rng_seed: 11
background_dark_color: 0.1 0.2 0.3
background_light_color: 0.9 0.8 0.7
"#;
        let config = Config::parse(text).unwrap();

        assert_eq!((config.aspect_w, config.aspect_h), (4, 3));
        assert_eq!(config.image_width, 400);
        assert_eq!(config.image_height(), 300);
        assert_eq!(config.gamma, 2.0);
        assert_eq!(config.camera_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera_north, Vec3::Z);
        assert_eq!(config.field_of_view, 45.5);
        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.material_rng_seed, 7);
        assert_eq!(config.ray_rng_seed, 11);
        assert_eq!(config.background_dark_color, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(config.background_light_color, Vec3::new(0.9, 0.8, 0.7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_keeps_defaults() {
        let config = Config::parse("\n   \n").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.image_height(), 1080);
    }

    #[test]
    fn test_image_height_truncates() {
        let config = Config {
            image_width: 100,
            ..Default::default()
        };
        // 100 * 9 / 16 = 56.25
        assert_eq!(config.image_height(), 56);
    }

    #[test]
    fn test_unknown_key() {
        let err = Config::parse("focal_blur: 3").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "focal_blur:"));

        let err = Config::parse("no colon here").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            "aspect_ratio: 16",
            "aspect_ratio: 16 0",
            "image_width: -5",
            "image_width: 10 20",
            "gamma: 0",
            "gamma: abc",
            "camera_position: 1 2",
            "camera_target: 1 2 3 4",
            "field_of_view: nan",
            "samples_per_pixel: 0",
            "max_depth: 1.5",
            "material_rng_seed: 0",
            "ray_rng_seed: 0",
            "ray_rng_seed: -3",
            "background_dark_color: 0 0 1.5",
            "background_light_color: -0.1 0 0",
        ];
        for line in cases {
            let err = Config::parse(line).unwrap_err();
            match err {
                ConfigError::InvalidValue { line: l, .. } => assert_eq!(l, line),
                other => panic!("{line}: unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_invalid_value_reports_key() {
        let err = Config::parse("  gamma: -1  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for key: [gamma:]\nline: \"  gamma: -1  \""
        );
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        let config = Config {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            background_light_color: Vec3::new(2.0, 0.0, 0.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_bundled_config_parses() {
        let config = Config::parse(include_str!("../../../scenes/preview.cfg")).unwrap();
        assert_eq!(config.image_height(), 270);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.cfg").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
