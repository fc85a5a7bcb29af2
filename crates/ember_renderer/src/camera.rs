//! Camera for ray generation.

use ember_core::Config;
use ember_math::{checked_div, Ray, Vec3};

use crate::{RenderError, RenderResult};

/// Pinhole camera mapping pixel coordinates to world-space rays.
///
/// All geometry is derived at construction; generating a ray is pure.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    image_width: u32,
    image_height: u32,
    position: Vec3,
    /// Centre of pixel (0, 0) on the projection window
    pixel00_loc: Vec3,
    /// Offset to the next column
    pixel_delta_x: Vec3,
    /// Offset to the next row
    pixel_delta_y: Vec3,
}

impl Camera {
    /// Create a camera at `position` looking at `target`.
    ///
    /// `north` is the up hint and `fov` the vertical field of view in
    /// degrees. The projection window sits on the target.
    pub fn new(
        position: Vec3,
        target: Vec3,
        north: Vec3,
        fov: f64,
        image_width: u32,
        image_height: u32,
    ) -> RenderResult<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(RenderError::DegenerateCamera(format!(
                "image is {image_width}x{image_height}"
            )));
        }
        if !(fov > 0.0 && fov < 180.0) {
            return Err(RenderError::DegenerateCamera(format!(
                "field of view {fov} is outside (0, 180)"
            )));
        }

        let view = position - target;
        let focal_distance = view.length();
        if focal_distance < 1e-12 {
            return Err(RenderError::DegenerateCamera(
                "camera position and target coincide".to_string(),
            ));
        }

        // Projection window size at the target
        let window_height = 2.0 * focal_distance * (fov.to_radians() / 2.0).tan();
        let window_width = window_height * f64::from(image_width) / f64::from(image_height);

        // Camera basis vectors
        let w = view / focal_distance;
        let side = north.cross(w);
        if side.length() < 1e-12 {
            return Err(RenderError::DegenerateCamera(
                "north is parallel to the view direction".to_string(),
            ));
        }
        let u = side.normalize();
        let v = w.cross(u);

        let horizontal = window_width * u;
        let vertical = -window_height * v;
        let pixel_delta_x = checked_div(horizontal, f64::from(image_width))?;
        let pixel_delta_y = checked_div(vertical, f64::from(image_height))?;

        let pixel00_loc = position - view + 0.5 * (pixel_delta_x + pixel_delta_y)
            - 0.5 * (horizontal + vertical);

        Ok(Self {
            image_width,
            image_height,
            position,
            pixel00_loc,
            pixel_delta_x,
            pixel_delta_y,
        })
    }

    /// Build the camera described by a configuration.
    ///
    /// The record is validated first, so one built in code with a zero
    /// aspect term or an out-of-range colour is rejected here.
    pub fn from_config(config: &Config) -> RenderResult<Self> {
        config.validate()?;
        Self::new(
            config.camera_position,
            config.camera_target,
            config.camera_north,
            config.field_of_view,
            config.image_width,
            config.image_height(),
        )
    }

    /// Ray through pixel (`row`, `col`) offset by a sub-pixel jitter in
    /// [-0.5, 0.5].
    pub fn generate_ray(&self, row: u32, col: u32, jitter_x: f64, jitter_y: f64) -> Ray {
        let pixel_sample = self.pixel00_loc
            + (f64::from(col) + jitter_x) * self.pixel_delta_x
            + (f64::from(row) + jitter_y) * self.pixel_delta_y;

        Ray::new(self.position, pixel_sample - self.position)
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }
}
