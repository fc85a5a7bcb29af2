//! Pixel buffer stored as three parallel channel arrays.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{RenderError, RenderResult};

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Width x height image with one `Vec<u8>` per channel, row-major.
///
/// Every access is bounds-checked; nothing is clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
}

impl PixelBuffer {
    /// Create a black buffer. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            red: vec![0; len],
            green: vec![0; len],
            blue: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, col: u32, row: u32) -> RenderResult<usize> {
        if col >= self.width || row >= self.height {
            return Err(RenderError::PixelOutOfBounds {
                col,
                row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row as usize * self.width as usize + col as usize)
    }

    /// Set the pixel at (`col`, `row`).
    pub fn set_pixel(&mut self, col: u32, row: u32, pixel: Pixel) -> RenderResult<()> {
        let i = self.index(col, row)?;
        self.red[i] = pixel.r;
        self.green[i] = pixel.g;
        self.blue[i] = pixel.b;
        Ok(())
    }

    /// Get the pixel at (`col`, `row`).
    pub fn get_pixel(&self, col: u32, row: u32) -> RenderResult<Pixel> {
        let i = self.index(col, row)?;
        Ok(Pixel::new(self.red[i], self.green[i], self.blue[i]))
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.red
            .iter()
            .zip(&self.green)
            .zip(&self.blue)
            .map(|((&r, &g), &b)| Pixel::new(r, g, b))
    }

    /// Interleaved RGB bytes (for display or saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.red.len() * 3);
        for pixel in self.pixels() {
            bytes.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
        }
        bytes
    }

    /// Write an ASCII PPM (P3) image.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> RenderResult<()> {
        write!(writer, "P3\n{} {}\n255\n", self.width, self.height)?;
        for pixel in self.pixels() {
            writeln!(writer, "{} {} {}", pixel.r, pixel.g, pixel.b)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save to `path`. `.ppm` writes ASCII P3; other extensions are encoded
    /// by the `image` crate.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let file = File::create(path)?;
            self.write_ppm(BufWriter::new(file))?;
        } else {
            image::save_buffer(
                path,
                &self.to_rgb8(),
                self.width,
                self.height,
                image::ColorType::Rgb8,
            )?;
        }

        log::debug!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_black() {
        let buffer = PixelBuffer::new(3, 2).unwrap();
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert!(buffer.pixels().all(|p| p == Pixel::default()));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 5),
            Err(RenderError::EmptyImage { width: 0, height: 5 })
        ));
        assert!(PixelBuffer::new(5, 0).is_err());
    }

    #[test]
    fn test_set_get_pixel() {
        let mut buffer = PixelBuffer::new(4, 3).unwrap();
        buffer.set_pixel(3, 2, Pixel::new(10, 20, 30)).unwrap();

        assert_eq!(buffer.get_pixel(3, 2).unwrap(), Pixel::new(10, 20, 30));
        assert_eq!(buffer.get_pixel(2, 3 - 1).unwrap(), Pixel::default());
    }

    #[test]
    fn test_bounds_checked() {
        let mut buffer = PixelBuffer::new(4, 3).unwrap();

        assert!(matches!(
            buffer.set_pixel(4, 0, Pixel::default()),
            Err(RenderError::PixelOutOfBounds { col: 4, row: 0, .. })
        ));
        assert!(buffer.set_pixel(0, 3, Pixel::default()).is_err());
        assert!(buffer.get_pixel(4, 2).is_err());
        assert!(buffer.get_pixel(0, 3).is_err());
    }

    #[test]
    fn test_to_rgb8_interleaves() {
        let mut buffer = PixelBuffer::new(2, 1).unwrap();
        buffer.set_pixel(0, 0, Pixel::new(1, 2, 3)).unwrap();
        buffer.set_pixel(1, 0, Pixel::new(4, 5, 6)).unwrap();
        assert_eq!(buffer.to_rgb8(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_write_ppm() {
        let mut buffer = PixelBuffer::new(2, 2).unwrap();
        buffer.set_pixel(1, 0, Pixel::new(255, 0, 0)).unwrap();
        buffer.set_pixel(0, 1, Pixel::new(0, 128, 7)).unwrap();

        let mut out = Vec::new();
        buffer.write_ppm(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 2\n255\n0 0 0\n255 0 0\n0 128 7\n0 0 0\n");
    }

    #[test]
    fn test_save_ppm_and_png() {
        let dir = std::env::temp_dir().join(format!("ember_buffer_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut buffer = PixelBuffer::new(3, 2).unwrap();
        buffer.set_pixel(2, 1, Pixel::new(9, 8, 7)).unwrap();

        let ppm = dir.join("out.PPM");
        buffer.save(&ppm).unwrap();
        let text = std::fs::read_to_string(&ppm).unwrap();
        assert!(text.starts_with("P3\n3 2\n255\n"));
        assert!(text.ends_with("9 8 7\n"));

        let png = dir.join("out.png");
        buffer.save(&png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [9, 8, 7]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
