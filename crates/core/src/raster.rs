//! Caller-owned pixel buffers that sources rasterize into.

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::source::Domain;

/// A `width × height` row-major buffer of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<RgbaColor>,
}

impl RasterImage {
    /// Creates a fully transparent image.
    pub fn new(width: usize, height: usize) -> Result<Self, TextureError> {
        Ok(Self::blank(Domain::new(width, height)?))
    }

    /// Creates a fully transparent image covering `domain`.
    pub fn blank(domain: Domain) -> Self {
        Self {
            width: domain.width(),
            height: domain.height(),
            pixels: vec![RgbaColor::TRANSPARENT; domain.area()],
        }
    }

    /// Builds an image from tightly packed RGBA8 bytes.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, TextureError> {
        let domain = Domain::new(width, height)?;
        if bytes.len() != domain.area() * 4 {
            return Err(TextureError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: bytes.len() / 4,
                rhs_h: 1,
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| RgbaColor::rgba8(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The domain this image covers.
    pub fn domain(&self) -> Domain {
        Domain::clamped(self.width, self.height)
    }

    /// Row-major pixel slice.
    pub fn pixels(&self) -> &[RgbaColor] {
        &self.pixels
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// The pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: isize, y: isize) -> Option<RgbaColor> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes a pixel; returns `false` (and writes nothing) outside the image.
    pub fn set(&mut self, x: isize, y: isize, color: RgbaColor) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Packs the image as RGBA8 bytes, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }
}
