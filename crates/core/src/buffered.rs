//! Eager rasterization of an expensive source into a lookup table.

use log::debug;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::source::{ColorSource, Domain};

/// Evaluates a source once at construction and answers queries from memory.
///
/// With `scale > 1` the buffer holds a coarser `ceil(w/scale) × ceil(h/scale)`
/// grid, sampled at `(i * scale, j * scale)` and looked up by flooring, which
/// cheaply downsamples sources too expensive to evaluate at full density.
#[derive(Debug, Clone)]
pub struct BufferedColorSource {
    domain: Domain,
    scale: f64,
    cols: usize,
    rows: usize,
    pixels: Vec<RgbaColor>,
}

impl BufferedColorSource {
    /// Buffers `source` at full density.
    pub fn new(source: &dyn ColorSource) -> Self {
        let domain = source.domain();
        let pixels = (0..domain.area())
            .map(|i| source.sample((i % domain.width()) as f64, (i / domain.width()) as f64))
            .collect();
        debug!("buffered {}x{} source", domain.width(), domain.height());
        Self {
            domain,
            scale: 1.0,
            cols: domain.width(),
            rows: domain.height(),
            pixels,
        }
    }

    /// Buffers `source` on a grid with one stored pixel per `scale` output pixels.
    ///
    /// Returns `TextureError::InvalidParameter` if `scale` is not finite and positive.
    pub fn with_scale(source: &dyn ColorSource, scale: f64) -> Result<Self, TextureError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TextureError::invalid_parameter(
                "scale",
                format!("must be finite and positive, got {scale}"),
            ));
        }
        let domain = source.domain();
        let cols = ((domain.width() as f64 / scale).ceil() as usize).max(1);
        let rows = ((domain.height() as f64 / scale).ceil() as usize).max(1);
        let len = cols
            .checked_mul(rows)
            .ok_or(TextureError::InvalidDimensions)?;
        let pixels = (0..len)
            .map(|i| source.color_at((i % cols) as f64 * scale, (i / cols) as f64 * scale))
            .collect();
        debug!(
            "buffered {}x{} source into {cols}x{rows} grid (scale {scale})",
            domain.width(),
            domain.height()
        );
        Ok(Self {
            domain,
            scale,
            cols,
            rows,
            pixels,
        })
    }

    /// Dimensions of the stored grid.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }
}

impl ColorSource for BufferedColorSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let col = ((x / self.scale).floor() as usize).min(self.cols - 1);
        let row = ((y / self.scale).floor() as usize).min(self.rows - 1);
        self.pixels[row * self.cols + col]
    }
}
