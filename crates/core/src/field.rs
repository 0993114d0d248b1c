//! Two-dimensional scalar field with toroidal wrapping.
//!
//! Generators that precompute their whole domain at construction (cellular
//! distances, Perlin-derived textures) store the result here, normalized into
//! [0, 1], and answer every later query with a wrapped array lookup.

use crate::error::TextureError;

/// A dense row-major grid of `f64` values with toroidal coordinate wrapping.
#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a field from a row-major data vector of length `width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, TextureError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(TextureError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Evaluates `f(x, y)` at every cell.
    ///
    /// Returns `TextureError::InvalidDimensions` if either dimension is zero
    /// or `width * height` overflows.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, TextureError> {
        let len = checked_len(width, height)?;
        let data = (0..len).map(|i| f(i % width, i / width)).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Converts signed coordinates to a flat index using toroidal wrapping.
    fn index(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        yi * self.width + xi
    }

    /// Gets the value at `(x, y)` with toroidal wrapping.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Gets the value of the cell containing the real point `(x, y)`.
    pub fn get_floor(&self, x: f64, y: f64) -> f64 {
        self.get(x.floor() as isize, y.floor() as isize)
    }

    /// Smallest and largest finite values, or `None` if there are none.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Rescales every value linearly so the minimum maps to 0 and the maximum to 1.
    ///
    /// A flat field (or one with no finite values) becomes all zeros.
    /// Non-finite cells are mapped to 0.
    pub fn normalize(&mut self) {
        let Some((lo, hi)) = self.min_max() else {
            self.data.iter_mut().for_each(|v| *v = 0.0);
            return;
        };
        let span = hi - lo;
        self.data.iter_mut().for_each(|v| {
            *v = if span > 0.0 && v.is_finite() {
                ((*v - lo) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
        });
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(TextureError::InvalidDimensions)
}
