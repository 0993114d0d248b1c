//! Tileable Perlin gradient-noise lattice.

use std::f64::consts::SQRT_2;

use glam::DVec2;

use crate::easing;
use crate::error::TextureError;
use crate::prng::Xorshift64;

/// A wrapping grid of random unit gradients.
///
/// Coordinates are in lattice units: integer points are lattice corners, and
/// the lattice repeats every `cells_x × cells_y` units, so noise sampled over
/// a whole number of periods tiles seamlessly.
#[derive(Debug, Clone)]
pub struct PerlinGrid {
    cells_x: usize,
    cells_y: usize,
    gradients: Vec<DVec2>,
}

impl PerlinGrid {
    /// Draws one gradient per lattice cell. Zero counts are raised to 1.
    ///
    /// Returns `TextureError::InvalidParameter` if `cells_x * cells_y` overflows.
    pub fn new(
        cells_x: usize,
        cells_y: usize,
        rng: &mut Xorshift64,
    ) -> Result<Self, TextureError> {
        let (cells_x, cells_y) = (cells_x.max(1), cells_y.max(1));
        let count = cells_x.checked_mul(cells_y).ok_or_else(|| {
            TextureError::invalid_parameter(
                "cells",
                format!("{cells_x}x{cells_y} lattice is too large"),
            )
        })?;
        let gradients = (0..count).map(|_| rng.next_unit_vector()).collect();
        Ok(Self {
            cells_x,
            cells_y,
            gradients,
        })
    }

    pub fn cells(&self) -> (usize, usize) {
        (self.cells_x, self.cells_y)
    }

    fn gradient(&self, ix: i64, iy: i64) -> DVec2 {
        let x = ix.rem_euclid(self.cells_x as i64) as usize;
        let y = iy.rem_euclid(self.cells_y as i64) as usize;
        self.gradients[y * self.cells_x + x]
    }

    /// Noise at `(u, v)` in lattice units, in [-1, 1].
    ///
    /// Corner contributions are `gradient · offset`, blended with a cosine
    /// ease on each axis. Non-finite input samples the origin.
    pub fn value(&self, u: f64, v: f64) -> f64 {
        let (u, v) = (finite_or_zero(u), finite_or_zero(v));
        let (x0, y0) = (u.floor(), v.floor());
        let (fx, fy) = (u - x0, v - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let corner = |dx: i64, dy: i64| {
            self.gradient(ix + dx, iy + dy)
                .dot(DVec2::new(fx - dx as f64, fy - dy as f64))
        };
        let (sx, sy) = (easing::sin(fx), easing::sin(fy));
        let top = lerp(corner(0, 0), corner(1, 0), sx);
        let bottom = lerp(corner(0, 1), corner(1, 1), sx);
        (lerp(top, bottom, sy) * SQRT_2).clamp(-1.0, 1.0)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
