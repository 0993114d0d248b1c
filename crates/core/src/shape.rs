//! Shape sources: a geometric predicate choosing between two sources.
//!
//! Each shape returns its foreground source inside the shape and its
//! background source outside. Only the circle softens its own edge; wrap the
//! others in an [`AntialiasingSource`](crate::antialias::AntialiasingSource)
//! to smooth stair-stepping.
//!
//! Circle and ellipse centers name a pixel: the geometric center sits in the
//! middle of that pixel, at `(cx + 0.5, cy + 0.5)`.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::path::{FillRule, PathGeometry};
use crate::source::{ColorSource, Domain, SharedSource};

fn shared_domain(
    foreground: &SharedSource,
    background: &SharedSource,
) -> Result<Domain, TextureError> {
    let domain = background.domain();
    domain.ensure_same(foreground.domain())?;
    Ok(domain)
}

/// Axis-aligned rectangle `[x, x + w) × [y, y + h)`, hard edge.
#[derive(Clone)]
pub struct RectangleSource {
    domain: Domain,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    foreground: SharedSource,
    background: SharedSource,
}

impl RectangleSource {
    pub fn new(
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        foreground: SharedSource,
        background: SharedSource,
    ) -> Result<Self, TextureError> {
        Ok(Self {
            domain: shared_domain(&foreground, &background)?,
            x,
            y,
            w,
            h,
            foreground,
            background,
        })
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

impl ColorSource for RectangleSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        if self.contains(x, y) {
            self.foreground.color_at(x, y)
        } else {
            self.background.color_at(x, y)
        }
    }
}

/// Disc of radius `r` with a one-pixel linear fade to the background.
#[derive(Clone)]
pub struct CircleSource {
    domain: Domain,
    cx: f64,
    cy: f64,
    r: f64,
    foreground: SharedSource,
    background: SharedSource,
}

impl CircleSource {
    pub fn new(
        cx: f64,
        cy: f64,
        r: f64,
        foreground: SharedSource,
        background: SharedSource,
    ) -> Result<Self, TextureError> {
        Ok(Self {
            domain: shared_domain(&foreground, &background)?,
            cx,
            cy,
            r,
            foreground,
            background,
        })
    }

    /// Distance from `(x, y)` to the circle's geometric center.
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        (x - (self.cx + 0.5)).hypot(y - (self.cy + 0.5))
    }
}

impl ColorSource for CircleSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let d = self.distance(x, y);
        if d <= self.r {
            self.foreground.color_at(x, y)
        } else if d >= self.r + 1.0 {
            self.background.color_at(x, y)
        } else {
            let fg = self.foreground.color_at(x, y);
            fg.lerp(self.background.color_at(x, y), d - self.r)
        }
    }
}

/// Axis-aligned ellipse with radii `r1` (x) and `r2` (y), hard edge.
#[derive(Clone)]
pub struct EllipseSource {
    domain: Domain,
    cx: f64,
    cy: f64,
    r1: f64,
    r2: f64,
    foreground: SharedSource,
    background: SharedSource,
}

impl EllipseSource {
    pub fn new(
        cx: f64,
        cy: f64,
        r1: f64,
        r2: f64,
        foreground: SharedSource,
        background: SharedSource,
    ) -> Result<Self, TextureError> {
        Ok(Self {
            domain: shared_domain(&foreground, &background)?,
            cx,
            cy,
            r1,
            r2,
            foreground,
            background,
        })
    }

    /// `(dx/r1)^2 + (dy/r2)^2 <= 1`; a zero radius contains nothing.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.r1 == 0.0 || self.r2 == 0.0 {
            return false;
        }
        let nx = (x - (self.cx + 0.5)) / self.r1;
        let ny = (y - (self.cy + 0.5)) / self.r2;
        nx * nx + ny * ny <= 1.0
    }
}

impl ColorSource for EllipseSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        if self.contains(x, y) {
            self.foreground.color_at(x, y)
        } else {
            self.background.color_at(x, y)
        }
    }
}

/// Fills an arbitrary path over a background.
///
/// A `None` fill skips the path entirely and shows the background everywhere.
#[derive(Clone)]
pub struct PathSource {
    domain: Domain,
    path: Arc<dyn PathGeometry>,
    rule: FillRule,
    fill: Option<SharedSource>,
    background: SharedSource,
}

impl PathSource {
    pub fn new(
        path: Arc<dyn PathGeometry>,
        rule: FillRule,
        fill: Option<SharedSource>,
        background: SharedSource,
    ) -> Result<Self, TextureError> {
        let domain = background.domain();
        if let Some(fill) = &fill {
            domain.ensure_same(fill.domain())?;
        }
        Ok(Self {
            domain,
            path,
            rule,
            fill,
            background,
        })
    }
}

impl ColorSource for PathSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        match &self.fill {
            Some(fill) if self.path.contains(x, y, self.rule) => fill.color_at(x, y),
            _ => self.background.color_at(x, y),
        }
    }
}

/// Corrugated roof: rows of rounded tiles, odd rows shifted by half a tile.
///
/// Each tile is shaded across its width like a half-pipe and darkens toward
/// its lower edge where the next row overlaps it. The shade mixes from the
/// background (shadow) to the foreground (lit tile surface).
#[derive(Clone)]
pub struct RoofTilesSource {
    domain: Domain,
    tiles_x: usize,
    tiles_y: usize,
    foreground: SharedSource,
    background: SharedSource,
}

impl RoofTilesSource {
    /// Returns `InvalidParameter` if either tile count is zero.
    pub fn new(
        tiles_x: usize,
        tiles_y: usize,
        foreground: SharedSource,
        background: SharedSource,
    ) -> Result<Self, TextureError> {
        if tiles_x == 0 || tiles_y == 0 {
            return Err(TextureError::invalid_parameter(
                "tiles",
                "horizontal and vertical tile counts must be non-zero",
            ));
        }
        Ok(Self {
            domain: shared_domain(&foreground, &background)?,
            tiles_x,
            tiles_y,
            foreground,
            background,
        })
    }

    /// Lighting in [0, 1] at a canonical point.
    pub fn shade(&self, x: f64, y: f64) -> f64 {
        let tile_w = self.domain.width() as f64 / self.tiles_x as f64;
        let tile_h = self.domain.height() as f64 / self.tiles_y as f64;
        let row = (y / tile_h).floor();
        let offset = if row as i64 % 2 == 1 { tile_w / 2.0 } else { 0.0 };
        let u = ((x + offset) / tile_w).fract();
        let v = (y / tile_h).fract();
        let profile = (PI * u).sin().sqrt();
        let overlap = 1.0 - v * v * v;
        (profile * overlap).clamp(0.0, 1.0)
    }
}

impl ColorSource for RoofTilesSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let shadow = self.background.color_at(x, y);
        shadow.lerp(self.foreground.color_at(x, y), self.shade(x, y))
    }
}
