//! Geometric transforms as inverse coordinate remaps.
//!
//! A transform answers "what color lands at this output point?" by mapping
//! the output point back into the wrapped source's space and sampling there.
//! Because the source wraps toroidally, transformed textures still tile.

use glam::DVec2;

use crate::color::RgbaColor;
use crate::easing;
use crate::source::{ColorSource, Domain, SharedSource};

/// Shifts a source by `(dx, dy)`.
#[derive(Clone)]
pub struct TranslatingSource {
    source: SharedSource,
    offset: DVec2,
}

impl TranslatingSource {
    pub fn new(source: SharedSource, dx: f64, dy: f64) -> Self {
        Self {
            source,
            offset: DVec2::new(dx, dy),
        }
    }
}

impl ColorSource for TranslatingSource {
    fn domain(&self) -> Domain {
        self.source.domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let p = DVec2::new(x, y) - self.offset;
        self.source.color_at(p.x, p.y)
    }
}

/// Rotates a source by `angle` radians (counter-clockwise in y-down pixel
/// space appears clockwise) around a pivot.
#[derive(Clone)]
pub struct RotatingSource {
    source: SharedSource,
    pivot: DVec2,
    inverse: DVec2,
}

impl RotatingSource {
    pub fn new(source: SharedSource, angle: f64, pivot_x: f64, pivot_y: f64) -> Self {
        Self {
            source,
            pivot: DVec2::new(pivot_x, pivot_y),
            inverse: DVec2::from_angle(-angle),
        }
    }
}

impl ColorSource for RotatingSource {
    fn domain(&self) -> Domain {
        self.source.domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let p = self.pivot + self.inverse.rotate(DVec2::new(x, y) - self.pivot);
        self.source.color_at(p.x, p.y)
    }
}

/// Scales a source by independent x/y factors around a pivot.
#[derive(Clone)]
pub struct ScalingSource {
    source: SharedSource,
    pivot: DVec2,
    factor: DVec2,
}

impl ScalingSource {
    pub fn new(source: SharedSource, sx: f64, sy: f64, pivot_x: f64, pivot_y: f64) -> Self {
        Self {
            source,
            pivot: DVec2::new(pivot_x, pivot_y),
            factor: DVec2::new(sx, sy),
        }
    }

    /// Uniform scaling.
    pub fn uniform(source: SharedSource, scale: f64, pivot_x: f64, pivot_y: f64) -> Self {
        Self::new(source, scale, scale, pivot_x, pivot_y)
    }
}

impl ColorSource for ScalingSource {
    fn domain(&self) -> Domain {
        self.source.domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let offset = DVec2::new(x, y) - self.pivot;
        // At the pivot, or with a collapsed axis, everything maps onto the pivot.
        if offset == DVec2::ZERO || self.factor.x == 0.0 || self.factor.y == 0.0 {
            return self.source.color_at(self.pivot.x, self.pivot.y);
        }
        let p = self.pivot + offset / self.factor;
        self.source.color_at(p.x, p.y)
    }
}

/// Radial lens distortion inside `radius` around a center.
///
/// `scale` in [-1, 1]: positive values remap the radius through `arc`,
/// sampling farther from the center and shrinking it; negative values use
/// `inv_arc`, sampling closer in and magnifying it. The magnitude blends
/// between the undistorted and fully eased radius. Points outside the radius
/// are untouched.
#[derive(Clone)]
pub struct FisheyeSource {
    source: SharedSource,
    center: DVec2,
    radius: f64,
    scale: f64,
}

impl FisheyeSource {
    pub fn new(source: SharedSource, cx: f64, cy: f64, radius: f64, scale: f64) -> Self {
        Self {
            source,
            center: DVec2::new(cx, cy),
            radius,
            scale: if scale.is_nan() { 0.0 } else { scale.clamp(-1.0, 1.0) },
        }
    }

    /// Where the output point `p` samples from.
    pub fn source_point(&self, p: DVec2) -> DVec2 {
        let offset = p - self.center;
        let d = offset.length();
        if self.radius <= 0.0 || d >= self.radius || d == 0.0 {
            return p;
        }
        let t = d / self.radius;
        let eased = if self.scale >= 0.0 {
            easing::arc(t)
        } else {
            easing::inv_arc(t)
        };
        let k = self.scale.abs();
        let mapped = t + (eased - t) * k;
        self.center + offset / d * (mapped * self.radius)
    }
}

impl ColorSource for FisheyeSource {
    fn domain(&self) -> Domain {
        self.source.domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let p = self.source_point(DVec2::new(x, y));
        self.source.color_at(p.x, p.y)
    }
}

/// Wraps a rectangular source around the output's center.
///
/// The source's x-axis becomes the angle (0..360° across its width) and its
/// y-axis the radius: row 0 at the center, the source's full height at
/// `min(width, height) / 2` of the output domain.
#[derive(Clone)]
pub struct PolarSource {
    domain: Domain,
    source: SharedSource,
}

impl PolarSource {
    pub fn new(domain: Domain, source: SharedSource) -> Self {
        Self { domain, source }
    }

    /// `(angle in degrees [0, 360), radius in pixels)` of an output point.
    pub fn polar(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.domain.center();
        let offset = DVec2::new(x - cx, y - cy);
        let angle = offset.y.atan2(offset.x).to_degrees().rem_euclid(360.0);
        (angle, offset.length())
    }
}

impl ColorSource for PolarSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let (angle, radius) = self.polar(x, y);
        let max_radius = self.domain.width().min(self.domain.height()) as f64 / 2.0;
        let sx = angle / 360.0 * self.source.width() as f64;
        let sy = radius / max_radius * self.source.height() as f64;
        self.source.color_at(sx, sy)
    }
}
