//! Positional gradients over a sorted list of color stops.
//!
//! Stop colors are sources themselves, so a gradient can interpolate between
//! textures rather than flat colors.

use glam::DVec2;

use crate::color::RgbaColor;
use crate::source::{ColorSource, Domain, SharedSource};

/// A color source pinned at a scalar position.
#[derive(Clone)]
pub struct ColorStop {
    pub position: f64,
    pub color: SharedSource,
}

/// Stops kept sorted by position.
///
/// Positions before the first stop clamp to the first color, positions after
/// the last clamp to the last, and positions between two stops interpolate
/// linearly. An empty list yields opaque black.
#[derive(Clone, Default)]
pub struct ColorStops {
    stops: Vec<ColorStop>,
}

impl ColorStops {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stop, keeping the list sorted. Equal positions keep insertion order.
    pub fn add(&mut self, position: f64, color: SharedSource) {
        let at = self.stops.partition_point(|s| s.position <= position);
        self.stops.insert(at, ColorStop { position, color });
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, position: f64, color: SharedSource) -> Self {
        self.add(position, color);
        self
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at gradient `position`, with stop sources sampled at `(x, y)`.
    ///
    /// NaN positions count as past the last stop.
    pub fn color(&self, position: f64, x: f64, y: f64) -> RgbaColor {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return RgbaColor::BLACK;
        };
        if position.is_nan() || position >= last.position {
            return last.color.color_at(x, y);
        }
        if position <= first.position {
            return first.color.color_at(x, y);
        }
        // first.position < position < last.position, so 1 <= upper < len.
        let upper = self.stops.partition_point(|s| s.position <= position);
        let (lo, hi) = (&self.stops[upper - 1], &self.stops[upper]);
        let span = hi.position - lo.position;
        let t = if span > 0.0 {
            (position - lo.position) / span
        } else {
            1.0
        };
        lo.color.color_at(x, y).lerp(hi.color.color_at(x, y), t)
    }
}

/// Gradient along the line from `(x1, y1)` (position 0) to `(x2, y2)` (position 1).
#[derive(Clone)]
pub struct LinearGradientSource {
    domain: Domain,
    start: DVec2,
    direction: DVec2,
    stops: ColorStops,
}

impl LinearGradientSource {
    pub fn new(domain: Domain, x1: f64, y1: f64, x2: f64, y2: f64, stops: ColorStops) -> Self {
        let start = DVec2::new(x1, y1);
        Self {
            domain,
            start,
            direction: DVec2::new(x2, y2) - start,
            stops,
        }
    }

    /// Scalar position of a point: its projection onto the gradient line.
    ///
    /// A zero-length line puts every point past the last stop.
    pub fn position(&self, x: f64, y: f64) -> f64 {
        let len_sq = self.direction.length_squared();
        if len_sq <= 0.0 {
            return f64::INFINITY;
        }
        (DVec2::new(x, y) - self.start).dot(self.direction) / len_sq
    }
}

impl ColorSource for LinearGradientSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        self.stops.color(self.position(x, y), x, y)
    }
}

/// Gradient over distance from a center: radius `r1` is position 0, `r2` position 1.
#[derive(Clone)]
pub struct RadialGradientSource {
    domain: Domain,
    center: DVec2,
    r1: f64,
    r2: f64,
    stops: ColorStops,
}

impl RadialGradientSource {
    pub fn new(domain: Domain, cx: f64, cy: f64, r1: f64, r2: f64, stops: ColorStops) -> Self {
        Self {
            domain,
            center: DVec2::new(cx, cy),
            r1,
            r2,
            stops,
        }
    }

    /// `(distance - r1) / (r2 - r1)`; a zero span puts every point past the last stop.
    pub fn position(&self, x: f64, y: f64) -> f64 {
        let span = self.r2 - self.r1;
        if span == 0.0 {
            return f64::INFINITY;
        }
        (DVec2::new(x, y).distance(self.center) - self.r1) / span
    }
}

impl ColorSource for RadialGradientSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        self.stops.color(self.position(x, y), x, y)
    }
}
