//! Closed paths and the point-in-path test used by `PathSource`.
//!
//! Curves are flattened into line segments when the path is built, so
//! containment is a plain winding-number walk over edges.

use glam::DVec2;
use serde::{Deserialize, Serialize};

const QUAD_SEGMENTS: usize = 16;
const CUBIC_SEGMENTS: usize = 24;

/// How overlapping or self-intersecting regions count as inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// A region that can answer "is this point inside?".
///
/// The test must be total: every point is either inside or outside.
pub trait PathGeometry: Send + Sync {
    fn contains(&self, x: f64, y: f64, rule: FillRule) -> bool;
}

impl<F> PathGeometry for F
where
    F: Fn(f64, f64, FillRule) -> bool + Send + Sync,
{
    fn contains(&self, x: f64, y: f64, rule: FillRule) -> bool {
        self(x, y, rule)
    }
}

/// A set of closed polygonal subpaths.
///
/// Built with `move_to`/`line_to`/`quad_to`/`cubic_to`/`close`. Every subpath
/// is implicitly closed for containment, whether or not `close` was called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Vec<DVec2>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed polygon through `points`.
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        let mut path = Self::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            path = if i == 0 {
                path.move_to(x, y)
            } else {
                path.line_to(x, y)
            };
        }
        path.close()
    }

    /// An axis-aligned rectangle.
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::polygon(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
    }

    /// Starts a new subpath at `(x, y)`.
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.subpaths.push(vec![DVec2::new(x, y)]);
        self
    }

    /// Adds a straight edge to `(x, y)`. Starts a subpath if none is open.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.current().push(DVec2::new(x, y));
        self
    }

    /// Adds a quadratic Bézier curve, flattened into line segments.
    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        let c = DVec2::new(cx, cy);
        let end = DVec2::new(x, y);
        let current = self.current();
        let start = current.last().copied().unwrap_or(c);
        current.extend((1..=QUAD_SEGMENTS).map(|i| {
            let t = i as f64 / QUAD_SEGMENTS as f64;
            let u = 1.0 - t;
            start * (u * u) + c * (2.0 * u * t) + end * (t * t)
        }));
        self
    }

    /// Adds a cubic Bézier curve, flattened into line segments.
    pub fn cubic_to(mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> Self {
        let c1 = DVec2::new(c1x, c1y);
        let c2 = DVec2::new(c2x, c2y);
        let end = DVec2::new(x, y);
        let current = self.current();
        let start = current.last().copied().unwrap_or(c1);
        current.extend((1..=CUBIC_SEGMENTS).map(|i| {
            let t = i as f64 / CUBIC_SEGMENTS as f64;
            let u = 1.0 - t;
            start * (u * u * u)
                + c1 * (3.0 * u * u * t)
                + c2 * (3.0 * u * t * t)
                + end * (t * t * t)
        }));
        self
    }

    /// Ends the current subpath; the next edge starts a new one.
    pub fn close(mut self) -> Self {
        if self.subpaths.last().is_some_and(|s| !s.is_empty()) {
            self.subpaths.push(Vec::new());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.len() < 3)
    }

    fn current(&mut self) -> &mut Vec<DVec2> {
        if self.subpaths.is_empty() {
            self.subpaths.push(Vec::new());
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    /// Signed winding number of the path around `p`.
    pub fn winding_number(&self, p: DVec2) -> i32 {
        self.subpaths
            .iter()
            .filter(|s| s.len() >= 2)
            .map(|points| {
                let edges = points.iter().zip(points.iter().cycle().skip(1));
                edges.fold(0, |wn, (&a, &b)| {
                    if a.y <= p.y {
                        if b.y > p.y && side(a, b, p) > 0.0 {
                            return wn + 1;
                        }
                    } else if b.y <= p.y && side(a, b, p) < 0.0 {
                        return wn - 1;
                    }
                    wn
                })
            })
            .sum()
    }
}

/// Positive when `p` is left of the directed line `a -> b`.
fn side(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b - a).perp_dot(p - a)
}

impl PathGeometry for Path {
    fn contains(&self, x: f64, y: f64, rule: FillRule) -> bool {
        let wn = self.winding_number(DVec2::new(x, y));
        match rule {
            FillRule::NonZero => wn != 0,
            FillRule::EvenOdd => wn % 2 != 0,
        }
    }
}
