//! Worley (cellular) distance fields.
//!
//! Feature points are scattered at integer pixel positions; every pixel's two
//! smallest toroidal distances to them are folded into one scalar, the whole
//! field is normalized into [0, 1], and queries map that value through an
//! easing curve into a blend between two color sources.

use glam::DVec2;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::RgbaColor;
use crate::easing::Easing;
use crate::error::TextureError;
use crate::field::Field;
use crate::params::{param_enum, param_usize};
use crate::prng::Xorshift64;
use crate::source::{ColorSource, Domain, SharedSource};

/// Default pixels per feature point.
const DEFAULT_DENSITY: usize = 64;
/// Fewest feature points a field is built from.
const MIN_POINTS: usize = 2;

/// How the distance between a pixel and a feature point is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
    /// `(sqrt|dx| + sqrt|dy|)^2`, which gives star-shaped cells.
    Minkowski,
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 4] = [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
        DistanceMetric::Minkowski,
    ];

    pub fn distance(self, dx: f64, dy: f64) -> f64 {
        let (dx, dy) = (dx.abs(), dy.abs());
        match self {
            DistanceMetric::Euclidean => dx.hypot(dy),
            DistanceMetric::Manhattan => dx + dy,
            DistanceMetric::Chebyshev => dx.max(dy),
            DistanceMetric::Minkowski => {
                let s = dx.sqrt() + dy.sqrt();
                s * s
            }
        }
    }
}

/// How the nearest (`d1`) and second-nearest (`d2`) distances become a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellularKind {
    /// `d1²`: dark cell centers brightening outward.
    #[default]
    Cells,
    /// `d2 - d1`: dark borders between cells.
    Net,
    /// `d1 · d2`: rounded blobs.
    Balls,
}

impl CellularKind {
    pub const ALL: [CellularKind; 3] = [
        CellularKind::Cells,
        CellularKind::Net,
        CellularKind::Balls,
    ];

    pub fn combine(self, d1: f64, d2: f64) -> f64 {
        match self {
            CellularKind::Cells => d1 * d1,
            CellularKind::Net => d2 - d1,
            CellularKind::Balls => d1 * d2,
        }
    }
}

/// Smallest separation of `a` and `b` on a ring of circumference `size`.
pub fn toroidal_delta(a: f64, b: f64, size: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(size);
    d.min(size - d)
}

/// Tunables for [`CellularTexture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellularParams {
    /// Pixels per feature point; 0 is treated as 1.
    pub density: usize,
    pub metric: DistanceMetric,
    pub kind: CellularKind,
    pub easing: Easing,
}

impl Default for CellularParams {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            metric: DistanceMetric::default(),
            kind: CellularKind::default(),
            easing: Easing::default(),
        }
    }
}

impl CellularParams {
    /// Extracts `density`, `metric`, `kind` and `easing`, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            density: param_usize(params, "density", DEFAULT_DENSITY),
            metric: param_enum(params, "metric", DistanceMetric::default()),
            kind: param_enum(params, "kind", CellularKind::default()),
            easing: param_enum(params, "easing", Easing::default()),
        }
    }

    /// `max(2, area / density)`.
    pub fn point_count(&self, domain: Domain) -> usize {
        (domain.area() / self.density.max(1)).max(MIN_POINTS)
    }
}

/// A Worley-noise texture blending `color1` (value 0) into `color2` (value 1).
pub struct CellularTexture {
    domain: Domain,
    points: Vec<DVec2>,
    field: Field,
    color1: SharedSource,
    color2: SharedSource,
    easing: Easing,
}

impl CellularTexture {
    pub fn new(
        domain: Domain,
        color1: SharedSource,
        color2: SharedSource,
        params: CellularParams,
        seed: u64,
    ) -> Result<Self, TextureError> {
        let mut rng = Xorshift64::new(seed);
        let count = params.point_count(domain);
        let points: Vec<DVec2> = (0..count)
            .map(|_| {
                DVec2::new(
                    rng.next_usize(domain.width()) as f64,
                    rng.next_usize(domain.height()) as f64,
                )
            })
            .collect();

        let (w, h) = (domain.width() as f64, domain.height() as f64);
        let mut field = Field::from_fn(domain.width(), domain.height(), |x, y| {
            let (x, y) = (x as f64, y as f64);
            let (mut d1, mut d2) = (f64::INFINITY, f64::INFINITY);
            for p in &points {
                let d = params
                    .metric
                    .distance(toroidal_delta(x, p.x, w), toroidal_delta(y, p.y, h));
                if d < d1 {
                    d2 = d1;
                    d1 = d;
                } else if d < d2 {
                    d2 = d;
                }
            }
            params.kind.combine(d1, d2)
        })?;
        field.normalize();
        debug!(
            "cellular field {}x{}: {count} points, {:?}/{:?}",
            domain.width(),
            domain.height(),
            params.metric,
            params.kind
        );

        Ok(Self {
            domain,
            points,
            field,
            color1,
            color2,
            easing: params.easing,
        })
    }

    /// Feature point positions (integer pixel coordinates).
    pub fn feature_points(&self) -> &[DVec2] {
        &self.points
    }

    /// The normalized scalar field.
    pub fn field(&self) -> &Field {
        &self.field
    }
}

impl ColorSource for CellularTexture {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let t = self.easing.apply(self.field.get_floor(x, y));
        self.color1
            .color_at(x, y)
            .lerp(self.color2.color_at(x, y), t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ColorSourceExt, SolidSource};

    fn solid(domain: Domain, color: RgbaColor) -> SharedSource {
        SolidSource::new(domain, color).shared()
    }

    fn texture(w: usize, h: usize, params: CellularParams, seed: u64) -> CellularTexture {
        let domain = Domain::clamped(w, h);
        CellularTexture::new(
            domain,
            solid(domain, RgbaColor::BLACK),
            solid(domain, RgbaColor::WHITE),
            params,
            seed,
        )
        .unwrap()
    }

    #[test]
    fn metrics_measure_as_documented() {
        assert!((DistanceMetric::Euclidean.distance(3.0, -4.0) - 5.0).abs() < 1e-12);
        assert_eq!(DistanceMetric::Manhattan.distance(3.0, -4.0), 7.0);
        assert_eq!(DistanceMetric::Chebyshev.distance(3.0, -4.0), 4.0);
        assert!((DistanceMetric::Minkowski.distance(4.0, 9.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn kinds_combine_as_documented() {
        assert_eq!(CellularKind::Cells.combine(3.0, 5.0), 9.0);
        assert_eq!(CellularKind::Net.combine(3.0, 5.0), 2.0);
        assert_eq!(CellularKind::Balls.combine(3.0, 5.0), 15.0);
    }

    #[test]
    fn toroidal_delta_takes_the_short_way_round() {
        assert_eq!(toroidal_delta(1.0, 30.0, 32.0), 3.0);
        assert_eq!(toroidal_delta(30.0, 1.0, 32.0), 3.0);
        assert_eq!(toroidal_delta(4.0, 10.0, 32.0), 6.0);
        assert_eq!(toroidal_delta(0.0, 16.0, 32.0), 16.0);
    }

    #[test]
    fn point_count_has_a_floor_of_two() {
        let domain = Domain::clamped(32, 32);
        let p = |density| CellularParams {
            density,
            ..Default::default()
        };
        assert_eq!(p(64).point_count(domain), 16);
        assert_eq!(p(4096).point_count(domain), 2);
        assert_eq!(p(0).point_count(domain), 1024);
    }

    #[test]
    fn field_is_normalized_for_every_metric_and_kind() {
        for metric in DistanceMetric::ALL {
            for kind in CellularKind::ALL {
                let params = CellularParams {
                    density: 32,
                    metric,
                    kind,
                    easing: Easing::Linear,
                };
                let tex = texture(32, 32, params, 1234);
                let (lo, hi) = tex.field().min_max().unwrap();
                assert!(lo.abs() < 1e-9, "{metric:?}/{kind:?} min = {lo}");
                assert!((hi - 1.0).abs() < 1e-9, "{metric:?}/{kind:?} max = {hi}");
            }
        }
    }

    #[test]
    fn feature_points_render_as_the_first_color() {
        for seed in [1, 77, 9001] {
            let params = CellularParams {
                density: 64,
                ..Default::default()
            };
            let tex = texture(32, 32, params, seed);
            assert_eq!(tex.feature_points().len(), 16);
            let black = tex
                .feature_points()
                .iter()
                .any(|p| tex.color_at(p.x, p.y) == RgbaColor::BLACK);
            assert!(black, "seed {seed}: no feature point rendered black");
        }
    }

    #[test]
    fn same_seed_same_texture() {
        let a = texture(24, 16, CellularParams::default(), 5).generate_image();
        let b = texture(24, 16, CellularParams::default(), 5).generate_image();
        assert_eq!(a, b);
    }

    #[test]
    fn easing_reshapes_the_blend() {
        let linear = texture(32, 32, CellularParams::default(), 8);
        let arc = texture(
            32,
            32,
            CellularParams {
                easing: Easing::Arc,
                ..Default::default()
            },
            8,
        );
        // Arc lies above the diagonal, so no pixel gets darker.
        for y in 0..32 {
            for x in 0..32 {
                let (x, y) = (x as f64, y as f64);
                assert!(arc.color_at(x, y).r >= linear.color_at(x, y).r);
            }
        }
    }

    #[test]
    fn params_read_from_json() {
        let p = CellularParams::from_json(&serde_json::json!({
            "density": 16,
            "metric": "chebyshev",
            "kind": "net",
            "easing": "sin"
        }));
        assert_eq!(p.density, 16);
        assert_eq!(p.metric, DistanceMetric::Chebyshev);
        assert_eq!(p.kind, CellularKind::Net);
        assert_eq!(p.easing, Easing::Sin);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn toroidal_delta_is_at_most_half_the_size(
                a in 0.0_f64..64.0,
                b in 0.0_f64..64.0,
            ) {
                let d = toroidal_delta(a, b, 64.0);
                prop_assert!((0.0..=32.0).contains(&d));
            }
        }
    }
}
