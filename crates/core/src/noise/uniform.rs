//! Per-pixel random perturbation of a base source.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::params::param_f64;
use crate::prng::Xorshift64;
use crate::source::{ColorSource, Domain, SharedSource};

const DEFAULT_INTENSITY: f64 = 0.1;
const DEFAULT_SATURATION: f64 = 0.0;
const DEFAULT_COVERAGE: f64 = 1.0;

/// Tunables for [`UniformNoiseSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformNoiseParams {
    /// Maximum channel delta as a fraction of 255.
    pub intensity: f64,
    /// 0 moves R, G and B together; 1 moves them independently.
    pub saturation: f64,
    /// Probability that a pixel is perturbed at all.
    pub coverage: f64,
}

impl Default for UniformNoiseParams {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
            saturation: DEFAULT_SATURATION,
            coverage: DEFAULT_COVERAGE,
        }
    }
}

impl UniformNoiseParams {
    /// Extracts `intensity`, `saturation` and `coverage`, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            intensity: param_f64(params, "intensity", DEFAULT_INTENSITY),
            saturation: param_f64(params, "saturation", DEFAULT_SATURATION),
            coverage: param_f64(params, "coverage", DEFAULT_COVERAGE),
        }
    }

    fn validate(&self) -> Result<(), TextureError> {
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(TextureError::invalid_parameter(
                "intensity",
                format!("must be finite and non-negative, got {}", self.intensity),
            ));
        }
        for (name, v) in [("saturation", self.saturation), ("coverage", self.coverage)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(TextureError::invalid_parameter(
                    name,
                    format!("must be in [0, 1], got {v}"),
                ));
            }
        }
        Ok(())
    }
}

/// Grain over a base source.
///
/// Each integer pixel draws from a PRNG seeded by `(seed, x, y)`, so its
/// color does not depend on which pixels were queried before it. Results are
/// memoized per pixel on first access; sub-pixel queries share their pixel's
/// result.
pub struct UniformNoiseSource {
    base: SharedSource,
    params: UniformNoiseParams,
    seed: u64,
    memo: Mutex<HashMap<(usize, usize), RgbaColor>>,
}

impl UniformNoiseSource {
    /// Returns `TextureError::InvalidParameter` for a negative intensity or a
    /// saturation or coverage outside [0, 1].
    pub fn new(
        base: SharedSource,
        params: UniformNoiseParams,
        seed: u64,
    ) -> Result<Self, TextureError> {
        params.validate()?;
        Ok(Self {
            base,
            params,
            seed,
            memo: Mutex::new(HashMap::new()),
        })
    }

    /// Number of pixels memoized so far.
    pub fn cached_pixels(&self) -> usize {
        self.memo.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn compute(&self, px: usize, py: usize) -> RgbaColor {
        let base = self.base.color_at(px as f64, py as f64);
        let mut rng = Xorshift64::for_cell(self.seed, px as u64, py as u64);
        if !rng.next_bool(self.params.coverage) {
            return base;
        }
        base.noise(&mut rng, self.params.intensity, self.params.saturation)
    }
}

impl ColorSource for UniformNoiseSource {
    fn domain(&self) -> Domain {
        self.base.domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let key = (x.floor() as usize, y.floor() as usize);
        // A poisoned lock only loses memoization; the value is recomputable.
        let Ok(mut memo) = self.memo.lock() else {
            return self.compute(key.0, key.1);
        };
        *memo
            .entry(key)
            .or_insert_with(|| self.compute(key.0, key.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ColorSourceExt, SolidSource};

    fn gray() -> SharedSource {
        SolidSource::new(Domain::clamped(16, 16), RgbaColor::opaque(128, 128, 128)).shared()
    }

    fn noise(params: UniformNoiseParams, seed: u64) -> UniformNoiseSource {
        UniformNoiseSource::new(gray(), params, seed).unwrap()
    }

    #[test]
    fn zero_coverage_or_intensity_returns_base() {
        let none = noise(
            UniformNoiseParams {
                coverage: 0.0,
                ..Default::default()
            },
            3,
        );
        let flat = noise(
            UniformNoiseParams {
                intensity: 0.0,
                ..Default::default()
            },
            3,
        );
        for y in 0..16 {
            for x in 0..16 {
                let (x, y) = (x as f64, y as f64);
                assert_eq!(none.color_at(x, y), RgbaColor::opaque(128, 128, 128));
                assert_eq!(flat.color_at(x, y), RgbaColor::opaque(128, 128, 128));
            }
        }
    }

    #[test]
    fn deltas_stay_within_intensity() {
        let src = noise(
            UniformNoiseParams {
                intensity: 0.1,
                saturation: 1.0,
                coverage: 1.0,
            },
            11,
        );
        let mut changed = 0;
        for (x, y) in (0..16).flat_map(|y| (0..16).map(move |x| (x, y))) {
            let c = src.color_at(x as f64, y as f64);
            for ch in [c.r, c.g, c.b] {
                assert!((102..=154).contains(&ch), "channel {ch} out of band");
            }
            assert_eq!(c.a, 255);
            if c != RgbaColor::opaque(128, 128, 128) {
                changed += 1;
            }
        }
        assert!(changed > 200, "only {changed} pixels perturbed");
    }

    #[test]
    fn zero_saturation_moves_channels_together() {
        let src = noise(UniformNoiseParams::default(), 5);
        for x in 0..16 {
            let c = src.color_at(x as f64, 4.0);
            assert!(c.r == c.g && c.g == c.b, "{c:?} is not gray");
        }
    }

    #[test]
    fn results_do_not_depend_on_query_order() {
        let forward = noise(UniformNoiseParams::default(), 42);
        let backward = noise(UniformNoiseParams::default(), 42);
        let coords: Vec<(f64, f64)> = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x as f64, y as f64)))
            .collect();
        let a: Vec<_> = coords.iter().map(|&(x, y)| forward.color_at(x, y)).collect();
        let mut b: Vec<_> = coords
            .iter()
            .rev()
            .map(|&(x, y)| backward.color_at(x, y))
            .collect();
        b.reverse();
        assert_eq!(a, b);
    }

    #[test]
    fn pixels_are_memoized_and_stable() {
        let src = noise(UniformNoiseParams::default(), 9);
        let first = src.color_at(3.0, 7.0);
        assert_eq!(src.color_at(3.5, 7.25), first);
        assert_eq!(src.color_at(19.0, 23.0), first);
        assert_eq!(src.cached_pixels(), 1);
    }

    #[test]
    fn different_seeds_differ() {
        let a = noise(UniformNoiseParams::default(), 1).generate_image();
        let b = noise(UniformNoiseParams::default(), 2).generate_image();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let bad = [
            UniformNoiseParams {
                intensity: -0.1,
                ..Default::default()
            },
            UniformNoiseParams {
                saturation: 1.5,
                ..Default::default()
            },
            UniformNoiseParams {
                coverage: f64::NAN,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(UniformNoiseSource::new(gray(), params, 0).is_err());
        }
    }

    #[test]
    fn params_read_from_json() {
        let json = serde_json::json!({"intensity": 0.3, "coverage": 0.5});
        let p = UniformNoiseParams::from_json(&json);
        assert_eq!(p.intensity, 0.3);
        assert_eq!(p.coverage, 0.5);
        assert_eq!(p.saturation, DEFAULT_SATURATION);
    }
}
