//! Concentric, noise-displaced rings.

use glam::DVec2;
use log::debug;
use serde_json::Value;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::field::Field;
use crate::noise::perlin::PerlinGrid;
use crate::noise::texture::lattice_cells;
use crate::params::param_f64;
use crate::prng::Xorshift64;
use crate::source::{ColorSource, Domain, SharedSource};

const DEFAULT_RINGS: f64 = 6.0;
const DEFAULT_DISPLACEMENT: f64 = 0.5;
/// Fraction of the outer radius where the fade to background begins.
const FADE_START: f64 = 0.8;

/// Tunables for [`CirclesTexture`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclesParams {
    /// Rings between the center and the outer radius.
    pub rings: f64,
    /// How far noise pushes a ring, in ring widths.
    pub displacement: f64,
    /// Multiplies the base lattice cell size of the displacing noise.
    pub scale: f64,
}

impl Default for CirclesParams {
    fn default() -> Self {
        Self {
            rings: DEFAULT_RINGS,
            displacement: DEFAULT_DISPLACEMENT,
            scale: 1.0,
        }
    }
}

impl CirclesParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            rings: param_f64(params, "rings", DEFAULT_RINGS),
            displacement: param_f64(params, "displacement", DEFAULT_DISPLACEMENT),
            scale: param_f64(params, "scale", 1.0),
        }
    }
}

/// Rings around the domain center blending `color1` into `color2` across
/// each ring, fading into `background` toward the outer radius
/// (`min(width, height) / 2`). Everything beyond that radius is background.
pub struct CirclesTexture {
    domain: Domain,
    rings: Field,
    color1: SharedSource,
    color2: SharedSource,
    background: SharedSource,
}

impl CirclesTexture {
    pub fn new(
        domain: Domain,
        color1: SharedSource,
        color2: SharedSource,
        background: SharedSource,
        params: CirclesParams,
        seed: u64,
    ) -> Result<Self, TextureError> {
        if !params.scale.is_finite() || params.scale <= 0.0 {
            return Err(TextureError::invalid_parameter(
                "scale",
                format!("must be finite and positive, got {}", params.scale),
            ));
        }
        if !params.rings.is_finite() || !params.displacement.is_finite() {
            return Err(TextureError::invalid_parameter(
                "rings",
                "rings and displacement must be finite",
            ));
        }
        let mut rng = Xorshift64::new(seed);
        let grid = PerlinGrid::new(
            lattice_cells(domain.width(), params.scale),
            lattice_cells(domain.height(), params.scale),
            &mut rng,
        )?;
        let (cx, cy) = grid.cells();
        let (fx, fy) = (
            cx as f64 / domain.width() as f64,
            cy as f64 / domain.height() as f64,
        );

        let max_radius = outer_radius(domain);
        let center = DVec2::from(domain.center());
        let rings = Field::from_fn(domain.width(), domain.height(), |x, y| {
            let (x, y) = (x as f64, y as f64);
            let d = DVec2::new(x, y).distance(center) / max_radius;
            let shift = grid.value(x * fx, y * fy) * params.displacement;
            (d * params.rings + shift).rem_euclid(1.0)
        })?;
        debug!(
            "circles {}x{}: {} rings",
            domain.width(),
            domain.height(),
            params.rings
        );

        Ok(Self {
            domain,
            rings,
            color1,
            color2,
            background,
        })
    }

    /// How far toward the background a point has faded, in [0, 1].
    pub fn fade(&self, x: f64, y: f64) -> f64 {
        let center = DVec2::from(self.domain.center());
        let d = DVec2::new(x, y).distance(center) / outer_radius(self.domain);
        ((d - FADE_START) / (1.0 - FADE_START)).clamp(0.0, 1.0)
    }
}

fn outer_radius(domain: Domain) -> f64 {
    (domain.width().min(domain.height()) as f64 / 2.0).max(0.5)
}

impl ColorSource for CirclesTexture {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let fade = self.fade(x, y);
        let background = self.background.color_at(x, y);
        if fade >= 1.0 {
            return background;
        }
        let t = self.rings.get_floor(x, y);
        self.color1
            .color_at(x, y)
            .lerp(self.color2.color_at(x, y), t)
            .lerp(background, fade)
    }
}
