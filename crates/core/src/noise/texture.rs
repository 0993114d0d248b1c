//! Textures derived from one or more Perlin lattices.
//!
//! Every pattern is evaluated once over the whole domain at construction,
//! normalized into [0, 1] and stored in a [`Field`]. Queries blend `color1`
//! (value 0) into `color2` (value 1).

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::field::Field;
use crate::noise::perlin::PerlinGrid;
use crate::params::{param_enum, param_f64, param_usize};
use crate::prng::Xorshift64;
use crate::source::{ColorSource, Domain, SharedSource};

/// Lattice cell size in pixels at `scale = 1`.
pub const BASE_CELL_SIZE: f64 = 32.0;
/// Octaves summed by the clouds pattern.
const CLOUD_OCTAVES: usize = 6;
/// Default number of bands bark values are quantized into.
const DEFAULT_BARK_BANDS: usize = 8;
/// Default number of tone levels in camouflage.
const CAMOUFLAGE_LEVELS: usize = 4;

/// Which Perlin-derived pattern a [`PerlinTexture`] renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerlinPattern {
    /// One lattice, used directly.
    #[default]
    Noise,
    /// Six octaves at doubling frequency and halving weight.
    Clouds,
    /// A soft lattice lightly warped by a second one.
    Velvet,
    /// Ridged noise strongly warped by two finer lattices.
    Glass,
    /// Glass with a fine-grained frosting layer on top.
    FrostedGlass,
    /// Vertically stretched, warped rings quantized into bands.
    Bark,
    /// Two levels of domain warping quantized into flat patches.
    Camouflage,
}

/// Tunables for [`PerlinTexture`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerlinParams {
    pub pattern: PerlinPattern,
    /// Multiplies the base lattice cell size.
    pub scale: f64,
    /// Bands for [`PerlinPattern::Bark`].
    pub bands: usize,
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            pattern: PerlinPattern::default(),
            scale: 1.0,
            bands: DEFAULT_BARK_BANDS,
        }
    }
}

impl PerlinParams {
    pub fn new(pattern: PerlinPattern) -> Self {
        Self {
            pattern,
            ..Self::default()
        }
    }

    /// Extracts `pattern`, `scale` and `bands`, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            pattern: param_enum(params, "pattern", PerlinPattern::default()),
            scale: param_f64(params, "scale", 1.0),
            bands: param_usize(params, "bands", DEFAULT_BARK_BANDS),
        }
    }
}

/// Whole lattice cells across `extent` pixels at cell size `BASE_CELL_SIZE * scale`.
///
/// Never fewer than one cell, and never more than one per pixel.
pub(crate) fn lattice_cells(extent: usize, scale: f64) -> usize {
    let cells = (extent as f64 / (BASE_CELL_SIZE * scale)).round() as usize;
    cells.clamp(1, extent.max(1))
}

/// Rounds `v` in [0, 1] down to the nearest of `bands` levels.
pub fn granulate(v: f64, bands: usize) -> f64 {
    let k = bands.max(1) as f64;
    ((v * k).floor() / k).clamp(0.0, 1.0)
}

/// One lattice mapped onto pixel space.
///
/// Pixel coordinates are converted so the lattice period equals the domain,
/// which makes every layer, and every warp built from layers, tile.
struct Layer {
    grid: PerlinGrid,
    to_lattice_x: f64,
    to_lattice_y: f64,
}

impl Layer {
    fn new(
        domain: Domain,
        cells_x: usize,
        cells_y: usize,
        rng: &mut Xorshift64,
    ) -> Result<Self, TextureError> {
        let grid = PerlinGrid::new(cells_x, cells_y, rng)?;
        let (cx, cy) = grid.cells();
        Ok(Self {
            grid,
            to_lattice_x: cx as f64 / domain.width() as f64,
            to_lattice_y: cy as f64 / domain.height() as f64,
        })
    }

    /// Noise in [-1, 1] at pixel position `(x, y)`.
    fn at(&self, x: f64, y: f64) -> f64 {
        self.grid.value(x * self.to_lattice_x, y * self.to_lattice_y)
    }
}

/// Lattice geometry shared by the pattern builders.
struct Lattice {
    domain: Domain,
    cells_x: usize,
    cells_y: usize,
    /// Cell size in pixels, used to size warp offsets.
    cell: f64,
}

impl Lattice {
    fn new(domain: Domain, scale: f64) -> Self {
        let cells_x = lattice_cells(domain.width(), scale);
        let cells_y = lattice_cells(domain.height(), scale);
        Self {
            domain,
            cells_x,
            cells_y,
            cell: domain.width() as f64 / cells_x as f64,
        }
    }

    /// A layer `factor_x × factor_y` times finer than the base lattice, capped
    /// at one cell per pixel.
    fn layer(
        &self,
        factor_x: usize,
        factor_y: usize,
        rng: &mut Xorshift64,
    ) -> Result<Layer, TextureError> {
        let cells_x = self.cells_x.saturating_mul(factor_x).min(self.domain.width());
        let cells_y = self.cells_y.saturating_mul(factor_y).min(self.domain.height());
        Layer::new(self.domain, cells_x, cells_y, rng)
    }
}

/// Raw (unnormalized) pattern value at every pixel.
fn evaluate(
    lattice: &Lattice,
    params: &PerlinParams,
    rng: &mut Xorshift64,
) -> Result<Field, TextureError> {
    let (w, h) = (lattice.domain.width(), lattice.domain.height());
    let c = lattice.cell;
    match params.pattern {
        PerlinPattern::Noise => {
            let n = lattice.layer(1, 1, rng)?;
            Field::from_fn(w, h, |x, y| n.at(x as f64, y as f64))
        }
        PerlinPattern::Clouds => {
            let octaves = (0..CLOUD_OCTAVES)
                .map(|k| lattice.layer(1 << k, 1 << k, rng))
                .collect::<Result<Vec<Layer>, _>>()?;
            Field::from_fn(w, h, |x, y| {
                let (x, y) = (x as f64, y as f64);
                octaves
                    .iter()
                    .enumerate()
                    .map(|(k, n)| n.at(x, y) / (1 << k) as f64)
                    .sum()
            })
        }
        PerlinPattern::Velvet => {
            let base = lattice.layer(1, 1, rng)?;
            let warp = lattice.layer(2, 2, rng)?;
            Field::from_fn(w, h, |x, y| {
                let (x, y) = (x as f64, y as f64);
                let q = warp.at(x, y) * c * 0.5;
                base.at(x + q, y + q)
            })
        }
        PerlinPattern::Glass => {
            let (base, wx, wy) = glass_layers(lattice, rng)?;
            Field::from_fn(w, h, |x, y| glass(&base, &wx, &wy, c, x as f64, y as f64))
        }
        PerlinPattern::FrostedGlass => {
            let (base, wx, wy) = glass_layers(lattice, rng)?;
            let frost = lattice.layer(8, 8, rng)?;
            Field::from_fn(w, h, |x, y| {
                let (x, y) = (x as f64, y as f64);
                0.7 * glass(&base, &wx, &wy, c, x, y) + 0.3 * frost.at(x, y).abs()
            })
        }
        PerlinPattern::Bark => {
            let rings = lattice.layer(4, 1, rng)?;
            let warp = lattice.layer(2, 2, rng)?;
            let bands = params.bands;
            Field::from_fn(w, h, |x, y| {
                let (x, y) = (x as f64, y as f64);
                let v = rings.at(x + warp.at(x, y) * c, y);
                granulate(((v + 1.0) * 2.0).fract(), bands)
            })
        }
        PerlinPattern::Camouflage => {
            let base = lattice.layer(1, 1, rng)?;
            let first = lattice.layer(1, 1, rng)?;
            let second = lattice.layer(2, 2, rng)?;
            Field::from_fn(w, h, |x, y| {
                let (x, y) = (x as f64, y as f64);
                let q = first.at(x, y) * c;
                let r = second.at(x + q, y - q) * c * 2.0;
                granulate((base.at(x + r, y + r) + 1.0) / 2.0, CAMOUFLAGE_LEVELS)
            })
        }
    }
}

fn glass_layers(
    lattice: &Lattice,
    rng: &mut Xorshift64,
) -> Result<(Layer, Layer, Layer), TextureError> {
    Ok((
        lattice.layer(1, 1, rng)?,
        lattice.layer(2, 2, rng)?,
        lattice.layer(2, 2, rng)?,
    ))
}

/// Absolute value of strongly warped noise: sharp creases along its zero set.
fn glass(base: &Layer, wx: &Layer, wy: &Layer, cell: f64, x: f64, y: f64) -> f64 {
    let dx = wx.at(x, y) * cell * 2.0;
    let dy = wy.at(x, y) * cell * 2.0;
    base.at(x + dx, y + dy).abs()
}

/// A precomputed Perlin-derived texture.
pub struct PerlinTexture {
    domain: Domain,
    pattern: PerlinPattern,
    field: Field,
    color1: SharedSource,
    color2: SharedSource,
}

impl PerlinTexture {
    /// Builds and precomputes the texture.
    ///
    /// Returns `TextureError::InvalidParameter` if `scale` is not finite and positive.
    pub fn new(
        domain: Domain,
        color1: SharedSource,
        color2: SharedSource,
        params: PerlinParams,
        seed: u64,
    ) -> Result<Self, TextureError> {
        if !params.scale.is_finite() || params.scale <= 0.0 {
            return Err(TextureError::invalid_parameter(
                "scale",
                format!("must be finite and positive, got {}", params.scale),
            ));
        }
        let lattice = Lattice::new(domain, params.scale);
        let mut rng = Xorshift64::new(seed);
        let mut field = evaluate(&lattice, &params, &mut rng)?;
        field.normalize();
        debug!(
            "perlin {:?} {}x{}: {}x{} base cells",
            params.pattern,
            domain.width(),
            domain.height(),
            lattice.cells_x,
            lattice.cells_y
        );
        Ok(Self {
            domain,
            pattern: params.pattern,
            field,
            color1,
            color2,
        })
    }

    pub fn pattern(&self) -> PerlinPattern {
        self.pattern
    }

    /// The normalized scalar field.
    pub fn field(&self) -> &Field {
        &self.field
    }
}

impl ColorSource for PerlinTexture {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let t = self.field.get_floor(x, y);
        self.color1
            .color_at(x, y)
            .lerp(self.color2.color_at(x, y), t)
    }
}
