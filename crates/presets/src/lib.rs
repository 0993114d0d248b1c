#![deny(unsafe_code)]
//! Preset registry: maps texture names to ready-built source graphs and
//! provides PNG snapshot and caching helpers.
//!
//! This crate sits between `texgen-core` (which defines `ColorSource` and the
//! generators) and the CLI, so every consumer shares one set of named
//! textures and one parameter vocabulary.

#[cfg(feature = "png")]
pub mod cache;
#[cfg(feature = "png")]
pub mod snapshot;

use serde_json::Value;
use texgen_core::noise::{
    CellularKind, CellularParams, CellularTexture, CirclesParams, CirclesTexture, PerlinParams,
    PerlinPattern, PerlinTexture, UniformNoiseParams, UniformNoiseSource,
};
use texgen_core::params::{param_color, param_f64, param_usize};
use texgen_core::{
    AntialiasingSource, BufferedColorSource, CircleSource, ColorSourceExt, ColorStops, Domain,
    MultiplyingSource, RadialGradientSource, RgbaColor, RoofTilesSource, SharedSource,
    SolidSource, TextureError, TextureSeed,
};

/// All available preset names.
const PRESET_NAMES: &[&str] = &[
    "uniform-noise",
    "cellular",
    "perlin",
    "clouds",
    "velvet",
    "glass",
    "frosted-glass",
    "bark",
    "camouflage",
    "circles",
    "roof-tiles",
    "ground",
    "turret",
];

/// Default turret radius as a fraction of the smaller side.
const DEFAULT_TURRET_RADIUS: f64 = 0.35;
const DEFAULT_ROOF_TILES: usize = 8;

/// Every named texture the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    UniformNoise,
    Cellular,
    /// One of the Perlin-derived patterns.
    Perlin(PerlinPattern),
    Circles,
    RoofTiles,
    /// Mottled dirt: clouds multiplied by a cellular net, with grain.
    Ground,
    /// A shaded disc with a noisy band, over ground.
    Turret,
}

impl PresetKind {
    /// Resolves a preset name.
    ///
    /// Returns `TextureError::UnknownPreset` if the name is not recognized.
    pub fn parse(name: &str) -> Result<Self, TextureError> {
        let kind = match name {
            "uniform-noise" => PresetKind::UniformNoise,
            "cellular" => PresetKind::Cellular,
            "perlin" => PresetKind::Perlin(PerlinPattern::Noise),
            "clouds" => PresetKind::Perlin(PerlinPattern::Clouds),
            "velvet" => PresetKind::Perlin(PerlinPattern::Velvet),
            "glass" => PresetKind::Perlin(PerlinPattern::Glass),
            "frosted-glass" => PresetKind::Perlin(PerlinPattern::FrostedGlass),
            "bark" => PresetKind::Perlin(PerlinPattern::Bark),
            "camouflage" => PresetKind::Perlin(PerlinPattern::Camouflage),
            "circles" => PresetKind::Circles,
            "roof-tiles" => PresetKind::RoofTiles,
            "ground" => PresetKind::Ground,
            "turret" => PresetKind::Turret,
            _ => return Err(TextureError::UnknownPreset(name.to_string())),
        };
        Ok(kind)
    }

    /// Builds the named texture over a `width × height` domain.
    ///
    /// Returns `TextureError::InvalidDimensions` for a zero side and
    /// `TextureError::UnknownPreset` for an unrecognized name.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<SharedSource, TextureError> {
        let domain = Domain::new(width, height)?;
        Self::parse(name)?.build(domain, seed, params)
    }

    /// Builds the texture a [`TextureSeed`] describes.
    pub fn from_seed(seed: &TextureSeed) -> Result<SharedSource, TextureError> {
        let domain = seed.validate()?;
        Self::parse(&seed.preset)?.build(domain, seed.seed, &seed.params)
    }

    /// Returns a slice of all recognized preset names.
    pub fn list_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    /// Builds this preset's graph, reading overrides from `params`.
    pub fn build(
        self,
        domain: Domain,
        seed: u64,
        params: &Value,
    ) -> Result<SharedSource, TextureError> {
        match self {
            PresetKind::UniformNoise => {
                let base = solid(domain, param_color(params, "color", gray(128)));
                let noise_params = UniformNoiseParams::from_json(params);
                Ok(UniformNoiseSource::new(base, noise_params, seed)?.shared())
            }
            PresetKind::Cellular => {
                let (c1, c2) = colors(domain, params, RgbaColor::BLACK, RgbaColor::WHITE);
                let cellular_params = CellularParams::from_json(params);
                Ok(CellularTexture::new(domain, c1, c2, cellular_params, seed)?.shared())
            }
            PresetKind::Perlin(pattern) => {
                let (d1, d2) = pattern_colors(pattern);
                let (c1, c2) = colors(domain, params, d1, d2);
                let mut perlin = PerlinParams::from_json(params);
                perlin.pattern = pattern;
                Ok(PerlinTexture::new(domain, c1, c2, perlin, seed)?.shared())
            }
            PresetKind::Circles => {
                let (c1, c2) = colors(
                    domain,
                    params,
                    RgbaColor::opaque(90, 60, 30),
                    RgbaColor::opaque(200, 160, 110),
                );
                let background = param_color(params, "background", RgbaColor::TRANSPARENT);
                let circles_params = CirclesParams::from_json(params);
                let circles = CirclesTexture::new(
                    domain,
                    c1,
                    c2,
                    solid(domain, background),
                    circles_params,
                    seed,
                )?;
                Ok(circles.shared())
            }
            PresetKind::RoofTiles => {
                let tile = param_color(params, "color", RgbaColor::opaque(181, 84, 58));
                let shadow = param_color(params, "shadow", RgbaColor::opaque(58, 26, 16));
                let (tile, shadow) = (solid(domain, tile), solid(domain, shadow));
                let tiles_x = param_usize(params, "tiles_x", DEFAULT_ROOF_TILES);
                let tiles_y = param_usize(params, "tiles_y", DEFAULT_ROOF_TILES);
                Ok(RoofTilesSource::new(tiles_x, tiles_y, tile, shadow)?.shared())
            }
            PresetKind::Ground => ground(domain, seed, params),
            PresetKind::Turret => turret(domain, seed, params),
        }
    }
}

fn solid(domain: Domain, color: RgbaColor) -> SharedSource {
    SolidSource::new(domain, color).shared()
}

fn gray(v: u8) -> RgbaColor {
    RgbaColor::opaque(v, v, v)
}

/// `color1` and `color2` from params as solid sources.
fn colors(
    domain: Domain,
    params: &Value,
    default1: RgbaColor,
    default2: RgbaColor,
) -> (SharedSource, SharedSource) {
    (
        solid(domain, param_color(params, "color1", default1)),
        solid(domain, param_color(params, "color2", default2)),
    )
}

fn pattern_colors(pattern: PerlinPattern) -> (RgbaColor, RgbaColor) {
    match pattern {
        PerlinPattern::Noise => (RgbaColor::BLACK, RgbaColor::WHITE),
        PerlinPattern::Clouds => (RgbaColor::opaque(70, 120, 200), RgbaColor::WHITE),
        PerlinPattern::Velvet => (
            RgbaColor::opaque(60, 0, 40),
            RgbaColor::opaque(170, 40, 110),
        ),
        PerlinPattern::Glass => (
            RgbaColor::opaque(150, 200, 220),
            RgbaColor::opaque(240, 250, 255),
        ),
        PerlinPattern::FrostedGlass => (RgbaColor::opaque(180, 200, 210), RgbaColor::WHITE),
        PerlinPattern::Bark => (
            RgbaColor::opaque(60, 40, 20),
            RgbaColor::opaque(130, 95, 60),
        ),
        PerlinPattern::Camouflage => (
            RgbaColor::opaque(50, 60, 30),
            RgbaColor::opaque(140, 130, 80),
        ),
    }
}

/// Brown clouds darkened along a cellular net, with a little grain.
fn ground(domain: Domain, seed: u64, params: &Value) -> Result<SharedSource, TextureError> {
    let (c1, c2) = colors(
        domain,
        params,
        RgbaColor::opaque(80, 60, 40),
        RgbaColor::opaque(150, 120, 80),
    );
    let mut dirt_params = PerlinParams::new(PerlinPattern::Clouds);
    dirt_params.scale = param_f64(params, "scale", 2.0);
    let dirt = PerlinTexture::new(domain, c1, c2, dirt_params, seed)?.shared();

    let cracks = CellularTexture::new(
        domain,
        solid(domain, gray(170)),
        solid(domain, RgbaColor::WHITE),
        CellularParams {
            density: param_usize(params, "density", 256),
            kind: CellularKind::Net,
            ..CellularParams::default()
        },
        seed.wrapping_add(1),
    )?
    .shared();

    let mottled = MultiplyingSource::new(dirt, cracks)?.shared();
    let grain = UniformNoiseParams {
        intensity: param_f64(params, "grain", 0.04),
        ..UniformNoiseParams::default()
    };
    Ok(UniformNoiseSource::new(mottled, grain, seed.wrapping_add(2))?.shared())
}

/// A radial metal gradient with a band of noise, on buffered ground, antialiased.
fn turret(domain: Domain, seed: u64, params: &Value) -> Result<SharedSource, TextureError> {
    let ground = BufferedColorSource::new(&*ground(domain, seed, params)?).shared();

    let (cx, cy) = domain.center();
    let (cx, cy) = (cx.floor(), cy.floor());
    let fraction = param_f64(params, "radius", DEFAULT_TURRET_RADIUS);
    let radius = domain.width().min(domain.height()) as f64 * fraction;

    let metal = param_color(params, "metal", RgbaColor::opaque(120, 130, 140));
    let band = UniformNoiseSource::new(
        solid(domain, metal),
        UniformNoiseParams {
            intensity: 0.15,
            ..UniformNoiseParams::default()
        },
        seed.wrapping_add(3),
    )?
    .shared();
    let stops = ColorStops::new()
        .with(0.0, solid(domain, RgbaColor::opaque(220, 225, 230)))
        .with(0.6, band)
        .with(1.0, solid(domain, RgbaColor::opaque(40, 45, 50)));
    let body = RadialGradientSource::new(domain, cx + 0.5, cy + 0.5, 0.0, radius, stops).shared();

    let disc = CircleSource::new(cx, cy, radius, body, ground)?.shared();
    Ok(AntialiasingSource::new(disc).shared())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use texgen_core::ColorSource;

    #[test]
    fn every_listed_name_builds() {
        for &name in PresetKind::list_names() {
            let source = PresetKind::from_name(name, 32, 24, 42, &json!({}));
            let source = source.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!((source.width(), source.height()), (32, 24), "{name}");
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = PresetKind::from_name("nonexistent", 32, 32, 42, &json!({}));
        assert!(matches!(result, Err(TextureError::UnknownPreset(_))));
    }

    #[test]
    fn from_name_zero_dimensions_returns_error() {
        let result = PresetKind::from_name("perlin", 0, 32, 42, &json!({}));
        assert!(matches!(result, Err(TextureError::InvalidDimensions)));
    }

    #[test]
    fn list_names_is_parseable() {
        for &name in PresetKind::list_names() {
            assert!(PresetKind::parse(name).is_ok(), "{name}");
        }
        assert!(PresetKind::list_names().contains(&"turret"));
    }

    #[test]
    fn determinism_same_seed() {
        for name in ["uniform-noise", "cellular", "clouds", "ground"] {
            let a = PresetKind::from_name(name, 24, 24, 99, &json!({})).unwrap();
            let b = PresetKind::from_name(name, 24, 24, 99, &json!({})).unwrap();
            assert_eq!(a.generate_image(), b.generate_image(), "{name}");
        }
    }

    #[test]
    fn params_override_colors() {
        let params = json!({"color1": "#ff0000", "color2": "#ff0000"});
        let source = PresetKind::from_name("cellular", 16, 16, 1, &params).unwrap();
        assert_eq!(source.color_at(3.0, 9.0), RgbaColor::opaque(255, 0, 0));
    }

    #[test]
    fn invalid_params_surface_as_errors() {
        let result = PresetKind::from_name("perlin", 16, 16, 1, &json!({"scale": -1.0}));
        assert!(matches!(result, Err(TextureError::InvalidParameter { .. })));
        let result = PresetKind::from_name("roof-tiles", 16, 16, 1, &json!({"tiles_x": 0}));
        assert!(result.is_err());
    }

    #[test]
    fn tiny_lattice_scale_still_builds() {
        for name in ["perlin", "clouds", "circles"] {
            let params = json!({"scale": 1e-300});
            let source = PresetKind::from_name(name, 16, 16, 3, &params);
            let source = source.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(source.generate_image().width(), 16, "{name}");
        }
    }

    #[test]
    fn turret_center_is_metal_and_corner_is_ground() {
        let turret = PresetKind::from_name("turret", 64, 64, 7, &json!({})).unwrap();
        let ground = PresetKind::from_name("ground", 64, 64, 7, &json!({})).unwrap();
        let center = turret.color_at(32.0, 32.0);
        assert!(center.r > 200, "center {center:?}");
        assert_eq!(turret.color_at(0.0, 0.0), ground.color_at(0.0, 0.0));
    }

    #[test]
    fn from_seed_matches_from_name() {
        let mut seed = TextureSeed::new("bark", 32, 32, 5);
        seed.params = json!({"bands": 4});
        let a = PresetKind::from_seed(&seed).unwrap();
        let b = PresetKind::from_name("bark", 32, 32, 5, &seed.params).unwrap();
        assert_eq!(a.generate_image(), b.generate_image());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn presets_tile(
                index in 0..PRESET_NAMES.len(),
                x in -64_i32..64,
                y in -64_i32..64,
            ) {
                let name = PRESET_NAMES[index];
                let source = PresetKind::from_name(name, 20, 12, 3, &json!({})).unwrap();
                let (x, y) = (x as f64, y as f64);
                let base = source.color_at(x, y);
                prop_assert_eq!(base, source.color_at(x + 20.0, y));
                prop_assert_eq!(base, source.color_at(x, y + 12.0));
            }
        }
    }
}
