#![deny(unsafe_code)]
//! Core types and traits for texgen, a procedural texture synthesis engine.
//!
//! Provides the `RgbaColor` value, the toroidal `ColorSource` trait with its
//! gradient, shape, combinator, transform and noise implementations, the
//! `Xorshift64` PRNG, the scalar `Field`, `RasterImage`, the `ImageCache`
//! seam, `TextureSeed` and parameter helpers.

pub mod antialias;
pub mod buffered;
pub mod cache;
pub mod color;
pub mod combine;
pub mod easing;
pub mod error;
pub mod field;
pub mod gradient;
pub mod noise;
pub mod params;
pub mod path;
pub mod prng;
pub mod raster;
pub mod seed;
pub mod shape;
pub mod source;
pub mod transform;

pub use antialias::AntialiasingSource;
pub use buffered::BufferedColorSource;
pub use cache::{generate_cached, ImageCache, MemoryImageCache};
pub use color::RgbaColor;
pub use combine::{AddingSource, BlendingSource, LerpingSource, MultiplyingSource};
pub use easing::Easing;
pub use error::TextureError;
pub use field::Field;
pub use gradient::{ColorStops, LinearGradientSource, RadialGradientSource};
pub use path::{FillRule, Path, PathGeometry};
pub use prng::Xorshift64;
pub use raster::RasterImage;
pub use seed::TextureSeed;
pub use shape::{CircleSource, EllipseSource, PathSource, RectangleSource, RoofTilesSource};
pub use source::{ColorSource, ColorSourceExt, Domain, SharedSource, SolidSource};
pub use transform::{FisheyeSource, PolarSource, RotatingSource, ScalingSource, TranslatingSource};
