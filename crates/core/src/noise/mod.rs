//! Procedural noise generators.
//!
//! Everything random is drawn at construction from an explicit seed; built
//! generators are read-only apart from the uniform-noise memo.

pub mod cellular;
pub mod circles;
pub mod perlin;
pub mod texture;
pub mod uniform;

pub use cellular::{CellularKind, CellularParams, CellularTexture, DistanceMetric};
pub use circles::{CirclesParams, CirclesTexture};
pub use perlin::PerlinGrid;
pub use texture::{PerlinParams, PerlinPattern, PerlinTexture};
pub use uniform::{UniformNoiseParams, UniformNoiseSource};
