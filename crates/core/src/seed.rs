//! Reproducible description of a rendered texture.
//!
//! A [`TextureSeed`] captures everything needed to rebuild a texture: preset
//! name, dimensions, parameter overrides and PRNG seed.

use crate::error::TextureError;
use crate::source::Domain;
use serde::{Deserialize, Serialize};

/// Preset name, size, parameters and PRNG seed of one texture.
///
/// Two identical seeds fed to the same preset registry produce identical
/// rasters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextureSeed {
    pub preset: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl TextureSeed {
    /// Creates a seed with empty params (`{}`).
    pub fn new(preset: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            preset: preset.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
        }
    }

    /// Validates the dimensions, returning the domain they describe.
    pub fn validate(&self) -> Result<Domain, TextureError> {
        Domain::new(self.width, self.height)
    }

    /// A file-name-safe identifier for image caches, unique per seed content.
    pub fn cache_id(&self) -> String {
        let params = serde_json::to_string(&self.params).unwrap_or_default();
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in params.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        format!(
            "{}-{}x{}-{}-{hash:016x}",
            self.preset, self.width, self.height, self.seed
        )
    }
}
