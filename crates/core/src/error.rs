//! Error types for the texgen core.

use thiserror::Error;

/// Errors produced while constructing color sources and textures.
///
/// Only construction can fail; sampling a built source never errors.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Width or height was zero, or `width * height` overflowed `usize`.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two sources (or a buffer and its data) had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A numeric or named parameter was outside its legal range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A preset name was not recognized by the registry.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// Reading or writing an image failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl TextureError {
    /// Shorthand for [`TextureError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        TextureError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
