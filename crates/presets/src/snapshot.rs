//! PNG encoding of rasterized textures.
//!
//! This module is feature-gated behind `png` (default on) so that embedders
//! can depend on the registry without pulling in the `image` crate.

use std::path::Path;

use texgen_core::{RasterImage, TextureError};

/// Writes an image as an RGBA PNG.
///
/// Returns `TextureError::InvalidDimensions` if the image dimensions overflow
/// `u32`, or `TextureError::Io` on write failure.
pub fn write_png(image: &RasterImage, path: &Path) -> Result<(), TextureError> {
    let w = u32::try_from(image.width()).map_err(|_| TextureError::InvalidDimensions)?;
    let h = u32::try_from(image.height()).map_err(|_| TextureError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, image.to_rgba8())
        .ok_or_else(|| TextureError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| TextureError::Io(e.to_string()))
}

/// Reads any PNG back as an RGBA image.
pub fn read_png(path: &Path) -> Result<RasterImage, TextureError> {
    let img = image::open(path)
        .map_err(|e| TextureError::Io(e.to_string()))?
        .to_rgba8();
    RasterImage::from_rgba8(img.width() as usize, img.height() as usize, img.as_raw())
}
