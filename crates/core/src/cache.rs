//! Persistent image cache seam.
//!
//! Expensive textures can be stored under a string id and reloaded instead of
//! regenerated. The cache is optional: a miss, or no cache at all, always
//! falls back to full rasterization.

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

use crate::raster::RasterImage;
use crate::source::ColorSource;

/// Storage for rasterized textures keyed by id.
pub trait ImageCache: Send + Sync {
    /// Returns the stored image, or `None` on a miss.
    fn load(&self, id: &str) -> Option<RasterImage>;

    /// Stores an image. Failures are the implementation's to report; callers
    /// never depend on a store succeeding.
    fn store(&self, id: &str, image: &RasterImage);
}

/// Loads `id` from `cache` or rasterizes `source` and stores the result.
///
/// A cached image whose size differs from the source's domain counts as a miss.
pub fn generate_cached(
    cache: Option<&dyn ImageCache>,
    id: &str,
    source: &dyn ColorSource,
) -> RasterImage {
    let Some(cache) = cache else {
        return source.generate_image();
    };
    if let Some(image) = cache.load(id) {
        if image.domain() == source.domain() {
            debug!("image cache hit for '{id}'");
            return image;
        }
        debug!("image cache entry '{id}' has stale dimensions, regenerating");
    }
    let image = source.generate_image();
    cache.store(id, &image);
    image
}

/// An in-process cache, useful for tests and for sharing rasters between graphs.
#[derive(Debug, Default)]
pub struct MemoryImageCache {
    entries: Mutex<HashMap<String, RasterImage>>,
}

impl MemoryImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageCache for MemoryImageCache {
    fn load(&self, id: &str) -> Option<RasterImage> {
        self.entries.lock().ok()?.get(id).cloned()
    }

    fn store(&self, id: &str, image: &RasterImage) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id.to_string(), image.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RgbaColor;
    use crate::source::{Domain, SolidSource};

    #[test]
    fn without_cache_generates_directly() {
        let src = SolidSource::new(Domain::clamped(3, 3), RgbaColor::WHITE);
        let image = generate_cached(None, "solid", &src);
        assert_eq!(image.get(2, 2), Some(RgbaColor::WHITE));
    }

    #[test]
    fn miss_stores_and_hit_reuses() {
        let cache = MemoryImageCache::new();
        let white = SolidSource::new(Domain::clamped(2, 2), RgbaColor::WHITE);
        let black = SolidSource::new(Domain::clamped(2, 2), RgbaColor::BLACK);

        let first = generate_cached(Some(&cache), "tex", &white);
        assert_eq!(cache.len(), 1);
        // Same id: the stored white raster wins over the black source.
        let second = generate_cached(Some(&cache), "tex", &black);
        assert_eq!(first, second);
    }

    #[test]
    fn stale_dimensions_regenerate() {
        let cache = MemoryImageCache::new();
        let small = SolidSource::new(Domain::clamped(2, 2), RgbaColor::WHITE);
        let large = SolidSource::new(Domain::clamped(4, 4), RgbaColor::BLACK);
        generate_cached(Some(&cache), "tex", &small);
        let image = generate_cached(Some(&cache), "tex", &large);
        assert_eq!(image.width(), 4);
        assert_eq!(image.get(3, 3), Some(RgbaColor::BLACK));
    }
}
