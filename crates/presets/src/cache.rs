//! An [`ImageCache`] that keeps one PNG per texture id in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use texgen_core::{ImageCache, RasterImage};

use crate::snapshot::{read_png, write_png};

/// Directory-backed image cache.
///
/// Ids are mapped to file names by replacing anything outside
/// `[A-Za-z0-9._-]` with `_`. Unreadable entries count as misses and failed
/// writes are logged; neither ever reaches the caller.
#[derive(Debug, Clone)]
pub struct PngDirCache {
    dir: PathBuf,
}

impl PngDirCache {
    /// The directory is created lazily on the first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for `id` lives.
    pub fn path_for(&self, id: &str) -> PathBuf {
        let name: String = id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.png"))
    }
}

impl ImageCache for PngDirCache {
    fn load(&self, id: &str) -> Option<RasterImage> {
        let path = self.path_for(id);
        if !path.is_file() {
            return None;
        }
        match read_png(&path) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("ignoring unreadable cache entry {}: {e}", path.display());
                None
            }
        }
    }

    fn store(&self, id: &str, image: &RasterImage) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("cannot create cache directory {}: {e}", self.dir.display());
            return;
        }
        let path = self.path_for(id);
        match write_png(image, &path) {
            Ok(()) => debug!("cached '{id}' at {}", path.display()),
            Err(e) => warn!("cannot write cache entry {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texgen_core::{generate_cached, ColorSource, Domain, RgbaColor, SolidSource};

    #[test]
    fn ids_become_safe_file_names() {
        let cache = PngDirCache::new("/tmp/textures");
        assert_eq!(
            cache.path_for("clouds-64x64-7"),
            Path::new("/tmp/textures/clouds-64x64-7.png")
        );
        assert_eq!(
            cache.path_for("../etc/passwd"),
            Path::new("/tmp/textures/.._etc_passwd.png")
        );
    }

    #[test]
    fn miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PngDirCache::new(dir.path().join("nested"));
        assert!(cache.load("tex").is_none());

        let white = SolidSource::new(Domain::clamped(4, 3), RgbaColor::WHITE);
        let first = generate_cached(Some(&cache), "tex", &white);
        assert!(cache.path_for("tex").is_file());

        let black = SolidSource::new(Domain::clamped(4, 3), RgbaColor::BLACK);
        let second = generate_cached(Some(&cache), "tex", &black);
        assert_eq!(first, second);
        assert_eq!(second, white.generate_image());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PngDirCache::new(dir.path());
        fs::write(cache.path_for("broken"), b"not a png").unwrap();
        assert!(cache.load("broken").is_none());
    }

    #[test]
    fn failed_store_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        // The cache directory path is an existing file, so creation fails.
        let cache = PngDirCache::new(&blocker);
        let image = RasterImage::new(2, 2).unwrap();
        cache.store("tex", &image);
        assert!(cache.load("tex").is_none());
    }
}
