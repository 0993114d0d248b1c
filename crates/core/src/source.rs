//! The `ColorSource` trait and the toroidal domain every source lives on.
//!
//! A source is a pure function from a 2D position to an [`RgbaColor`], bound
//! to a fixed `width × height` domain. Public queries wrap the position into
//! the domain first, so every source tiles seamlessly and any composition of
//! sources tiles too.

use std::sync::Arc;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::raster::RasterImage;

/// Fixed integer extent of a source. Always at least 1×1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Domain {
    width: usize,
    height: usize,
}

impl Domain {
    /// Validates and creates a domain.
    ///
    /// Returns `TextureError::InvalidDimensions` if either side is zero or
    /// `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions);
        }
        width
            .checked_mul(height)
            .ok_or(TextureError::InvalidDimensions)?;
        Ok(Self { width, height })
    }

    /// Creates a domain, raising zero sides to 1.
    ///
    /// Unlike [`Domain::new`] this does not check that `width * height` fits
    /// in `usize`; use it for sizes that are already known to be valid.
    pub fn clamped(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Domain width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Domain height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels in the domain, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Center of the domain in continuous coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Wraps a point into `[0, width) × [0, height)`.
    pub fn wrap(&self, x: f64, y: f64) -> (f64, f64) {
        (
            wrap(x, 0.0, self.width as f64),
            wrap(y, 0.0, self.height as f64),
        )
    }

    /// Fails with `DimensionMismatch` unless `other` is the same domain.
    pub fn ensure_same(&self, other: Domain) -> Result<(), TextureError> {
        if *self != other {
            return Err(TextureError::DimensionMismatch {
                lhs_w: self.width,
                lhs_h: self.height,
                rhs_w: other.width,
                rhs_h: other.height,
            });
        }
        Ok(())
    }
}

/// Floor-modulo wrap of `v` into `[min, max)`; `wrap(-1.0, 0.0, 5.0) == 4.0`.
///
/// Non-finite input maps to `min`.
pub fn wrap(v: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !v.is_finite() || span <= 0.0 {
        return min;
    }
    let r = (v - min).rem_euclid(span);
    // rem_euclid can round up to `span` for tiny negative inputs.
    if r >= span {
        min
    } else {
        min + r
    }
}

/// A pixel-valued function over a toroidal domain.
///
/// Implementors provide [`sample`](ColorSource::sample), which is only ever
/// called with coordinates already inside the domain. Callers use
/// [`color_at`](ColorSource::color_at), which wraps first.
pub trait ColorSource: Send + Sync {
    /// The fixed extent of this source.
    fn domain(&self) -> Domain;

    /// Canonical-domain lookup: `0 <= x < width`, `0 <= y < height`.
    fn sample(&self, x: f64, y: f64) -> RgbaColor;

    /// Width of [`domain`](ColorSource::domain) in pixels.
    fn width(&self) -> usize {
        self.domain().width()
    }

    /// Height of [`domain`](ColorSource::domain) in pixels.
    fn height(&self) -> usize {
        self.domain().height()
    }

    /// Color at any point; the point is wrapped into the domain first.
    fn color_at(&self, x: f64, y: f64) -> RgbaColor {
        let (x, y) = self.domain().wrap(x, y);
        self.sample(x, y)
    }

    /// Writes every pixel of the domain into `buffer` at `(x0 + dx, y0 + dy)`.
    ///
    /// Destination pixels that fall outside `buffer` are skipped.
    fn generate_into(&self, buffer: &mut RasterImage, x0: isize, y0: isize) {
        let domain = self.domain();
        for dy in 0..domain.height() {
            for dx in 0..domain.width() {
                let color = self.sample(dx as f64, dy as f64);
                buffer.set(x0 + dx as isize, y0 + dy as isize, color);
            }
        }
    }

    /// Rasterizes the whole domain into a new image.
    fn generate_image(&self) -> RasterImage {
        let mut image = RasterImage::blank(self.domain());
        self.generate_into(&mut image, 0, 0);
        image
    }
}

/// A reference-counted source, the form composite sources hold children in.
pub type SharedSource = Arc<dyn ColorSource>;

impl<S: ColorSource + ?Sized> ColorSource for Arc<S> {
    fn domain(&self) -> Domain {
        (**self).domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        (**self).sample(x, y)
    }

    fn color_at(&self, x: f64, y: f64) -> RgbaColor {
        (**self).color_at(x, y)
    }
}

impl<S: ColorSource + ?Sized> ColorSource for Box<S> {
    fn domain(&self) -> Domain {
        (**self).domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        (**self).sample(x, y)
    }

    fn color_at(&self, x: f64, y: f64) -> RgbaColor {
        (**self).color_at(x, y)
    }
}

/// Conversion helpers available on every sized source.
pub trait ColorSourceExt: ColorSource + Sized + 'static {
    /// Moves the source behind an `Arc` so it can be handed to composites.
    fn shared(self) -> SharedSource {
        Arc::new(self)
    }
}

impl<S: ColorSource + Sized + 'static> ColorSourceExt for S {}

/// A single color over a domain.
#[derive(Debug, Clone, Copy)]
pub struct SolidSource {
    domain: Domain,
    color: RgbaColor,
}

impl SolidSource {
    pub fn new(domain: Domain, color: RgbaColor) -> Self {
        Self { domain, color }
    }

    pub fn color(&self) -> RgbaColor {
        self.color
    }
}

impl ColorSource for SolidSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, _x: f64, _y: f64) -> RgbaColor {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encodes the canonical coordinate into the color so wrapping is observable.
    struct CoordSource(Domain);

    impl ColorSource for CoordSource {
        fn domain(&self) -> Domain {
            self.0
        }

        fn sample(&self, x: f64, y: f64) -> RgbaColor {
            RgbaColor::opaque(x as u8, y as u8, 0)
        }
    }

    #[test]
    fn wrap_handles_negative_values() {
        assert_eq!(wrap(-1.0, 0.0, 5.0), 4.0);
        assert_eq!(wrap(5.0, 0.0, 5.0), 0.0);
        assert_eq!(wrap(12.5, 0.0, 5.0), 2.5);
        assert_eq!(wrap(-1e-17, 0.0, 5.0), 0.0);
        assert_eq!(wrap(f64::NAN, 0.0, 5.0), 0.0);
    }

    #[test]
    fn domain_new_rejects_zero_and_overflow() {
        assert!(Domain::new(0, 1).is_err());
        assert!(Domain::new(1, 0).is_err());
        assert!(Domain::new(usize::MAX, 2).is_err());
        assert!(Domain::new(3, 4).is_ok());
    }

    #[test]
    fn domain_clamped_raises_zero_to_one() {
        let d = Domain::clamped(0, 0);
        assert_eq!((d.width(), d.height()), (1, 1));
    }

    #[test]
    fn area_saturates_for_unchecked_domains() {
        assert_eq!(Domain::clamped(usize::MAX, 2).area(), usize::MAX);
        assert_eq!(Domain::clamped(7, 3).area(), 21);
    }

    #[test]
    fn ensure_same_reports_mismatch() {
        let a = Domain::clamped(4, 4);
        let b = Domain::clamped(4, 5);
        assert!(a.ensure_same(a).is_ok());
        assert!(matches!(
            a.ensure_same(b),
            Err(TextureError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn color_at_wraps_into_domain() {
        let src = CoordSource(Domain::clamped(5, 3));
        assert_eq!(src.color_at(-1.0, -1.0), RgbaColor::opaque(4, 2, 0));
        assert_eq!(src.color_at(7.0, 4.0), RgbaColor::opaque(2, 1, 0));
    }

    #[test]
    fn generate_into_offsets_and_clips() {
        let src = CoordSource(Domain::clamped(2, 2));
        let mut buffer = RasterImage::new(3, 3).unwrap();
        src.generate_into(&mut buffer, 2, 1);
        assert_eq!(buffer.get(2, 1), Some(RgbaColor::opaque(0, 0, 0)));
        assert_eq!(buffer.get(2, 2), Some(RgbaColor::opaque(0, 1, 0)));
        assert_eq!(buffer.get(0, 0), Some(RgbaColor::TRANSPARENT));
    }

    #[test]
    fn generate_image_covers_domain() {
        let src = CoordSource(Domain::clamped(4, 2));
        let image = src.generate_image();
        assert_eq!((image.width(), image.height()), (4, 2));
        assert_eq!(image.get(3, 1), Some(RgbaColor::opaque(3, 1, 0)));
    }

    #[test]
    fn shared_and_boxed_sources_delegate() {
        let shared = SolidSource::new(Domain::clamped(2, 2), RgbaColor::WHITE).shared();
        let boxed: Box<dyn ColorSource> = Box::new(CoordSource(Domain::clamped(3, 3)));
        assert_eq!(shared.color_at(9.0, 9.0), RgbaColor::WHITE);
        assert_eq!(boxed.color_at(4.0, 5.0), RgbaColor::opaque(1, 2, 0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn color_at_is_periodic(
                w in 1_usize..40,
                h in 1_usize..40,
                x in -200_i64..200,
                y in -200_i64..200,
            ) {
                let src = CoordSource(Domain::clamped(w, h));
                let (x, y) = (x as f64, y as f64);
                let base = src.color_at(x, y);
                prop_assert_eq!(base, src.color_at(x + w as f64, y));
                prop_assert_eq!(base, src.color_at(x, y + h as f64));
            }

            #[test]
            fn wrap_lands_in_range(v in -1e9_f64..1e9, span in 1e-3_f64..1e4) {
                let r = wrap(v, 0.0, span);
                prop_assert!(r >= 0.0 && r < span, "wrap({v}, 0, {span}) = {r}");
            }
        }
    }
}
