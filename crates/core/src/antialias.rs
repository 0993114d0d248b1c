//! Four-tap supersampling wrapper.

use crate::color::RgbaColor;
use crate::source::{ColorSource, Domain, SharedSource};

/// Smooths hard edges by averaging four sub-pixel taps.
///
/// The taps sit at `(x, y)`, `(x + 0.5, y)`, `(x, y + 0.5)` and
/// `(x + 0.5, y + 0.5)` and are combined with two nested 50/50 lerps. The
/// inner source is resampled four times per pixel, so expensive graphs
/// belong behind a `BufferedColorSource` first.
#[derive(Clone)]
pub struct AntialiasingSource {
    source: SharedSource,
}

impl AntialiasingSource {
    pub fn new(source: SharedSource) -> Self {
        Self { source }
    }
}

impl ColorSource for AntialiasingSource {
    fn domain(&self) -> Domain {
        self.source.domain()
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        let top = self
            .source
            .color_at(x, y)
            .lerp(self.source.color_at(x + 0.5, y), 0.5);
        let bottom = self
            .source
            .color_at(x, y + 0.5)
            .lerp(self.source.color_at(x + 0.5, y + 0.5), 0.5);
        top.lerp(bottom, 0.5)
    }
}
