//! Pointwise binary combinators over two sources of the same domain.

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::source::{ColorSource, Domain, SharedSource};

fn check_domains(first: &SharedSource, second: &SharedSource) -> Result<Domain, TextureError> {
    let domain = first.domain();
    domain.ensure_same(second.domain())?;
    Ok(domain)
}

/// Premultiplied additive combination (see [`RgbaColor::add`]).
#[derive(Clone)]
pub struct AddingSource {
    domain: Domain,
    first: SharedSource,
    second: SharedSource,
}

impl AddingSource {
    pub fn new(first: SharedSource, second: SharedSource) -> Result<Self, TextureError> {
        Ok(Self {
            domain: check_domains(&first, &second)?,
            first,
            second,
        })
    }
}

impl ColorSource for AddingSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        self.first.color_at(x, y).add(self.second.color_at(x, y))
    }
}

/// Channelwise product (see [`RgbaColor::multiply`]).
#[derive(Clone)]
pub struct MultiplyingSource {
    domain: Domain,
    first: SharedSource,
    second: SharedSource,
}

impl MultiplyingSource {
    pub fn new(first: SharedSource, second: SharedSource) -> Result<Self, TextureError> {
        Ok(Self {
            domain: check_domains(&first, &second)?,
            first,
            second,
        })
    }
}

impl ColorSource for MultiplyingSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        self.first.color_at(x, y).multiply(self.second.color_at(x, y))
    }
}

/// `top` composited over `bottom` (see [`RgbaColor::blend`]).
#[derive(Clone)]
pub struct BlendingSource {
    domain: Domain,
    bottom: SharedSource,
    top: SharedSource,
}

impl BlendingSource {
    pub fn new(bottom: SharedSource, top: SharedSource) -> Result<Self, TextureError> {
        Ok(Self {
            domain: check_domains(&bottom, &top)?,
            bottom,
            top,
        })
    }
}

impl ColorSource for BlendingSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        self.bottom.color_at(x, y).blend(self.top.color_at(x, y))
    }
}

/// Fixed-coefficient interpolation: `t = 0` yields `first`, `t = 1` yields `second`.
#[derive(Clone)]
pub struct LerpingSource {
    domain: Domain,
    first: SharedSource,
    second: SharedSource,
    t: f64,
}

impl LerpingSource {
    pub fn new(first: SharedSource, second: SharedSource, t: f64) -> Result<Self, TextureError> {
        Ok(Self {
            domain: check_domains(&first, &second)?,
            first,
            second,
            t,
        })
    }
}

impl ColorSource for LerpingSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn sample(&self, x: f64, y: f64) -> RgbaColor {
        self.first
            .color_at(x, y)
            .lerp(self.second.color_at(x, y), self.t)
    }
}
