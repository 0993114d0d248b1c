//! The 8-bit RGBA color value every source produces.
//!
//! Channels are integers in [0, 255]. Every constructor and operation clamps
//! and rounds its result, so no sequence of operations can leave the range.

use crate::error::TextureError;
use crate::prng::Xorshift64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Immutable 4-channel color with saturating arithmetic.
///
/// Serializes as a hex string: `"#rrggbb"` when opaque, `"#rrggbbaa"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Clamps and rounds a real channel value into [0, 255].
fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

impl RgbaColor {
    pub const BLACK: RgbaColor = RgbaColor::opaque(0, 0, 0);
    pub const WHITE: RgbaColor = RgbaColor::opaque(255, 255, 255);
    pub const TRANSPARENT: RgbaColor = RgbaColor::rgba8(0, 0, 0, 0);

    /// Builds a color from raw 8-bit channels.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque color from raw 8-bit channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Builds a color from real-valued channels, rounding and clamping each to [0, 255].
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: channel(a),
        }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional, case insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, TextureError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        // from_str_radix alone would accept a leading sign.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TextureError::InvalidColor(format!(
                "{hex:?} contains non-hex characters"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| TextureError::InvalidColor(format!("{hex:?}: {e}")))
        };
        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|n| n * 17)
                        .map_err(|e| TextureError::InvalidColor(format!("{hex:?}: {e}")))
                };
                Ok(Self::opaque(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            n => Err(TextureError::InvalidColor(format!(
                "expected 3, 6 or 8 hex digits, got {n}"
            ))),
        }
    }

    /// Formats the color as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        let Self { r, g, b, a } = self;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Multiplies the color channels (not alpha) by `k`.
    pub fn scale(self, k: f64) -> Self {
        Self::new(
            self.r as f64 * k,
            self.g as f64 * k,
            self.b as f64 * k,
            self.a as f64,
        )
    }

    /// Channelwise product, treating 255 as 1.0. Multiplying by white is the identity.
    pub fn multiply(self, other: Self) -> Self {
        let mul = |x: u8, y: u8| x as f64 * y as f64 / 255.0;
        Self::new(
            mul(self.r, other.r),
            mul(self.g, other.g),
            mul(self.b, other.b),
            mul(self.a, other.a),
        )
    }

    /// Additive combination in premultiplied space.
    ///
    /// Premultiplied channels are summed, alpha saturates at 255, and the
    /// result is un-premultiplied. A fully transparent operand contributes
    /// nothing, so `c.add(TRANSPARENT) == c`.
    pub fn add(self, other: Self) -> Self {
        if other.a == 0 {
            return self;
        }
        if self.a == 0 {
            return other;
        }
        let (a1, a2) = (self.a as f64, other.a as f64);
        let alpha = (a1 + a2).min(255.0);
        let sum = |c1: u8, c2: u8| (c1 as f64 * a1 + c2 as f64 * a2) / alpha;
        Self::new(
            sum(self.r, other.r),
            sum(self.g, other.g),
            sum(self.b, other.b),
            alpha,
        )
    }

    /// Composites `top` over `self` using standard "over" alpha blending.
    pub fn blend(self, top: Self) -> Self {
        let at = top.a as f64 / 255.0;
        let ab = self.a as f64 / 255.0;
        let alpha = at + ab * (1.0 - at);
        if alpha <= 0.0 {
            return Self::TRANSPARENT;
        }
        let over = |ct: u8, cb: u8| (ct as f64 * at + cb as f64 * ab * (1.0 - at)) / alpha;
        Self::new(
            over(top.r, self.r),
            over(top.g, self.g),
            over(top.b, self.b),
            alpha * 255.0,
        )
    }

    /// Linear interpolation toward `other`; `t` is clamped to [0, 1].
    ///
    /// `t = 0` returns `self` and `t = 1` returns `other` exactly.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |x: u8, y: u8| x as f64 + (y as f64 - x as f64) * t;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Perturbs the color channels by random deltas in `[-intensity*255, intensity*255]`.
    ///
    /// `saturation` 0 moves R, G and B by one shared delta (brightness noise);
    /// 1 gives each channel an independent delta (hue noise); values between
    /// blend the two. Alpha is untouched.
    pub fn noise(self, rng: &mut Xorshift64, intensity: f64, saturation: f64) -> Self {
        let amplitude = intensity.max(0.0) * 255.0;
        let saturation = saturation.clamp(0.0, 1.0);
        let shared = rng.next_signed();
        let mut delta =
            || (shared * (1.0 - saturation) + rng.next_signed() * saturation) * amplitude;
        let (dr, dg, db) = (delta(), delta(), delta());
        Self::new(
            self.r as f64 + dr,
            self.g as f64 + dg,
            self.b as f64 + db,
            self.a as f64,
        )
    }

    pub fn with_red(self, r: u8) -> Self {
        Self { r, ..self }
    }

    pub fn with_green(self, g: u8) -> Self {
        Self { g, ..self }
    }

    pub fn with_blue(self, b: u8) -> Self {
        Self { b, ..self }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// The channels as `[r, g, b, a]` bytes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::str::FromStr for RgbaColor {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for RgbaColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RgbaColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RgbaColor::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
