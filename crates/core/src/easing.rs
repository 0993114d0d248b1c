//! Easing curves on the unit interval.
//!
//! Each curve clamps its input to [0, 1] and maps 0 to 0 and 1 to 1.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub fn linear(t: f64) -> f64 {
    unit(t)
}

/// Quarter-circle ease-out: `sqrt(1 - (1 - t)^2)`.
pub fn arc(t: f64) -> f64 {
    let u = 1.0 - unit(t);
    (1.0 - u * u).sqrt()
}

/// Quarter-circle ease-in: `1 - sqrt(1 - t^2)`.
pub fn inv_arc(t: f64) -> f64 {
    let t = unit(t);
    1.0 - (1.0 - t * t).sqrt()
}

/// Cosine ease-in-out: `(1 - cos(pi * t)) / 2`.
pub fn sin(t: f64) -> f64 {
    (1.0 - (PI * unit(t)).cos()) / 2.0
}

fn unit(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// A selectable easing curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    Arc,
    InvArc,
    Sin,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => linear(t),
            Easing::Arc => arc(t),
            Easing::InvArc => inv_arc(t),
            Easing::Sin => sin(t),
        }
    }
}
