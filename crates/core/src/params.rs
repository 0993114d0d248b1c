//! Lenient typed lookups into a texture's JSON parameter object.
//!
//! Each helper takes the parameter object, a key and a default. A missing key
//! or a value of the wrong shape yields the default, so a preset can always be
//! built from a partial or empty `{}` object.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::color::RgbaColor;

/// Reads a number from `params[name]`. Integers are accepted and widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer from `params[name]`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a hex color string (`#rgb`, `#rrggbb`, `#rrggbbaa`) from `params[name]`.
///
/// Unparseable strings fall back to `default` like any other wrong-typed value.
pub fn param_color(params: &Value, name: &str, default: RgbaColor) -> RgbaColor {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| RgbaColor::from_hex(s).ok())
        .unwrap_or(default)
}

/// Deserializes a snake_case enum value (`"manhattan"`, `"inv_arc"`, ...) from `params[name]`.
pub fn param_enum<T: DeserializeOwned>(params: &Value, name: &str, default: T) -> T {
    params
        .get(name)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use serde_json::json;

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"scale": 2.5, "octaves": 6});
        assert!((param_f64(&params, "scale", 1.0) - 2.5).abs() < f64::EPSILON);
        assert!((param_f64(&params, "octaves", 0.0) - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_on_missing_or_wrong_type() {
        let params = json!({"scale": "large", "intensity": null});
        assert!((param_f64(&params, "scale", 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "intensity", 0.2) - 0.2).abs() < f64::EPSILON);
        assert!((param_f64(&params, "absent", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "scale", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_rejects_fractions_and_negatives() {
        let params = json!({"density": 64, "half": 2.5, "neg": -1});
        assert_eq!(param_usize(&params, "density", 0), 64);
        assert_eq!(param_usize(&params, "half", 99), 99);
        assert_eq!(param_usize(&params, "neg", 5), 5);
    }

    #[test]
    fn param_color_parses_hex() {
        let params = json!({"color1": "#ff8000", "color2": "00ff0088"});
        assert_eq!(
            param_color(&params, "color1", RgbaColor::BLACK),
            RgbaColor::opaque(255, 128, 0)
        );
        assert_eq!(
            param_color(&params, "color2", RgbaColor::BLACK),
            RgbaColor::rgba8(0, 255, 0, 136)
        );
    }

    #[test]
    fn param_color_falls_back_on_bad_input() {
        let params = json!({"color1": "#nothex", "color2": 12});
        assert_eq!(param_color(&params, "color1", RgbaColor::WHITE), RgbaColor::WHITE);
        assert_eq!(param_color(&params, "color2", RgbaColor::WHITE), RgbaColor::WHITE);
    }

    #[test]
    fn param_enum_reads_snake_case_names() {
        let params = json!({"easing": "inv_arc", "bad": "wobbly"});
        assert_eq!(param_enum(&params, "easing", Easing::Linear), Easing::InvArc);
        assert_eq!(param_enum(&params, "bad", Easing::Sin), Easing::Sin);
        assert_eq!(param_enum(&params, "absent", Easing::Arc), Easing::Arc);
    }
}
