//! The immutable [`Color`] value.
//!
//! A `Color` stores unrounded RGB on the 0–255 scale plus alpha. Every other
//! model is derived on demand through [`crate::convert`] and rounded to
//! [`PRECISION`] decimal places when exposed, so that building a color from
//! one notation and reading the same notation back reproduces the input.
//!
//! Construction is strict: out-of-range components are rejected, never
//! clamped. Clamping only applies to colors derived by arithmetic (mixing,
//! blending, variations) through [`Color::from_rgb_clamped`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::convert::{
    hsl_to_rgb, hsv_to_rgb, lab_to_rgb, lch_to_rgb, normalize_hue, rgb_to_hex, rgb_to_hsl,
    rgb_to_hsv, rgb_to_lab, rgb_to_lch, rgb_to_xyz, round_to, Hsl, Hsv, Lab, Lch, Rgb, Xyz,
};
use crate::error::ColorError;
use crate::metrics::relative_luminance;
use crate::parse::parse_color;

/// Decimal places used for every derived model (HSL, HSV, LAB, LCh, XYZ).
pub const PRECISION: u32 = 2;

/// Luminance above which a color reads as "light" (black text wins).
const LIGHT_LUMINANCE_THRESHOLD: f64 = 0.179;

/// 8-bit RGB with alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// HSL with alpha. Hue in [0, 360), saturation and lightness in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

/// One color, readable in every supported model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    rgb: Rgb,
    alpha: f64,
}

fn check_finite(name: &str, value: f64) -> Result<f64, ColorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ColorError::InvalidColorFormat(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<f64, ColorError> {
    let value = check_finite(name, value)?;
    if value < min || value > max {
        return Err(ColorError::InvalidColorFormat(format!(
            "{name} must be in [{min}, {max}], got {value}"
        )));
    }
    Ok(value)
}

fn round_hue(h: f64) -> f64 {
    normalize_hue(round_to(h, PRECISION))
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color {
        rgb: Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        },
        alpha: 1.0,
    };

    /// Opaque white.
    pub const WHITE: Color = Color {
        rgb: Rgb {
            r: 255.0,
            g: 255.0,
            b: 255.0,
        },
        alpha: 1.0,
    };

    /// Parses any supported notation: hex, CSS functional notation
    /// (`rgb()`, `hsl()`, `hsv()`, `lab()`, `lch()` and their alpha forms),
    /// or a CSS color keyword.
    pub fn parse(input: &str) -> Result<Color, ColorError> {
        parse_color(input)
    }

    /// Creates an opaque color from 8-bit channels. Always valid.
    pub fn from_rgb8(rgb: [u8; 3]) -> Color {
        Color {
            rgb: Rgb {
                r: rgb[0] as f64,
                g: rgb[1] as f64,
                b: rgb[2] as f64,
            },
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from RGB channels in [0, 255].
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Result<Color, ColorError> {
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Creates a color from RGB channels in [0, 255] and alpha in [0, 1].
    pub fn from_rgba(r: f64, g: f64, b: f64, a: f64) -> Result<Color, ColorError> {
        Ok(Color {
            rgb: Rgb {
                r: check_range("red", r, 0.0, 255.0)?,
                g: check_range("green", g, 0.0, 255.0)?,
                b: check_range("blue", b, 0.0, 255.0)?,
            },
            alpha: check_range("alpha", a, 0.0, 1.0)?,
        })
    }

    /// Creates an opaque color from HSL. Hue may be any finite angle.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Result<Color, ColorError> {
        Self::from_hsla(h, s, l, 1.0)
    }

    /// Creates a color from HSL plus alpha.
    pub fn from_hsla(h: f64, s: f64, l: f64, a: f64) -> Result<Color, ColorError> {
        let hsl = Hsl {
            h: normalize_hue(check_finite("hue", h)?),
            s: check_range("saturation", s, 0.0, 100.0)?,
            l: check_range("lightness", l, 0.0, 100.0)?,
        };
        Ok(Color {
            rgb: hsl_to_rgb(hsl).clamped(),
            alpha: check_range("alpha", a, 0.0, 1.0)?,
        })
    }

    /// Creates a color from HSV plus alpha.
    pub fn from_hsva(h: f64, s: f64, v: f64, a: f64) -> Result<Color, ColorError> {
        let hsv = Hsv {
            h: normalize_hue(check_finite("hue", h)?),
            s: check_range("saturation", s, 0.0, 100.0)?,
            v: check_range("value", v, 0.0, 100.0)?,
        };
        Ok(Color {
            rgb: hsv_to_rgb(hsv).clamped(),
            alpha: check_range("alpha", a, 0.0, 1.0)?,
        })
    }

    /// Creates an opaque color from HSV.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Result<Color, ColorError> {
        Self::from_hsva(h, s, v, 1.0)
    }

    /// Creates a color from CIE LAB plus alpha.
    ///
    /// Out-of-gamut coordinates are accepted and clamped to sRGB.
    pub fn from_laba(l: f64, a: f64, b: f64, alpha: f64) -> Result<Color, ColorError> {
        let lab = Lab {
            l: check_range("lightness", l, 0.0, 100.0)?,
            a: check_finite("a", a)?,
            b: check_finite("b", b)?,
        };
        Ok(Color {
            rgb: lab_to_rgb(lab),
            alpha: check_range("alpha", alpha, 0.0, 1.0)?,
        })
    }

    /// Creates an opaque color from CIE LAB.
    pub fn from_lab(l: f64, a: f64, b: f64) -> Result<Color, ColorError> {
        Self::from_laba(l, a, b, 1.0)
    }

    /// Creates a color from CIE LCh plus alpha.
    pub fn from_lcha(l: f64, c: f64, h: f64, alpha: f64) -> Result<Color, ColorError> {
        let lch = Lch {
            l: check_range("lightness", l, 0.0, 100.0)?,
            c: check_range("chroma", c, 0.0, f64::MAX)?,
            h: normalize_hue(check_finite("hue", h)?),
        };
        Ok(Color {
            rgb: lch_to_rgb(lch),
            alpha: check_range("alpha", alpha, 0.0, 1.0)?,
        })
    }

    /// Creates an opaque color from CIE LCh.
    pub fn from_lch(l: f64, c: f64, h: f64) -> Result<Color, ColorError> {
        Self::from_lcha(l, c, h, 1.0)
    }

    /// Creates a color from the result of arithmetic, clamping RGB to
    /// [0, 255] and alpha to [0, 1]. Non-finite channels become 0.
    pub fn from_rgb_clamped(rgb: Rgb, alpha: f64) -> Color {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Color {
            rgb: Rgb {
                r: finite(rgb.r),
                g: finite(rgb.g),
                b: finite(rgb.b),
            }
            .clamped(),
            alpha: if alpha.is_finite() {
                alpha.clamp(0.0, 1.0)
            } else {
                1.0
            },
        }
    }

    /// Returns a copy with a different alpha in [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Result<Color, ColorError> {
        Ok(Color {
            rgb: self.rgb,
            alpha: check_range("alpha", alpha, 0.0, 1.0)?,
        })
    }

    /// 8-bit RGB channels and alpha.
    pub fn rgb(&self) -> Rgba {
        let [r, g, b] = self.rgb.to_u8();
        Rgba {
            r,
            g,
            b,
            a: round_to(self.alpha, PRECISION),
        }
    }

    /// Unrounded RGB on the 0–255 scale, for further arithmetic.
    pub fn rgb_f64(&self) -> Rgb {
        self.rgb
    }

    /// Alpha in [0, 1].
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// HSL with alpha, rounded to [`PRECISION`] places.
    pub fn hsl(&self) -> Hsla {
        let hsl = rgb_to_hsl(self.rgb);
        Hsla {
            h: round_hue(hsl.h),
            s: round_to(hsl.s, PRECISION),
            l: round_to(hsl.l, PRECISION),
            a: round_to(self.alpha, PRECISION),
        }
    }

    /// HSV, rounded to [`PRECISION`] places.
    pub fn hsv(&self) -> Hsv {
        let hsv = rgb_to_hsv(self.rgb);
        Hsv {
            h: round_hue(hsv.h),
            s: round_to(hsv.s, PRECISION),
            v: round_to(hsv.v, PRECISION),
        }
    }

    /// CIE LAB (D65), rounded to [`PRECISION`] places.
    pub fn lab(&self) -> Lab {
        let lab = rgb_to_lab(self.rgb);
        Lab {
            l: round_to(lab.l, PRECISION),
            a: round_to(lab.a, PRECISION),
            b: round_to(lab.b, PRECISION),
        }
    }

    /// CIE LCh (D65), rounded to [`PRECISION`] places.
    pub fn lch(&self) -> Lch {
        let lch = rgb_to_lch(self.rgb);
        Lch {
            l: round_to(lch.l, PRECISION),
            c: round_to(lch.c, PRECISION),
            h: round_hue(lch.h),
        }
    }

    /// CIE XYZ (D65, 0–100 scale), rounded to [`PRECISION`] places.
    pub fn xyz(&self) -> Xyz {
        let xyz = rgb_to_xyz(self.rgb);
        Xyz {
            x: round_to(xyz.x, PRECISION),
            y: round_to(xyz.y, PRECISION),
            z: round_to(xyz.z, PRECISION),
        }
    }

    /// Lowercase `#rrggbb`, or `#rrggbbaa` when the color is translucent.
    pub fn hex(&self) -> String {
        rgb_to_hex(self.rgb, self.alpha)
    }

    /// True when dark text reads better on this color than light text.
    pub fn is_light(&self) -> bool {
        relative_luminance(self) > LIGHT_LUMINANCE_THRESHOLD
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_color(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- Construction --

    #[test]
    fn from_rgb_rejects_out_of_range_channel() {
        let err = Color::from_rgb(256.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, ColorError::InvalidColorFormat(_)));
        assert!(format!("{err}").contains("red"), "message: {err}");
    }

    #[test]
    fn from_rgba_rejects_alpha_above_one() {
        assert!(Color::from_rgba(0.0, 0.0, 0.0, 1.5).is_err());
    }

    #[test]
    fn from_rgb_rejects_nan() {
        assert!(Color::from_rgb(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn from_hsl_rejects_saturation_above_100() {
        assert!(Color::from_hsl(120.0, 101.0, 50.0).is_err());
    }

    #[test]
    fn from_hsl_normalizes_hue() {
        let c = Color::from_hsl(-120.0, 100.0, 50.0).unwrap();
        assert_eq!(c.hsl().h, 240.0);
        assert_eq!(c.hex(), "#0000ff");
    }

    #[test]
    fn from_hsl_accepts_hue_of_720() {
        let c = Color::from_hsl(720.0, 100.0, 50.0).unwrap();
        assert_eq!(c.hex(), "#ff0000");
    }

    #[test]
    fn from_lab_rejects_lightness_above_100() {
        assert!(Color::from_lab(120.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn from_lch_rejects_negative_chroma() {
        assert!(Color::from_lch(50.0, -1.0, 0.0).is_err());
    }

    #[test]
    fn from_lab_out_of_gamut_is_clamped() {
        let c = Color::from_lab(50.0, 127.0, -127.0).unwrap();
        let rgb = c.rgb_f64();
        for ch in [rgb.r, rgb.g, rgb.b] {
            assert!((0.0..=255.0).contains(&ch), "channel {ch} out of range");
        }
    }

    #[test]
    fn from_rgb_clamped_clamps_arithmetic_results() {
        let c = Color::from_rgb_clamped(
            Rgb {
                r: 300.0,
                g: -5.0,
                b: f64::NAN,
            },
            2.0,
        );
        assert_eq!(c.rgb(), Rgba { r: 255, g: 0, b: 0, a: 1.0 });
    }

    // -- Accessors --

    #[test]
    fn hex_round_trip_reproduces_input() {
        for hex in ["#000000", "#ffffff", "#3366cc", "#c0ffee", "#12345678"] {
            let c = Color::parse(hex).unwrap();
            assert_eq!(c.hex(), hex);
        }
    }

    #[test]
    fn hsl_round_trip_reproduces_input() {
        let c = Color::from_hsl(210.5, 45.25, 33.75).unwrap();
        let hsl = c.hsl();
        assert!(approx_eq(hsl.h, 210.5), "h: {}", hsl.h);
        assert!(approx_eq(hsl.s, 45.25), "s: {}", hsl.s);
        assert!(approx_eq(hsl.l, 33.75), "l: {}", hsl.l);
    }

    #[test]
    fn hsv_round_trip_reproduces_input() {
        let c = Color::from_hsv(42.0, 80.0, 60.0).unwrap();
        let hsv = c.hsv();
        assert!(approx_eq(hsv.h, 42.0), "h: {}", hsv.h);
        assert!(approx_eq(hsv.s, 80.0), "s: {}", hsv.s);
        assert!(approx_eq(hsv.v, 60.0), "v: {}", hsv.v);
    }

    #[test]
    fn lab_round_trip_reproduces_in_gamut_input() {
        let c = Color::from_lab(60.0, 20.0, -30.0).unwrap();
        let lab = c.lab();
        assert!((lab.l - 60.0).abs() <= 0.01, "l: {}", lab.l);
        assert!((lab.a - 20.0).abs() <= 0.01, "a: {}", lab.a);
        assert!((lab.b + 30.0).abs() <= 0.01, "b: {}", lab.b);
    }

    #[test]
    fn lch_round_trip_reproduces_in_gamut_input() {
        let c = Color::from_lch(55.0, 30.0, 140.0).unwrap();
        let lch = c.lch();
        assert!((lch.l - 55.0).abs() <= 0.01, "l: {}", lch.l);
        assert!((lch.c - 30.0).abs() <= 0.01, "c: {}", lch.c);
        assert!((lch.h - 140.0).abs() <= 0.01, "h: {}", lch.h);
    }

    #[test]
    fn rgb_accessor_reports_alpha() {
        let c = Color::from_rgba(10.0, 20.0, 30.0, 0.25).unwrap();
        assert_eq!(
            c.rgb(),
            Rgba {
                r: 10,
                g: 20,
                b: 30,
                a: 0.25
            }
        );
        assert_eq!(c.hex(), "#0a141e40");
    }

    #[test]
    fn derived_models_are_rounded_to_two_places() {
        let c = Color::parse("#123456").unwrap();
        let hsl = c.hsl();
        for v in [hsl.h, hsl.s, hsl.l] {
            assert!(approx_eq(v, round_to(v, 2)), "{v} not rounded");
        }
        let lab = c.lab();
        for v in [lab.l, lab.a, lab.b] {
            assert!(approx_eq(v, round_to(v, 2)), "{v} not rounded");
        }
    }

    #[test]
    fn with_alpha_replaces_alpha_only() {
        let c = Color::parse("#ff0000").unwrap().with_alpha(0.5).unwrap();
        assert_eq!(c.rgb().r, 255);
        assert!(approx_eq(c.alpha(), 0.5));
        assert!(Color::BLACK.with_alpha(-0.1).is_err());
    }

    #[test]
    fn is_light_distinguishes_white_and_black() {
        assert!(Color::WHITE.is_light());
        assert!(!Color::BLACK.is_light());
        assert!(Color::parse("yellow").unwrap().is_light());
        assert!(!Color::parse("navy").unwrap().is_light());
    }

    // -- Traits --

    #[test]
    fn display_and_from_str_agree() {
        let c: Color = "rgb(255, 128, 0)".parse().unwrap();
        assert_eq!(c.to_string(), "#ff8000");
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let c = Color::parse("red").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#ff0000\"");
    }

    #[test]
    fn color_deserializes_from_any_notation() {
        let c: Color = serde_json::from_str("\"hsl(120, 100%, 50%)\"").unwrap();
        assert_eq!(c.hex(), "#00ff00");
    }

    #[test]
    fn color_deserialize_rejects_invalid_input() {
        let result: Result<Color, _> = serde_json::from_str("\"not-a-color\"");
        assert!(result.is_err());
    }

    #[test]
    fn color_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Color>();
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex_round_trip_is_exact(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
                let c = Color::from_rgb8([r, g, b]);
                let back = Color::parse(&c.hex()).unwrap();
                prop_assert_eq!(back.rgb(), c.rgb());
            }

            #[test]
            fn hsl_round_trip_within_one_hundredth(
                h in 0.0_f64..360.0,
                s in 0.0_f64..=100.0,
                l in 1.0_f64..=99.0,
            ) {
                let (h, s, l) = (round_to(h, 2), round_to(s, 2), round_to(l, 2));
                let hsl = Color::from_hsl(h, s, l).unwrap().hsl();
                prop_assert!((hsl.l - l).abs() <= 0.011, "l: {} vs {}", hsl.l, l);
                // Saturation and hue are only recoverable when the color has chroma.
                if s > 1.0 {
                    prop_assert!((hsl.s - s).abs() <= 0.011, "s: {} vs {}", hsl.s, s);
                    let dh = (hsl.h - h).abs();
                    prop_assert!(dh <= 0.011 || (360.0 - dh) <= 0.011, "h: {} vs {}", hsl.h, h);
                }
            }

            #[test]
            fn exposed_hues_are_in_range(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
                let c = Color::from_rgb8([r, g, b]);
                for h in [c.hsl().h, c.hsv().h, c.lch().h] {
                    prop_assert!((0.0..360.0).contains(&h), "hue {} out of range", h);
                }
            }
        }
    }
}
