//! Color model types and conversion functions.
//!
//! Every conversion is a pure, total function between two model structs.
//! RGB channels are carried unrounded on the 0–255 scale so that chains of
//! conversions do not accumulate 8-bit quantization; rounding happens only
//! when a [`Color`](crate::Color) exposes a model to callers.
//!
//! LAB uses the CIE XYZ intermediate with the D65 reference white. Results of
//! LAB/LCh to RGB that fall outside the sRGB gamut are clamped per channel.

use serde::{Deserialize, Serialize};

/// D65 reference white, X component (0–100 scale).
pub const D65_XN: f64 = 95.047;
/// D65 reference white, Y component (0–100 scale).
pub const D65_YN: f64 = 100.0;
/// D65 reference white, Z component (0–100 scale).
pub const D65_ZN: f64 = 108.883;

/// Threshold of the LAB nonlinearity.
const LAB_DELTA: f64 = 6.0 / 29.0;

/// RGB color with unrounded channels on the 0–255 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear-light RGB (gamma-decoded), channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// HSL: hue in degrees [0, 360), saturation and lightness in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// HSV: hue in degrees [0, 360), saturation and value in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// CIE XYZ on the 0–100 scale (Y of white is 100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b*: lightness in [0, 100], a/b unbounded (practically about ±128).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// CIE LCh(ab): cylindrical form of [`Lab`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Rgb {
    /// Clamps every channel to [0, 255].
    pub fn clamped(self) -> Rgb {
        Rgb {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
        }
    }

    /// Rounds and clamps every channel to an 8-bit value.
    pub fn to_u8(self) -> [u8; 3] {
        let c = self.clamped();
        [
            c.r.round() as u8,
            c.g.round() as u8,
            c.b.round() as u8,
        ]
    }
}

/// Normalizes a hue angle to [0, 360).
///
/// `rem_euclid` can return exactly 360.0 for tiny negative inputs, which is
/// folded back to 0.
pub fn normalize_hue(h: f64) -> f64 {
    let n = h.rem_euclid(360.0);
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid reporting -0.0 after rounding tiny negatives.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Hue in degrees from 0–1 channels, given the max channel and chroma.
fn hue_from_channels(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    normalize_hue(h * 60.0)
}

/// Maps a hue sector and its chroma terms back to 0–1 RGB channels.
fn channels_from_hue(h: f64, c: f64, m: f64) -> Rgb {
    let hp = normalize_hue(h) / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb {
        r: (r1 + m) * 255.0,
        g: (g1 + m) * 255.0,
        b: (b1 + m) * 255.0,
    }
}

/// Converts RGB to HSL using the max/min-channel chroma formulas.
pub fn rgb_to_hsl(c: Rgb) -> Hsl {
    let (r, g, b) = (c.r / 255.0, c.g / 255.0, c.b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    Hsl {
        h: hue_from_channels(r, g, b, max, delta),
        s: (s * 100.0).clamp(0.0, 100.0),
        l: l * 100.0,
    }
}

/// Converts HSL to RGB.
pub fn hsl_to_rgb(c: Hsl) -> Rgb {
    let s = c.s / 100.0;
    let l = c.l / 100.0;
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    channels_from_hue(c.h, chroma, l - chroma / 2.0)
}

/// Converts RGB to HSV.
pub fn rgb_to_hsv(c: Rgb) -> Hsv {
    let (r, g, b) = (c.r / 255.0, c.g / 255.0, c.b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let s = if max == 0.0 { 0.0 } else { delta / max };
    Hsv {
        h: hue_from_channels(r, g, b, max, delta),
        s: s * 100.0,
        v: max * 100.0,
    }
}

/// Converts HSV to RGB.
pub fn hsv_to_rgb(c: Hsv) -> Rgb {
    let s = c.s / 100.0;
    let v = c.v / 100.0;
    let chroma = v * s;
    channels_from_hue(c.h, chroma, v - chroma)
}

/// Applies inverse sRGB gamma to a single 0–1 component.
pub fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies sRGB gamma to a single linear 0–1 component.
pub fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts 0–255 RGB to linear-light RGB.
pub fn rgb_to_linear(c: Rgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r / 255.0),
        g: srgb_component_to_linear(c.g / 255.0),
        b: srgb_component_to_linear(c.b / 255.0),
    }
}

/// Converts linear-light RGB back to 0–255 RGB (unclamped).
pub fn linear_to_rgb(c: LinearRgb) -> Rgb {
    Rgb {
        r: linear_component_to_srgb(c.r) * 255.0,
        g: linear_component_to_srgb(c.g) * 255.0,
        b: linear_component_to_srgb(c.b) * 255.0,
    }
}

/// Converts RGB to CIE XYZ (D65, 0–100 scale).
pub fn rgb_to_xyz(c: Rgb) -> Xyz {
    let lin = rgb_to_linear(c);
    Xyz {
        x: (0.4124564 * lin.r + 0.3575761 * lin.g + 0.1804375 * lin.b) * 100.0,
        y: (0.2126729 * lin.r + 0.7151522 * lin.g + 0.0721750 * lin.b) * 100.0,
        z: (0.0193339 * lin.r + 0.1191920 * lin.g + 0.9503041 * lin.b) * 100.0,
    }
}

/// Converts CIE XYZ to RGB, clamping out-of-gamut channels to [0, 255].
///
/// Linear values are clamped before gamma encoding so negative light never
/// reaches `powf`.
pub fn xyz_to_rgb(c: Xyz) -> Rgb {
    let (x, y, z) = (c.x / 100.0, c.y / 100.0, c.z / 100.0);
    let lin = LinearRgb {
        r: (3.2404542 * x - 1.5371385 * y - 0.4985314 * z).clamp(0.0, 1.0),
        g: (-0.9692660 * x + 1.8760108 * y + 0.0415560 * z).clamp(0.0, 1.0),
        b: (0.0556434 * x - 0.2040259 * y + 1.0572252 * z).clamp(0.0, 1.0),
    };
    linear_to_rgb(lin).clamped()
}

/// Forward LAB nonlinearity: cube root above the 6/29 threshold, linear below.
fn lab_f(t: f64) -> f64 {
    if t > LAB_DELTA.powi(3) {
        t.cbrt()
    } else {
        t / (3.0 * LAB_DELTA * LAB_DELTA) + 4.0 / 29.0
    }
}

/// Inverse of [`lab_f`].
fn lab_f_inv(t: f64) -> f64 {
    if t > LAB_DELTA {
        t * t * t
    } else {
        3.0 * LAB_DELTA * LAB_DELTA * (t - 4.0 / 29.0)
    }
}

/// Converts CIE XYZ to LAB relative to D65.
pub fn xyz_to_lab(c: Xyz) -> Lab {
    let fx = lab_f(c.x / D65_XN);
    let fy = lab_f(c.y / D65_YN);
    let fz = lab_f(c.z / D65_ZN);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts LAB to CIE XYZ relative to D65.
pub fn lab_to_xyz(c: Lab) -> Xyz {
    let fy = (c.l + 16.0) / 116.0;
    let fx = fy + c.a / 500.0;
    let fz = fy - c.b / 200.0;
    Xyz {
        x: D65_XN * lab_f_inv(fx),
        y: D65_YN * lab_f_inv(fy),
        z: D65_ZN * lab_f_inv(fz),
    }
}

/// Convenience: RGB to LAB via XYZ.
pub fn rgb_to_lab(c: Rgb) -> Lab {
    xyz_to_lab(rgb_to_xyz(c))
}

/// Convenience: LAB to RGB via XYZ, clamped to the sRGB gamut.
pub fn lab_to_rgb(c: Lab) -> Rgb {
    xyz_to_rgb(lab_to_xyz(c))
}

/// Converts LAB to LCh.
///
/// NaN guard: if chroma is below 1e-10, hue is set to 0.0 to avoid an
/// indeterminate `atan2(0, 0)`.
pub fn lab_to_lch(c: Lab) -> Lch {
    let chroma = (c.a * c.a + c.b * c.b).sqrt();
    let h = if chroma < 1e-10 {
        0.0
    } else {
        normalize_hue(c.b.atan2(c.a).to_degrees())
    };
    Lch {
        l: c.l,
        c: chroma,
        h,
    }
}

/// Converts LCh to LAB.
pub fn lch_to_lab(c: Lch) -> Lab {
    let h_rad = c.h.to_radians();
    Lab {
        l: c.l,
        a: c.c * h_rad.cos(),
        b: c.c * h_rad.sin(),
    }
}

/// Convenience: RGB to LCh via XYZ and LAB.
pub fn rgb_to_lch(c: Rgb) -> Lch {
    lab_to_lch(rgb_to_lab(c))
}

/// Convenience: LCh to RGB via LAB and XYZ, clamped to the sRGB gamut.
pub fn lch_to_rgb(c: Lch) -> Rgb {
    lab_to_rgb(lch_to_lab(c))
}

/// Formats RGB (and optional alpha) as lowercase `#rrggbb` or `#rrggbbaa`.
///
/// Channels are quantized to 8 bits with rounding. Alpha is appended only
/// when it is below 1 after quantization.
pub fn rgb_to_hex(c: Rgb, alpha: f64) -> String {
    let [r, g, b] = c.to_u8();
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}
