//! Perceptual metrics: WCAG relative luminance, contrast ratio and CIE76 ΔE.
//!
//! Threshold policy (AA/AAA classification) belongs to callers.

use crate::color::Color;
use crate::convert::{rgb_to_lab, srgb_component_to_linear};

/// WCAG channel weights for red, green and blue.
const LUMINANCE_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Relative luminance in [0, 1] as defined by WCAG 2.x.
///
/// Each 8-bit channel is gamma-decoded, then weighted and summed. Alpha is
/// ignored.
pub fn relative_luminance(color: &Color) -> f64 {
    let rgba = color.rgb();
    let linear = [rgba.r, rgba.g, rgba.b].map(|c| srgb_component_to_linear(c as f64 / 255.0));
    linear
        .iter()
        .zip(LUMINANCE_WEIGHTS)
        .map(|(c, w)| c * w)
        .sum()
}

/// Contrast ratio `(L1 + 0.05) / (L2 + 0.05)` with `L1` the lighter color.
///
/// Always at least 1.0 and at most 21.0; argument order does not matter.
pub fn contrast_ratio(a: &Color, b: &Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// CIE76 color difference: Euclidean distance between two colors in LAB.
pub fn delta_e76(a: &Color, b: &Color) -> f64 {
    let la = rgb_to_lab(a.rgb_f64());
    let lb = rgb_to_lab(b.rgb_f64());
    ((la.l - lb.l).powi(2) + (la.a - lb.a).powi(2) + (la.b - lb.b).powi(2)).sqrt()
}
