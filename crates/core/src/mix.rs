//! Mixing and blending of colors.
//!
//! Two disciplines, never combined in one call:
//!
//! - **Weighted mixing** averages N colors in one of [`MixSpace`]. Hue
//!   components (HSL, LCh) are combined with a circular mean.
//! - **Sequential blending** folds a [`BlendMode`] left to right over the
//!   colors on 8-bit RGB channels.
//!
//! [`mix`] picks the discipline: `Normal` uses weighted mixing, every other
//! mode uses sequential blending and ignores weights.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::convert::{
    hsl_to_rgb, lab_to_rgb, lch_to_rgb, normalize_hue, rgb_to_hsl, rgb_to_lab, rgb_to_lch, Hsl,
    Lab, Lch, Rgb,
};
use crate::error::ColorError;

/// Allowed deviation of the weight sum from 1.
pub const WEIGHT_TOLERANCE: f64 = 0.001;

/// Color model in which a weighted mix is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixSpace {
    #[default]
    Rgb,
    Hsl,
    Lab,
    Lch,
}

/// Per-channel compositing function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Difference,
    Exclusion,
    ColorBurn,
    ColorDodge,
}

impl MixSpace {
    /// Every mix space, in declaration order.
    pub const ALL: [MixSpace; 4] = [MixSpace::Rgb, MixSpace::Hsl, MixSpace::Lab, MixSpace::Lch];
}

impl BlendMode {
    /// Every blend mode, in declaration order.
    pub const ALL: [BlendMode; 10] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::ColorBurn,
        BlendMode::ColorDodge,
    ];

    /// Applies the mode to one 0–255 channel. `base` is the accumulator,
    /// `overlay` the next color.
    pub fn apply_channel(self, base: f64, overlay: f64) -> f64 {
        let out = match self {
            BlendMode::Normal => overlay,
            BlendMode::Multiply => base * overlay / 255.0,
            BlendMode::Screen => 255.0 - (255.0 - base) * (255.0 - overlay) / 255.0,
            BlendMode::Overlay => {
                if base < 128.0 {
                    2.0 * base * overlay / 255.0
                } else {
                    255.0 - 2.0 * (255.0 - base) * (255.0 - overlay) / 255.0
                }
            }
            BlendMode::Darken => base.min(overlay),
            BlendMode::Lighten => base.max(overlay),
            BlendMode::Difference => (base - overlay).abs(),
            BlendMode::Exclusion => base + overlay - 2.0 * base * overlay / 255.0,
            BlendMode::ColorBurn => {
                if overlay == 0.0 {
                    0.0
                } else {
                    (255.0 - (255.0 - base) * 255.0 / overlay).max(0.0)
                }
            }
            BlendMode::ColorDodge => {
                if overlay == 255.0 {
                    255.0
                } else {
                    (base * 255.0 / (255.0 - overlay)).min(255.0)
                }
            }
        };
        out.round().clamp(0.0, 255.0)
    }
}

/// Blends `overlay` onto `base` with `mode`.
///
/// Channels are read as 8-bit values. `Normal` returns the overlay
/// unchanged; other modes keep the base's alpha.
pub fn blend_pair(base: &Color, overlay: &Color, mode: BlendMode) -> Color {
    if mode == BlendMode::Normal {
        return *overlay;
    }
    let b = base.rgb();
    let o = overlay.rgb();
    let rgb = Rgb {
        r: mode.apply_channel(b.r as f64, o.r as f64),
        g: mode.apply_channel(b.g as f64, o.g as f64),
        b: mode.apply_channel(b.b as f64, o.b as f64),
    };
    Color::from_rgb_clamped(rgb, base.alpha())
}

/// Folds `mode` over `colors` left to right: `acc = mode(acc, next)`.
pub fn blend_sequence(colors: &[Color], mode: BlendMode) -> Result<Color, ColorError> {
    let (first, rest) = colors.split_first().ok_or(ColorError::EmptyInput)?;
    Ok(rest
        .iter()
        .fold(*first, |acc, next| blend_pair(&acc, next, mode)))
}

/// Checks that `weights` has one entry per color, no negatives, and sums to 1.
pub fn validate_weights(weights: &[f64], color_count: usize) -> Result<(), ColorError> {
    if weights.len() != color_count {
        return Err(ColorError::InvalidWeights(format!(
            "expected {color_count} weights, got {}",
            weights.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ColorError::InvalidWeights(format!(
            "weights must be finite and non-negative, got {w}"
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ColorError::InvalidWeights(format!(
            "weights must sum to 1 (±{WEIGHT_TOLERANCE}), got {sum}"
        )));
    }
    Ok(())
}

/// Saturation or chroma below which a color has no meaningful hue.
const ACHROMATIC_EPSILON: f64 = 0.01;

/// Hue weight of a color: achromatic colors carry none.
fn hue_weight(colorfulness: f64, weight: f64) -> f64 {
    if colorfulness < ACHROMATIC_EPSILON {
        0.0
    } else {
        weight
    }
}

/// Weighted circular mean of hue angles in degrees, in [0, 360).
///
/// Accumulates both sine and cosine terms. When they cancel (e.g. two
/// opposite hues with equal weight) the result is 0.
pub fn circular_mean(hues: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (sin_sum, cos_sum) = hues.into_iter().fold((0.0, 0.0), |(s, c), (h, w)| {
        let rad = h.to_radians();
        (s + w * rad.sin(), c + w * rad.cos())
    });
    if sin_sum.abs() < 1e-12 && cos_sum.abs() < 1e-12 {
        return 0.0;
    }
    normalize_hue(sin_sum.atan2(cos_sum).to_degrees())
}

/// Weighted average of `colors` in `space`. Weights must already be valid.
///
/// In HSL and LCH the hue is a circular mean over the chromatic inputs only.
/// Grays, black and white still count toward saturation (or chroma) and
/// lightness but add no hue, so mixing blue with white stays blue.
pub fn weighted_mix(
    colors: &[Color],
    weights: &[f64],
    space: MixSpace,
) -> Result<Color, ColorError> {
    if colors.is_empty() {
        return Err(ColorError::EmptyInput);
    }
    validate_weights(weights, colors.len())?;

    let pairs = || colors.iter().zip(weights.iter().copied());
    let weighted = |f: &dyn Fn(&Color) -> f64| pairs().map(|(c, w)| f(c) * w).sum::<f64>();
    let alpha = weighted(&|c| c.alpha());

    let rgb = match space {
        MixSpace::Rgb => Rgb {
            r: weighted(&|c| c.rgb_f64().r),
            g: weighted(&|c| c.rgb_f64().g),
            b: weighted(&|c| c.rgb_f64().b),
        },
        MixSpace::Lab => {
            let labs: Vec<(Lab, f64)> =
                pairs().map(|(c, w)| (rgb_to_lab(c.rgb_f64()), w)).collect();
            lab_to_rgb(Lab {
                l: labs.iter().map(|(lab, w)| lab.l * w).sum::<f64>().clamp(0.0, 100.0),
                a: labs.iter().map(|(lab, w)| lab.a * w).sum(),
                b: labs.iter().map(|(lab, w)| lab.b * w).sum(),
            })
        }
        MixSpace::Hsl => {
            let hsls: Vec<(Hsl, f64)> =
                pairs().map(|(c, w)| (rgb_to_hsl(c.rgb_f64()), w)).collect();
            hsl_to_rgb(Hsl {
                h: circular_mean(hsls.iter().map(|(hsl, w)| (hsl.h, hue_weight(hsl.s, *w)))),
                s: hsls.iter().map(|(hsl, w)| hsl.s * w).sum::<f64>().clamp(0.0, 100.0),
                l: hsls.iter().map(|(hsl, w)| hsl.l * w).sum::<f64>().clamp(0.0, 100.0),
            })
        }
        MixSpace::Lch => {
            let lchs: Vec<(Lch, f64)> =
                pairs().map(|(c, w)| (rgb_to_lch(c.rgb_f64()), w)).collect();
            lch_to_rgb(Lch {
                l: lchs.iter().map(|(lch, w)| lch.l * w).sum::<f64>().clamp(0.0, 100.0),
                c: lchs.iter().map(|(lch, w)| lch.c * w).sum::<f64>().max(0.0),
                h: circular_mean(lchs.iter().map(|(lch, w)| (lch.h, hue_weight(lch.c, *w)))),
            })
        }
    };

    Ok(Color::from_rgb_clamped(rgb, alpha))
}

/// Mixes `colors` with optional weights.
///
/// With [`BlendMode::Normal`] the colors are averaged in `space`; missing
/// weights mean equal weights. Any other mode blends sequentially and the
/// weights are ignored.
pub fn mix(
    colors: &[Color],
    weights: Option<&[f64]>,
    space: MixSpace,
    mode: BlendMode,
) -> Result<Color, ColorError> {
    if colors.is_empty() {
        return Err(ColorError::EmptyInput);
    }
    if mode != BlendMode::Normal {
        if weights.is_some() {
            log::debug!("blend mode {mode:?} ignores supplied weights");
        }
        return blend_sequence(colors, mode);
    }
    match weights {
        Some(w) => weighted_mix(colors, w, space),
        None => {
            let equal = vec![1.0 / colors.len() as f64; colors.len()];
            weighted_mix(colors, &equal, space)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    // -- Blend modes --

    #[test]
    fn multiply_with_white_is_identity() {
        let c = color("#3a7bd5");
        assert_eq!(blend_pair(&c, &Color::WHITE, BlendMode::Multiply).hex(), c.hex());
    }

    #[test]
    fn multiply_with_black_is_black() {
        let c = color("#3a7bd5");
        assert_eq!(blend_pair(&c, &Color::BLACK, BlendMode::Multiply).hex(), "#000000");
    }

    #[test]
    fn screen_with_black_is_identity() {
        let c = color("#3a7bd5");
        assert_eq!(blend_pair(&c, &Color::BLACK, BlendMode::Screen).hex(), c.hex());
    }

    #[test]
    fn screen_with_white_is_white() {
        let c = color("#3a7bd5");
        assert_eq!(blend_pair(&c, &Color::WHITE, BlendMode::Screen).hex(), "#ffffff");
    }

    #[test]
    fn overlay_branches_on_base() {
        // base 64 < 128: 2*64*200/255 = 100.39 -> 100
        assert_eq!(BlendMode::Overlay.apply_channel(64.0, 200.0), 100.0);
        // base 200 >= 128: 255 - 2*55*55/255 = 231.27 -> 231
        assert_eq!(BlendMode::Overlay.apply_channel(200.0, 200.0), 231.0);
    }

    #[test]
    fn darken_lighten_difference_exclusion() {
        assert_eq!(BlendMode::Darken.apply_channel(10.0, 200.0), 10.0);
        assert_eq!(BlendMode::Lighten.apply_channel(10.0, 200.0), 200.0);
        assert_eq!(BlendMode::Difference.apply_channel(10.0, 200.0), 190.0);
        // 100 + 200 - 2*100*200/255 = 143.14 -> 143
        assert_eq!(BlendMode::Exclusion.apply_channel(100.0, 200.0), 143.0);
    }

    #[test]
    fn color_burn_zero_overlay_is_zero() {
        assert_eq!(BlendMode::ColorBurn.apply_channel(200.0, 0.0), 0.0);
        // 255 - 55*255/100 = 114.75 -> 115
        assert_eq!(BlendMode::ColorBurn.apply_channel(200.0, 100.0), 115.0);
        assert_eq!(BlendMode::ColorBurn.apply_channel(0.0, 100.0), 0.0);
    }

    #[test]
    fn color_dodge_full_overlay_is_255() {
        assert_eq!(BlendMode::ColorDodge.apply_channel(10.0, 255.0), 255.0);
        // 100*255/155 = 164.5 -> 165
        assert_eq!(BlendMode::ColorDodge.apply_channel(100.0, 100.0), 165.0);
        assert_eq!(BlendMode::ColorDodge.apply_channel(200.0, 200.0), 255.0);
    }

    #[test]
    fn normal_blend_passes_overlay_through() {
        let base = color("#112233");
        let over = color("rgba(200, 100, 50, 0.5)");
        assert_eq!(blend_pair(&base, &over, BlendMode::Normal), over);
    }

    #[test]
    fn non_normal_blend_keeps_base_alpha() {
        let base = color("rgba(200, 100, 50, 0.5)");
        let out = blend_pair(&base, &Color::WHITE, BlendMode::Multiply);
        assert_eq!(out.alpha(), 0.5);
    }

    #[test]
    fn blend_sequence_folds_left_to_right() {
        let colors = [color("#ff0000"), color("#00ff00"), color("#808080")];
        // red screen green = yellow; yellow multiply gray = #808000
        let screened = blend_sequence(&colors[..2], BlendMode::Screen).unwrap();
        assert_eq!(screened.hex(), "#ffff00");
        let out = blend_pair(&screened, &colors[2], BlendMode::Multiply);
        assert_eq!(out.hex(), "#808000");
    }

    #[test]
    fn blend_sequence_of_one_returns_it() {
        let c = color("#abcdef");
        assert_eq!(blend_sequence(&[c], BlendMode::Overlay).unwrap(), c);
    }

    #[test]
    fn blend_sequence_empty_is_error() {
        assert_eq!(
            blend_sequence(&[], BlendMode::Multiply),
            Err(ColorError::EmptyInput)
        );
    }

    // -- Weights --

    #[test]
    fn weights_length_mismatch_is_rejected() {
        let err = validate_weights(&[0.5, 0.5], 3).unwrap_err();
        assert!(matches!(err, ColorError::InvalidWeights(_)));
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        assert!(validate_weights(&[0.5, 0.4], 2).is_err());
        assert!(validate_weights(&[0.5, 0.5005], 2).is_ok());
        assert!(validate_weights(&[0.5, 0.502], 2).is_err());
    }

    #[test]
    fn negative_weights_are_rejected() {
        assert!(validate_weights(&[1.5, -0.5], 2).is_err());
    }

    // -- Circular mean --

    #[test]
    fn circular_mean_wraps_through_zero() {
        let h = circular_mean([(350.0, 0.5), (10.0, 0.5)]);
        assert!(h < 1e-9 || (360.0 - h) < 1e-9, "h: {h}");
    }

    #[test]
    fn circular_mean_keeps_true_hue() {
        let h = circular_mean([(60.0, 0.5), (120.0, 0.5)]);
        assert!((h - 90.0).abs() < 1e-9, "h: {h}");
    }

    #[test]
    fn circular_mean_of_opposites_is_zero() {
        assert_eq!(circular_mean([(90.0, 0.5), (270.0, 0.5)]), 0.0);
    }

    // -- Weighted mixing --

    #[test]
    fn single_color_mix_is_identity_in_every_space() {
        let c = color("#3a7bd5");
        for space in MixSpace::ALL {
            let out = weighted_mix(&[c], &[1.0], space).unwrap();
            assert_eq!(out.hex(), c.hex(), "space {space:?}");
        }
    }

    #[test]
    fn rgb_mix_of_black_and_white_is_mid_gray() {
        let out =
            mix(&[Color::BLACK, Color::WHITE], None, MixSpace::Rgb, BlendMode::Normal).unwrap();
        let hsl = out.hsl();
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 50.0).abs() < 0.5, "l: {}", hsl.l);
    }

    #[test]
    fn weighted_rgb_mix_respects_weights() {
        let out = mix(
            &[color("#ff0000"), color("#0000ff")],
            Some(&[0.75, 0.25]),
            MixSpace::Rgb,
            BlendMode::Normal,
        )
        .unwrap();
        assert_eq!(out.rgb().r, 191);
        assert_eq!(out.rgb().b, 64);
    }

    #[test]
    fn hsl_mix_of_red_and_yellow_is_orange() {
        let out = mix(
            &[color("#ff0000"), color("#ffff00")],
            None,
            MixSpace::Hsl,
            BlendMode::Normal,
        )
        .unwrap();
        let hsl = out.hsl();
        assert!((hsl.h - 30.0).abs() < 0.01, "h: {}", hsl.h);
    }

    #[test]
    fn hsl_mix_with_white_keeps_hue() {
        let out = mix(
            &[color("blue"), Color::WHITE],
            None,
            MixSpace::Hsl,
            BlendMode::Normal,
        )
        .unwrap();
        let hsl = out.hsl();
        assert!((hsl.h - 240.0).abs() < 0.5, "h: {}", hsl.h);
        assert!((hsl.s - 50.0).abs() < 1.0, "s: {}", hsl.s);
        assert!((hsl.l - 75.0).abs() < 1.0, "l: {}", hsl.l);
    }

    #[test]
    fn lch_mix_with_gray_keeps_hue() {
        let red = color("red");
        let out = mix(
            &[red, color("#808080")],
            None,
            MixSpace::Lch,
            BlendMode::Normal,
        )
        .unwrap();
        let h = out.lch().h;
        assert!((h - red.lch().h).abs() < 1.0, "h: {h}");
    }

    #[test]
    fn all_achromatic_hsl_mix_stays_gray() {
        let out = mix(
            &[Color::BLACK, Color::WHITE],
            None,
            MixSpace::Hsl,
            BlendMode::Normal,
        )
        .unwrap();
        let hsl = out.hsl();
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 50.0).abs() < 0.5, "l: {}", hsl.l);
    }

    #[test]
    fn lch_mix_hue_is_in_range() {
        let out = mix(
            &[color("#ff00ff"), color("#00ffff"), color("#ffcc00")],
            None,
            MixSpace::Lch,
            BlendMode::Normal,
        )
        .unwrap();
        let h = out.lch().h;
        assert!((0.0..360.0).contains(&h), "h: {h}");
    }

    #[test]
    fn lab_mix_of_black_and_white_has_l_50() {
        let out =
            mix(&[Color::BLACK, Color::WHITE], None, MixSpace::Lab, BlendMode::Normal).unwrap();
        assert!((out.lab().l - 50.0).abs() < 0.05, "l: {}", out.lab().l);
    }

    #[test]
    fn mix_averages_alpha() {
        let out = mix(
            &[color("rgba(0,0,0,0)"), color("rgba(0,0,0,1)")],
            None,
            MixSpace::Rgb,
            BlendMode::Normal,
        )
        .unwrap();
        assert_eq!(out.alpha(), 0.5);
    }

    #[test]
    fn mix_with_non_normal_mode_ignores_weights() {
        let colors = [color("#3a7bd5"), Color::WHITE];
        let out = mix(&colors, Some(&[0.9, 0.9]), MixSpace::Rgb, BlendMode::Multiply).unwrap();
        assert_eq!(out.hex(), "#3a7bd5");
    }

    #[test]
    fn mix_empty_is_error() {
        assert_eq!(
            mix(&[], None, MixSpace::Rgb, BlendMode::Normal),
            Err(ColorError::EmptyInput)
        );
    }

    #[test]
    fn mix_rejects_bad_weights_for_normal_mode() {
        let colors = [Color::BLACK, Color::WHITE];
        let err = mix(&colors, Some(&[0.3, 0.3]), MixSpace::Rgb, BlendMode::Normal).unwrap_err();
        assert!(matches!(err, ColorError::InvalidWeights(_)));
    }

    #[test]
    fn blend_mode_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&BlendMode::ColorDodge).unwrap(),
            "\"color_dodge\""
        );
        let mode: BlendMode = serde_json::from_str("\"color_burn\"").unwrap();
        assert_eq!(mode, BlendMode::ColorBurn);
    }

    #[test]
    fn blend_mode_default_is_normal() {
        assert_eq!(BlendMode::default(), BlendMode::Normal);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_blend_mode_stays_in_range(
                base in 0.0_f64..=255.0,
                overlay in 0.0_f64..=255.0,
            ) {
                for mode in BlendMode::ALL {
                    let out = mode.apply_channel(base.round(), overlay.round());
                    prop_assert!((0.0..=255.0).contains(&out), "{:?} gave {}", mode, out);
                    prop_assert_eq!(out, out.round());
                }
            }

            #[test]
            fn mixed_hues_are_in_range(
                a in any::<[u8; 3]>(),
                b in any::<[u8; 3]>(),
                w in 0.0_f64..=1.0,
            ) {
                let colors = [Color::from_rgb8(a), Color::from_rgb8(b)];
                for space in MixSpace::ALL {
                    let out = weighted_mix(&colors, &[w, 1.0 - w], space).unwrap();
                    for h in [out.hsl().h, out.lch().h] {
                        prop_assert!((0.0..360.0).contains(&h), "{:?}: hue {}", space, h);
                    }
                }
            }

            #[test]
            fn multiply_white_and_screen_black_are_identity(c in any::<[u8; 3]>()) {
                let color = Color::from_rgb8(c);
                prop_assert_eq!(blend_pair(&color, &Color::WHITE, BlendMode::Multiply), color);
                prop_assert_eq!(blend_pair(&color, &Color::BLACK, BlendMode::Screen), color);
            }
        }
    }
}
