//! Tints, shades and tones of a base color.
//!
//! Each variant moves one HSL component toward a bound by
//! `factor = (i / (steps - 1)) * (intensity / 100)`:
//!
//! - tint: lightness toward 100 (white)
//! - shade: lightness toward 0 (black)
//! - tone: saturation toward 0 (gray)
//!
//! The other components are held fixed. A variant whose reconstruction fails
//! is skipped and counted rather than aborting the batch.

use serde::{Deserialize, Serialize};

use crate::color::{Color, Hsla};
use crate::error::ColorError;

/// Fewest steps a series may have.
pub const MIN_STEPS: usize = 3;

/// Which series to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationKind {
    Tints,
    Shades,
    Tones,
    #[default]
    All,
}

/// The single transformation applied by one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Tint,
    Shade,
    Tone,
}

impl VariationKind {
    /// The series this kind expands to, in output order.
    pub fn variants(self) -> &'static [Variant] {
        match self {
            VariationKind::Tints => &[Variant::Tint],
            VariationKind::Shades => &[Variant::Shade],
            VariationKind::Tones => &[Variant::Tone],
            VariationKind::All => &[Variant::Tint, Variant::Shade, Variant::Tone],
        }
    }
}

impl Variant {
    /// Moves the relevant HSL component by `factor` in [0, 1].
    fn apply(self, hsl: Hsla, factor: f64) -> Hsla {
        let mut out = hsl;
        match self {
            Variant::Tint => out.l = hsl.l + (100.0 - hsl.l) * factor,
            Variant::Shade => out.l = hsl.l * (1.0 - factor),
            Variant::Tone => out.s = hsl.s * (1.0 - factor),
        }
        out.s = out.s.clamp(0.0, 100.0);
        out.l = out.l.clamp(0.0, 100.0);
        out
    }
}

/// Options for [`vary`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariationOptions {
    pub kind: VariationKind,
    /// Entries per series, at least [`MIN_STEPS`].
    pub steps: usize,
    /// How far the last entry moves toward the bound, in [0, 100].
    pub intensity: f64,
}

impl Default for VariationOptions {
    fn default() -> Self {
        Self {
            kind: VariationKind::All,
            steps: 5,
            intensity: 100.0,
        }
    }
}

impl VariationOptions {
    /// Checks the step count and intensity range.
    pub fn validate(&self) -> Result<(), ColorError> {
        if self.steps < MIN_STEPS {
            return Err(ColorError::InvalidParameter(format!(
                "steps must be at least {MIN_STEPS}, got {}",
                self.steps
            )));
        }
        if !(0.0..=100.0).contains(&self.intensity) {
            return Err(ColorError::InvalidParameter(format!(
                "intensity must be in [0, 100], got {}",
                self.intensity
            )));
        }
        Ok(())
    }

    /// The movement factor for step `i`.
    pub fn factor(&self, i: usize) -> f64 {
        (i as f64 / (self.steps - 1) as f64) * (self.intensity / 100.0)
    }
}

/// One generated color with its position in the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariationStep {
    pub index: usize,
    pub factor: f64,
    pub color: Color,
}

/// One series of variants (all tints, all shades, or all tones).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationSeries {
    pub variant: Variant,
    pub steps: Vec<VariationStep>,
    /// Entries dropped because reconstruction failed.
    pub skipped: usize,
}

/// The complete result of [`vary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationSet {
    pub base: Color,
    pub series: Vec<VariationSeries>,
}

impl VariationSet {
    /// Total entries skipped across every series.
    pub fn skipped(&self) -> usize {
        self.series.iter().map(|s| s.skipped).sum()
    }

    /// The series for `variant`, if it was generated.
    pub fn get(&self, variant: Variant) -> Option<&VariationSeries> {
        self.series.iter().find(|s| s.variant == variant)
    }
}

/// Builds one series from `base`.
fn series(base: &Color, variant: Variant, options: &VariationOptions) -> VariationSeries {
    let hsl = base.hsl();
    let mut steps = Vec::with_capacity(options.steps);
    let mut skipped = 0;

    for index in 0..options.steps {
        let factor = options.factor(index);
        let v = variant.apply(hsl, factor);
        match Color::from_hsla(v.h, v.s, v.l, base.alpha()) {
            Ok(color) => steps.push(VariationStep {
                index,
                factor,
                color,
            }),
            Err(e) => {
                log::warn!("skipping {variant:?} step {index} of {base}: {e}");
                skipped += 1;
            }
        }
    }

    VariationSeries {
        variant,
        steps,
        skipped,
    }
}

/// Generates the tints, shades and/or tones of `base`.
///
/// Index 0 of every series is the base color itself. Fails only when the
/// options are out of range.
pub fn vary(base: &Color, options: &VariationOptions) -> Result<VariationSet, ColorError> {
    options.validate()?;
    let series = options
        .kind
        .variants()
        .iter()
        .map(|&variant| series(base, variant, options))
        .collect();
    Ok(VariationSet {
        base: *base,
        series,
    })
}
