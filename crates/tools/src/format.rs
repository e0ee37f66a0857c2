//! Response formatting: CSS color strings, CSS gradient syntax and WCAG
//! classification of contrast ratios.

use serde::{Deserialize, Serialize};

use chroma_core::color::PRECISION;
use chroma_core::convert::round_to;
use chroma_core::{Color, Geometry, Gradient, RadialShape};

/// Minimum ratio for AA, normal-size text.
pub const AA_NORMAL: f64 = 4.5;
/// Minimum ratio for AA, large text.
pub const AA_LARGE: f64 = 3.0;
/// Minimum ratio for AAA, normal-size text.
pub const AAA_NORMAL: f64 = 7.0;
/// Minimum ratio for AAA, large text.
pub const AAA_LARGE: f64 = 4.5;

/// Textual color notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    Hex,
    Rgb,
    Hsl,
    Hsv,
    Lab,
    Lch,
}

impl ColorFormat {
    /// Every format, in declaration order.
    pub const ALL: [ColorFormat; 6] = [
        ColorFormat::Hex,
        ColorFormat::Rgb,
        ColorFormat::Hsl,
        ColorFormat::Hsv,
        ColorFormat::Lab,
        ColorFormat::Lch,
    ];
}

/// Renders `color` in CSS-style functional notation (or hex).
///
/// Alpha is only written when the color is not fully opaque.
pub fn css_color(color: &Color, format: ColorFormat) -> String {
    let alpha = round_to(color.alpha(), PRECISION);
    let opaque = alpha >= 1.0;
    match format {
        ColorFormat::Hex => color.hex(),
        ColorFormat::Rgb => {
            let c = color.rgb();
            if opaque {
                format!("rgb({}, {}, {})", c.r, c.g, c.b)
            } else {
                format!("rgba({}, {}, {}, {alpha})", c.r, c.g, c.b)
            }
        }
        ColorFormat::Hsl => {
            let c = color.hsl();
            if opaque {
                format!("hsl({}, {}%, {}%)", c.h, c.s, c.l)
            } else {
                format!("hsla({}, {}%, {}%, {alpha})", c.h, c.s, c.l)
            }
        }
        ColorFormat::Hsv => {
            let c = color.hsv();
            if opaque {
                format!("hsv({}, {}%, {}%)", c.h, c.s, c.v)
            } else {
                format!("hsva({}, {}%, {}%, {alpha})", c.h, c.s, c.v)
            }
        }
        ColorFormat::Lab => {
            let c = color.lab();
            with_slash_alpha(format!("lab({}% {} {}", c.l, c.a, c.b), alpha)
        }
        ColorFormat::Lch => {
            let c = color.lch();
            with_slash_alpha(format!("lch({}% {} {}", c.l, c.c, c.h), alpha)
        }
    }
}

fn with_slash_alpha(mut body: String, alpha: f64) -> String {
    if alpha < 1.0 {
        body.push_str(&format!(" / {alpha}"));
    }
    body.push(')');
    body
}

/// Renders the gradient as a CSS `*-gradient(...)` value.
///
/// Stepped gradients become hard bands of equal width.
pub fn css_gradient(gradient: &Gradient) -> String {
    let prelude = match gradient.geometry {
        Geometry::Linear { angle } => format!("linear-gradient({angle}deg"),
        Geometry::Radial {
            shape,
            extent,
            center,
        } => {
            let shape = match shape {
                RadialShape::Circle => "circle",
                RadialShape::Ellipse => "ellipse",
            };
            format!(
                "radial-gradient({shape} {extent} at {}% {}%",
                center.x, center.y
            )
        }
        Geometry::Conic { angle, center } => {
            format!("conic-gradient(from {angle}deg at {}% {}%", center.x, center.y)
        }
    };
    format!("{prelude}, {})", css_stops(gradient))
}

fn css_stops(gradient: &Gradient) -> String {
    let n = gradient.stops.len();
    let stops: Vec<String> = if gradient.stepped {
        gradient
            .stops
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                let start = round_to(i as f64 * 100.0 / n as f64, PRECISION);
                let end = round_to((i + 1) as f64 * 100.0 / n as f64, PRECISION);
                format!("{} {start}% {end}%", stop.color)
            })
            .collect()
    } else {
        gradient
            .stops
            .iter()
            .map(|stop| format!("{} {}%", stop.color, stop.position))
            .collect()
    };
    stops.join(", ")
}

/// Highest WCAG conformance a contrast ratio reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WcagRating {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AA Large")]
    AaLarge,
    #[serde(rename = "Fail")]
    Fail,
}

/// Pass/fail for each WCAG text category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WcagReport {
    pub aa_normal: bool,
    pub aa_large: bool,
    pub aaa_normal: bool,
    pub aaa_large: bool,
    pub rating: WcagRating,
}

impl WcagReport {
    /// Classifies an unrounded contrast ratio.
    pub fn classify(ratio: f64) -> Self {
        let aa_normal = ratio >= AA_NORMAL;
        let aa_large = ratio >= AA_LARGE;
        let aaa_normal = ratio >= AAA_NORMAL;
        let aaa_large = ratio >= AAA_LARGE;
        let rating = if aaa_normal {
            WcagRating::Aaa
        } else if aa_normal {
            WcagRating::Aa
        } else if aa_large {
            WcagRating::AaLarge
        } else {
            WcagRating::Fail
        };
        Self {
            aa_normal,
            aa_large,
            aaa_normal,
            aaa_large,
            rating,
        }
    }
}
