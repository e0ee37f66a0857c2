//! Serializable tool responses.
//!
//! Numeric fields are pre-rounded; colors serialize as hex strings.

use std::collections::BTreeMap;

use serde::Serialize;

use chroma_core::variation::VariationSeries;
use chroma_core::{
    BlendMode, Color, Geometry, GradientStop, Hsla, Hsv, Lab, Lch, MixSpace, Rgba,
    VariationKind, Xyz,
};

use crate::format::{ColorFormat, WcagReport};

/// Result of `convert_color`.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    pub input: String,
    pub hex: String,
    pub rgb: Rgba,
    pub hsl: Hsla,
    pub hsv: Hsv,
    pub lab: Lab,
    pub lch: Lch,
    pub xyz: Xyz,
    /// CSS keyword, when the color is an exact opaque match for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub css: BTreeMap<ColorFormat, String>,
}

/// Result of `mix_colors`.
#[derive(Debug, Clone, Serialize)]
pub struct MixResponse {
    pub result: Color,
    pub rgb: Rgba,
    pub hsl: Hsla,
    pub space: MixSpace,
    pub mode: BlendMode,
    pub inputs: Vec<Color>,
    /// Weights actually applied; absent for sequential blends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    /// CIE76 distance from the result to each input.
    pub delta_e: Vec<f64>,
}

/// Result of `generate_variations`.
#[derive(Debug, Clone, Serialize)]
pub struct VariationResponse {
    pub base: Color,
    pub kind: VariationKind,
    pub steps: usize,
    pub intensity: f64,
    pub series: Vec<VariationSeries>,
    pub skipped: usize,
}

/// Result of `create_gradient`.
#[derive(Debug, Clone, Serialize)]
pub struct GradientResponse {
    pub stops: Vec<GradientStop>,
    pub geometry: Geometry,
    pub stepped: bool,
    pub css: String,
    /// Sampled color halfway between each pair of adjacent stops.
    pub midpoints: Vec<Color>,
}

/// Result of `check_contrast`.
#[derive(Debug, Clone, Serialize)]
pub struct ContrastResponse {
    pub foreground: Color,
    pub background: Color,
    pub ratio: f64,
    pub foreground_luminance: f64,
    pub background_luminance: f64,
    pub wcag: WcagReport,
}

/// Result of `analyze_color`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub rgb: Rgba,
    pub hsl: Hsla,
    pub lab: Lab,
    pub luminance: f64,
    pub is_light: bool,
    /// Hue rotated by 180 degrees in HSL.
    pub complement: Color,
    pub complement_delta_e: f64,
    pub contrast_on_white: f64,
    pub contrast_on_black: f64,
    /// Black or white, whichever contrasts more.
    pub text_color: Color,
}
