//! Structured request types, one per tool.
//!
//! Each request deserializes from the tool's JSON params (unknown fields are
//! rejected, optional fields take serde defaults), checks its ranges in
//! [`ToolRequest::validate`], then runs the core computation in
//! [`ToolRequest::execute`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use chroma_core::color::PRECISION;
use chroma_core::convert::{hsl_to_rgb, normalize_hue, rgb_to_hsl, round_to};
use chroma_core::{
    build_gradient, contrast_ratio, delta_e76, mix, named, relative_luminance, vary, BlendMode,
    Color, Easing, GradientOptions, GradientShape, MixSpace, VariationKind, VariationOptions,
};

use crate::error::ToolError;
use crate::format::{css_color, css_gradient, ColorFormat, WcagReport};
use crate::response::{
    AnalyzeResponse, ContrastResponse, ConvertResponse, GradientResponse, MixResponse,
    VariationResponse,
};

/// Most colors `mix_colors` accepts.
pub const MAX_MIX_COLORS: usize = 10;
/// Step range for `generate_variations`.
pub const VARIATION_STEPS: (usize, usize) = (3, 20);
/// Color count range for `create_gradient`.
pub const GRADIENT_COLORS: (usize, usize) = (2, 20);
/// Step range for quantized gradients.
pub const GRADIENT_STEPS: (usize, usize) = (2, 100);

/// Decimal places for luminance values.
const LUMINANCE_PRECISION: u32 = 4;

/// A tool's request: deserialized from params, validated, then executed.
pub trait ToolRequest: DeserializeOwned {
    type Response: Serialize;

    /// Checks ranges that serde cannot express.
    fn validate(&self) -> Result<(), ToolError>;

    /// Runs the computation. Assumes [`ToolRequest::validate`] passed.
    fn execute(&self) -> Result<Self::Response, ToolError>;

    /// Validates, then executes.
    fn run(&self) -> Result<Self::Response, ToolError> {
        self.validate()?;
        self.execute()
    }
}

fn parse(input: &str) -> Result<Color, ToolError> {
    Ok(Color::parse(input)?)
}

fn parse_all(inputs: &[String]) -> Result<Vec<Color>, ToolError> {
    inputs.iter().map(|s| parse(s)).collect()
}

fn check_count(what: &str, count: usize, (min, max): (usize, usize)) -> Result<(), ToolError> {
    if (min..=max).contains(&count) {
        Ok(())
    } else {
        Err(ToolError::InvalidParams(format!(
            "{what} must be between {min} and {max}, got {count}"
        )))
    }
}

fn check_percent(what: &str, value: f64) -> Result<(), ToolError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ToolError::InvalidParams(format!(
            "{what} must be in [0, 100], got {value}"
        )))
    }
}

// -- convert_color --

/// Params for `convert_color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertRequest {
    pub color: String,
    /// CSS notations to include; all of them when absent.
    #[serde(default)]
    pub formats: Option<Vec<ColorFormat>>,
}

impl ToolRequest for ConvertRequest {
    type Response = ConvertResponse;

    fn validate(&self) -> Result<(), ToolError> {
        if matches!(&self.formats, Some(f) if f.is_empty()) {
            return Err(ToolError::InvalidParams(
                "formats must not be empty when given".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self) -> Result<ConvertResponse, ToolError> {
        let color = parse(&self.color)?;
        let formats = self.formats.as_deref().unwrap_or(&ColorFormat::ALL);
        let css: BTreeMap<ColorFormat, String> = formats
            .iter()
            .map(|&f| (f, css_color(&color, f)))
            .collect();
        Ok(ConvertResponse {
            input: self.color.clone(),
            hex: color.hex(),
            rgb: color.rgb(),
            hsl: color.hsl(),
            hsv: color.hsv(),
            lab: color.lab(),
            lch: color.lch(),
            xyz: color.xyz(),
            name: keyword(&color),
            css,
        })
    }
}

fn keyword(color: &Color) -> Option<&'static str> {
    if color.alpha() < 1.0 {
        return None;
    }
    let c = color.rgb();
    named::name_of([c.r, c.g, c.b])
}

// -- mix_colors --

/// Params for `mix_colors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixRequest {
    pub colors: Vec<String>,
    /// One weight per color summing to 1; equal weights when absent.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub space: MixSpace,
    #[serde(default)]
    pub mode: BlendMode,
}

impl ToolRequest for MixRequest {
    type Response = MixResponse;

    fn validate(&self) -> Result<(), ToolError> {
        check_count("colors", self.colors.len(), (1, MAX_MIX_COLORS))
    }

    fn execute(&self) -> Result<MixResponse, ToolError> {
        let inputs = parse_all(&self.colors)?;
        let result = mix(&inputs, self.weights.as_deref(), self.space, self.mode)?;
        let weights = (self.mode == BlendMode::Normal).then(|| {
            self.weights
                .clone()
                .unwrap_or_else(|| vec![1.0 / inputs.len() as f64; inputs.len()])
        });
        let delta_e = inputs
            .iter()
            .map(|c| round_to(delta_e76(&result, c), PRECISION))
            .collect();
        log::trace!("mixed {} colors into {result}", inputs.len());
        Ok(MixResponse {
            result,
            rgb: result.rgb(),
            hsl: result.hsl(),
            space: self.space,
            mode: self.mode,
            inputs,
            weights,
            delta_e,
        })
    }
}

// -- generate_variations --

fn default_variation_steps() -> usize {
    VariationOptions::default().steps
}

fn default_intensity() -> f64 {
    VariationOptions::default().intensity
}

/// Params for `generate_variations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariationRequest {
    pub color: String,
    #[serde(default, alias = "type")]
    pub kind: VariationKind,
    #[serde(default = "default_variation_steps")]
    pub steps: usize,
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

impl VariationRequest {
    fn options(&self) -> VariationOptions {
        VariationOptions {
            kind: self.kind,
            steps: self.steps,
            intensity: self.intensity,
        }
    }
}

impl ToolRequest for VariationRequest {
    type Response = VariationResponse;

    fn validate(&self) -> Result<(), ToolError> {
        check_count("steps", self.steps, VARIATION_STEPS)?;
        check_percent("intensity", self.intensity)
    }

    fn execute(&self) -> Result<VariationResponse, ToolError> {
        let base = parse(&self.color)?;
        let set = vary(&base, &self.options())?;
        let skipped = set.skipped();
        Ok(VariationResponse {
            base,
            kind: self.kind,
            steps: self.steps,
            intensity: self.intensity,
            series: set.series,
            skipped,
        })
    }
}

// -- create_gradient --

/// Params for `create_gradient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientRequest {
    pub colors: Vec<String>,
    #[serde(default)]
    pub positions: Option<Vec<f64>>,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub steps: Option<usize>,
    #[serde(default)]
    pub shape: GradientShape,
    /// Model used to sample midpoints between stops.
    #[serde(default)]
    pub interpolation: MixSpace,
}

impl GradientRequest {
    fn options(&self) -> GradientOptions {
        GradientOptions {
            positions: self.positions.clone(),
            easing: self.easing,
            steps: self.steps,
            shape: self.shape,
        }
    }
}

impl ToolRequest for GradientRequest {
    type Response = GradientResponse;

    fn validate(&self) -> Result<(), ToolError> {
        check_count("colors", self.colors.len(), GRADIENT_COLORS)?;
        if let Some(steps) = self.steps {
            check_count("steps", steps, GRADIENT_STEPS)?;
        }
        self.shape
            .resolve()
            .map(|_| ())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))
    }

    fn execute(&self) -> Result<GradientResponse, ToolError> {
        let colors = parse_all(&self.colors)?;
        let gradient = build_gradient(&colors, &self.options())?;
        let midpoints = if gradient.stepped {
            Vec::new()
        } else {
            gradient
                .stops
                .windows(2)
                .filter_map(|w| {
                    let t = (w[0].position + w[1].position) / 200.0;
                    gradient.sample(t, self.interpolation)
                })
                .collect()
        };
        log::debug!(
            "gradient with {} stops (stepped: {})",
            gradient.stops.len(),
            gradient.stepped
        );
        Ok(GradientResponse {
            css: css_gradient(&gradient),
            stops: gradient.stops,
            geometry: gradient.geometry,
            stepped: gradient.stepped,
            midpoints,
        })
    }
}

// -- check_contrast --

/// Params for `check_contrast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContrastRequest {
    pub foreground: String,
    pub background: String,
}

impl ToolRequest for ContrastRequest {
    type Response = ContrastResponse;

    fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }

    fn execute(&self) -> Result<ContrastResponse, ToolError> {
        let foreground = parse(&self.foreground)?;
        let background = parse(&self.background)?;
        let ratio = contrast_ratio(&foreground, &background);
        Ok(ContrastResponse {
            foreground,
            background,
            ratio: round_to(ratio, PRECISION),
            foreground_luminance: round_to(relative_luminance(&foreground), LUMINANCE_PRECISION),
            background_luminance: round_to(relative_luminance(&background), LUMINANCE_PRECISION),
            wcag: WcagReport::classify(ratio),
        })
    }
}

// -- analyze_color --

/// Params for `analyze_color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeRequest {
    pub color: String,
}

/// Rotates the hue by 180 degrees, keeping saturation, lightness and alpha.
fn complement(color: &Color) -> Color {
    let mut hsl = rgb_to_hsl(color.rgb_f64());
    hsl.h = normalize_hue(hsl.h + 180.0);
    Color::from_rgb_clamped(hsl_to_rgb(hsl), color.alpha())
}

impl ToolRequest for AnalyzeRequest {
    type Response = AnalyzeResponse;

    fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }

    fn execute(&self) -> Result<AnalyzeResponse, ToolError> {
        let color = parse(&self.color)?;
        let comp = complement(&color);
        let on_white = contrast_ratio(&color, &Color::WHITE);
        let on_black = contrast_ratio(&color, &Color::BLACK);
        let text_color = if on_black >= on_white {
            Color::BLACK
        } else {
            Color::WHITE
        };
        Ok(AnalyzeResponse {
            color,
            name: keyword(&color),
            rgb: color.rgb(),
            hsl: color.hsl(),
            lab: color.lab(),
            luminance: round_to(relative_luminance(&color), LUMINANCE_PRECISION),
            is_light: color.is_light(),
            complement: comp,
            complement_delta_e: round_to(delta_e76(&color, &comp), PRECISION),
            contrast_on_white: round_to(on_white, PRECISION),
            contrast_on_black: round_to(on_black, PRECISION),
            text_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request<R: ToolRequest>(params: serde_json::Value) -> R {
        serde_json::from_value(params).unwrap()
    }

    // -- Deserialization --

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ConvertRequest, _> =
            serde_json::from_value(json!({"color": "red", "colour": "blue"}));
        assert!(result.is_err());
    }

    #[test]
    fn variation_defaults_apply() {
        let req: VariationRequest = request(json!({"color": "#3a7bd5"}));
        assert_eq!(req.kind, VariationKind::All);
        assert_eq!(req.steps, 5);
        assert_eq!(req.intensity, 100.0);
    }

    #[test]
    fn variation_kind_accepts_type_alias() {
        let req: VariationRequest = request(json!({"color": "red", "type": "shades"}));
        assert_eq!(req.kind, VariationKind::Shades);
    }

    #[test]
    fn gradient_defaults_to_linear_180() {
        let req: GradientRequest = request(json!({"colors": ["red", "blue"]}));
        assert_eq!(req.shape, GradientShape::default());
        assert_eq!(req.easing, Easing::Linear);
        assert_eq!(req.interpolation, MixSpace::Rgb);
    }

    // -- Validation --

    #[test]
    fn mix_color_count_limits() {
        let none: MixRequest = request(json!({"colors": []}));
        assert!(matches!(none.validate(), Err(ToolError::InvalidParams(_))));
        let eleven: MixRequest = request(json!({"colors": vec!["red"; 11]}));
        assert!(eleven.validate().is_err());
        let ten: MixRequest = request(json!({"colors": vec!["red"; 10]}));
        assert!(ten.validate().is_ok());
    }

    #[test]
    fn variation_step_and_intensity_limits() {
        for steps in [2, 21] {
            let req: VariationRequest = request(json!({"color": "red", "steps": steps}));
            assert!(req.validate().is_err(), "steps={steps}");
        }
        let req: VariationRequest = request(json!({"color": "red", "intensity": 150}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn gradient_needs_two_colors() {
        let req: GradientRequest = request(json!({"colors": ["red"]}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn gradient_center_out_of_range_is_invalid_params() {
        let req: GradientRequest = request(json!({
            "colors": ["red", "blue"],
            "shape": {"type": "conic", "center": {"x": 120, "y": 50}}
        }));
        assert!(matches!(req.validate(), Err(ToolError::InvalidParams(_))));
    }

    // -- Execution --

    #[test]
    fn convert_reports_every_model() {
        let req: ConvertRequest = request(json!({"color": "red"}));
        let resp = req.run().unwrap();
        assert_eq!(resp.hex, "#ff0000");
        assert_eq!(resp.rgb.r, 255);
        assert_eq!(resp.hsl.s, 100.0);
        assert_eq!(resp.name, Some("red"));
        assert_eq!(resp.css.len(), ColorFormat::ALL.len());
    }

    #[test]
    fn convert_respects_selected_formats() {
        let req: ConvertRequest = request(json!({"color": "#3a7bd5", "formats": ["rgb"]}));
        let resp = req.run().unwrap();
        assert_eq!(resp.css.len(), 1);
        assert_eq!(resp.css[&ColorFormat::Rgb], "rgb(58, 123, 213)");
        assert_eq!(resp.name, None);
    }

    #[test]
    fn convert_bad_color_is_color_error() {
        let req: ConvertRequest = request(json!({"color": "not-a-color"}));
        assert!(matches!(req.run(), Err(ToolError::Color(_))));
    }

    #[test]
    fn mix_black_and_white_equally() {
        let req: MixRequest = request(json!({"colors": ["black", "white"]}));
        let resp = req.run().unwrap();
        assert_eq!(resp.result.hex(), "#808080");
        assert_eq!(resp.weights, Some(vec![0.5, 0.5]));
        assert_eq!(resp.delta_e.len(), 2);
    }

    #[test]
    fn mix_blend_mode_reports_no_weights() {
        let req: MixRequest = request(json!({
            "colors": ["#ff0000", "#ffffff"],
            "mode": "multiply"
        }));
        let resp = req.run().unwrap();
        assert_eq!(resp.result.hex(), "#ff0000");
        assert_eq!(resp.weights, None);
    }

    #[test]
    fn mix_bad_weights_are_color_error() {
        let req: MixRequest = request(json!({
            "colors": ["red", "blue"],
            "weights": [0.5, 0.6]
        }));
        assert!(matches!(req.run(), Err(ToolError::Color(_))));
    }

    #[test]
    fn variations_for_all_kinds() {
        let req: VariationRequest = request(json!({"color": "#3a7bd5", "steps": 4}));
        let resp = req.run().unwrap();
        assert_eq!(resp.series.len(), 3);
        assert_eq!(resp.skipped, 0);
        assert!(resp.series.iter().all(|s| s.steps.len() == 4));
    }

    #[test]
    fn gradient_with_midpoints_and_css() {
        let req: GradientRequest = request(json!({"colors": ["black", "white"]}));
        let resp = req.run().unwrap();
        assert_eq!(resp.stops.len(), 2);
        assert_eq!(resp.midpoints.len(), 1);
        assert_eq!(resp.midpoints[0].hex(), "#808080");
        assert_eq!(
            resp.css,
            "linear-gradient(180deg, #000000 0%, #ffffff 100%)"
        );
    }

    #[test]
    fn stepped_gradient_has_no_midpoints() {
        let req: GradientRequest =
            request(json!({"colors": ["red", "green", "blue"], "steps": 6}));
        let resp = req.run().unwrap();
        assert!(resp.stepped);
        assert_eq!(resp.stops.len(), 6);
        assert!(resp.midpoints.is_empty());
    }

    #[test]
    fn gradient_position_errors_surface_as_color_errors() {
        let req: GradientRequest = request(json!({
            "colors": ["red", "green", "blue"],
            "positions": [0, 30, 20]
        }));
        assert!(matches!(
            req.run(),
            Err(ToolError::Color(chroma_core::ColorError::PositionsNotAscending { index: 2 }))
        ));
    }

    #[test]
    fn contrast_black_on_white() {
        let req: ContrastRequest = request(json!({"foreground": "black", "background": "white"}));
        let resp = req.run().unwrap();
        assert_eq!(resp.ratio, 21.0);
        assert_eq!(resp.foreground_luminance, 0.0);
        assert_eq!(resp.background_luminance, 1.0);
        assert!(resp.wcag.aaa_normal);
    }

    #[test]
    fn analyze_picks_readable_text_color() {
        let dark: AnalyzeRequest = request(json!({"color": "navy"}));
        let resp = dark.run().unwrap();
        assert!(!resp.is_light);
        assert_eq!(resp.text_color, Color::WHITE);
        assert_eq!(resp.name, Some("navy"));

        let light: AnalyzeRequest = request(json!({"color": "#ffff99"}));
        let resp = light.run().unwrap();
        assert!(resp.is_light);
        assert_eq!(resp.text_color, Color::BLACK);
    }

    #[test]
    fn complement_of_red_is_cyan() {
        let c = complement(&Color::parse("red").unwrap());
        assert_eq!(c.hex(), "#00ffff");
    }
}
