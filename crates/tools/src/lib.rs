#![deny(unsafe_code)]
//! Tool registry: maps tool names to request types and runs them over JSON.
//!
//! This crate sits between `chroma-core` (the color science) and front ends
//! such as the CLI. A tool call is a name plus a JSON params object; the
//! params deserialize into the tool's request type, are validated, and the
//! response comes back as JSON.

pub mod error;
pub mod format;
pub mod request;
pub mod response;

use serde::Serialize;
use serde_json::Value;

pub use error::ToolError;
pub use request::{
    AnalyzeRequest, ContrastRequest, ConvertRequest, GradientRequest, MixRequest, ToolRequest,
    VariationRequest,
};

/// Name and one-line description of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every tool, in registry order.
const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "convert_color",
        description: "Convert a color to hex, RGB, HSL, HSV, LAB, LCH and XYZ",
    },
    ToolInfo {
        name: "mix_colors",
        description: "Mix colors by weight in a color model, or blend them with a blend mode",
    },
    ToolInfo {
        name: "generate_variations",
        description: "Generate tints, shades and tones of a base color",
    },
    ToolInfo {
        name: "create_gradient",
        description: "Compute gradient stops, geometry and CSS for a list of colors",
    },
    ToolInfo {
        name: "check_contrast",
        description: "Compute the WCAG contrast ratio and conformance of two colors",
    },
    ToolInfo {
        name: "analyze_color",
        description: "Report luminance, complement and readable text color for a color",
    },
];

/// Enumeration of all registered tools.
///
/// Use [`ToolKind::from_name`] for string-based lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ConvertColor,
    MixColors,
    GenerateVariations,
    CreateGradient,
    CheckContrast,
    AnalyzeColor,
}

impl ToolKind {
    /// Every tool kind, in registry order.
    pub const ALL: [ToolKind; 6] = [
        ToolKind::ConvertColor,
        ToolKind::MixColors,
        ToolKind::GenerateVariations,
        ToolKind::CreateGradient,
        ToolKind::CheckContrast,
        ToolKind::AnalyzeColor,
    ];

    /// Looks a tool up by name.
    ///
    /// Returns `ToolError::UnknownTool` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, ToolError> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Registry entry for this tool.
    pub fn info(self) -> ToolInfo {
        TOOLS[self as usize]
    }

    /// Registered tool name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Returns every registered tool with its description.
    pub fn list_tools() -> &'static [ToolInfo] {
        TOOLS
    }

    /// Runs this tool with JSON params. `null` params count as `{}`.
    pub fn call(self, params: &Value) -> Result<Value, ToolError> {
        match self {
            ToolKind::ConvertColor => call_with::<ConvertRequest>(params),
            ToolKind::MixColors => call_with::<MixRequest>(params),
            ToolKind::GenerateVariations => call_with::<VariationRequest>(params),
            ToolKind::CreateGradient => call_with::<GradientRequest>(params),
            ToolKind::CheckContrast => call_with::<ContrastRequest>(params),
            ToolKind::AnalyzeColor => call_with::<AnalyzeRequest>(params),
        }
    }
}

fn call_with<R: ToolRequest>(params: &Value) -> Result<Value, ToolError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params.clone()
    };
    let request: R =
        serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))?;
    let response = request.run()?;
    serde_json::to_value(response).map_err(|e| ToolError::Serialization(e.to_string()))
}

/// Resolves `name` and runs the tool with `params`.
pub fn dispatch(name: &str, params: &Value) -> Result<Value, ToolError> {
    let kind = ToolKind::from_name(name)?;
    log::debug!("dispatching {name}");
    let result = kind.call(params);
    if let Err(e) = &result {
        log::debug!("{name} failed: {e}");
    }
    result
}
