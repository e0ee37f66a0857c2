#![deny(unsafe_code)]
//! Core color science for the chroma toolkit.
//!
//! Provides the immutable [`Color`] value with parsing and model accessors,
//! conversions between sRGB, HSL, HSV, linear RGB, XYZ, LAB and LCH, WCAG
//! luminance and contrast, weighted mixing and blend modes, tint/shade/tone
//! variations, and gradient stop computation.

pub mod color;
pub mod convert;
pub mod easing;
pub mod error;
pub mod gradient;
pub mod metrics;
pub mod mix;
pub mod named;
pub mod parse;
pub mod variation;

pub use color::{Color, Hsla, Rgba};
pub use convert::{Hsl, Hsv, Lab, Lch, LinearRgb, Rgb, Xyz};
pub use easing::Easing;
pub use error::ColorError;
pub use gradient::{
    build_gradient, Center, Geometry, Gradient, GradientOptions, GradientShape, GradientStop,
    RadialExtent, RadialShape, RadialSize,
};
pub use metrics::{contrast_ratio, delta_e76, relative_luminance};
pub use mix::{blend_pair, mix, BlendMode, MixSpace};
pub use variation::{vary, Variant, VariationKind, VariationOptions, VariationSet};
