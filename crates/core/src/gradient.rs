//! Gradient stop computation and geometry.
//!
//! [`build_gradient`] turns an ordered color list into positioned stops plus
//! a renderer-agnostic [`Geometry`]. Positions are either given explicitly,
//! or spread evenly over 0–100, then remapped by an [`Easing`] (interior
//! stops only). Alternatively a step count quantizes the colors into hard
//! bands.
//!
//! [`Gradient::sample`] interpolates between stops in a chosen color model,
//! with shortest-arc hue interpolation for the cylindrical models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Color, PRECISION};
use crate::convert::{
    hsl_to_rgb, lab_to_rgb, lch_to_rgb, normalize_hue, rgb_to_hsl, rgb_to_lab, rgb_to_lch,
    round_to, Hsl, Lab, Lch, Rgb,
};
use crate::easing::Easing;
use crate::error::ColorError;
use crate::mix::MixSpace;

/// Most colors a gradient may have.
pub const MAX_COLORS: usize = 20;
/// Fewest quantization steps.
pub const MIN_STEPS: usize = 2;
/// Most quantization steps.
pub const MAX_STEPS: usize = 100;

/// Shape of a radial gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialShape {
    Circle,
    #[default]
    Ellipse,
}

/// How far a radial gradient extends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialSize {
    ClosestSide,
    ClosestCorner,
    FarthestSide,
    #[default]
    FarthestCorner,
    /// Computed from caller-supplied width and height.
    Explicit,
}

impl RadialSize {
    /// CSS keyword for the non-explicit sizes.
    pub fn keyword(self) -> &'static str {
        match self {
            RadialSize::ClosestSide => "closest-side",
            RadialSize::ClosestCorner => "closest-corner",
            RadialSize::FarthestSide => "farthest-side",
            RadialSize::FarthestCorner => "farthest-corner",
            RadialSize::Explicit => "explicit",
        }
    }
}

/// Center point in percent of the box, each coordinate in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

impl Default for Center {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

impl Center {
    fn validate(&self) -> Result<(), ColorError> {
        for (axis, v) in [("x", self.x), ("y", self.y)] {
            if !(0.0..=100.0).contains(&v) {
                return Err(ColorError::InvalidParameter(format!(
                    "center {axis} must be in [0, 100], got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Requested gradient geometry, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientShape {
    Linear {
        /// Direction in degrees; 180 points down.
        #[serde(default = "default_linear_angle")]
        angle: f64,
    },
    Radial {
        #[serde(default)]
        shape: RadialShape,
        #[serde(default)]
        size: RadialSize,
        #[serde(default)]
        center: Center,
        /// Width and height in pixels, required for [`RadialSize::Explicit`].
        #[serde(default)]
        dimensions: Option<[f64; 2]>,
    },
    Conic {
        /// Start angle in degrees.
        #[serde(default)]
        angle: f64,
        #[serde(default)]
        center: Center,
    },
}

fn default_linear_angle() -> f64 {
    180.0
}

impl Default for GradientShape {
    fn default() -> Self {
        GradientShape::Linear {
            angle: default_linear_angle(),
        }
    }
}

/// Resolved extent of a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RadialExtent {
    /// Passed through to the renderer as a keyword.
    Keyword { size: RadialSize },
    Circle { radius: f64 },
    Ellipse { rx: f64, ry: f64 },
}

impl fmt::Display for RadialExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadialExtent::Keyword { size } => f.write_str(size.keyword()),
            RadialExtent::Circle { radius } => write!(f, "{radius}px"),
            RadialExtent::Ellipse { rx, ry } => write!(f, "{rx}px {ry}px"),
        }
    }
}

/// Resolved geometry descriptor handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Linear {
        angle: f64,
    },
    Radial {
        shape: RadialShape,
        extent: RadialExtent,
        center: Center,
    },
    Conic {
        angle: f64,
        center: Center,
    },
}

fn check_angle(angle: f64) -> Result<f64, ColorError> {
    if angle.is_finite() {
        Ok(normalize_hue(angle))
    } else {
        Err(ColorError::InvalidParameter(format!(
            "angle must be finite, got {angle}"
        )))
    }
}

impl GradientShape {
    /// Validates the request and computes the geometry descriptor.
    pub fn resolve(&self) -> Result<Geometry, ColorError> {
        match *self {
            GradientShape::Linear { angle } => Ok(Geometry::Linear {
                angle: check_angle(angle)?,
            }),
            GradientShape::Conic { angle, center } => {
                center.validate()?;
                Ok(Geometry::Conic {
                    angle: check_angle(angle)?,
                    center,
                })
            }
            GradientShape::Radial {
                shape,
                size,
                center,
                dimensions,
            } => {
                center.validate()?;
                let extent = match size {
                    RadialSize::Explicit => {
                        let [width, height] = dimensions.ok_or_else(|| {
                            ColorError::InvalidParameter(
                                "explicit radial size requires dimensions".to_string(),
                            )
                        })?;
                        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0)
                        {
                            return Err(ColorError::InvalidParameter(format!(
                                "dimensions must be positive, got {width}x{height}"
                            )));
                        }
                        match shape {
                            RadialShape::Circle => RadialExtent::Circle {
                                radius: width.min(height) / 2.0,
                            },
                            RadialShape::Ellipse => RadialExtent::Ellipse {
                                rx: width / 2.0,
                                ry: height / 2.0,
                            },
                        }
                    }
                    keyword => RadialExtent::Keyword { size: keyword },
                };
                Ok(Geometry::Radial {
                    shape,
                    extent,
                    center,
                })
            }
        }
    }
}

/// Options for [`build_gradient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientOptions {
    /// Explicit stop positions in percent, one per color, strictly ascending.
    pub positions: Option<Vec<f64>>,
    pub easing: Easing,
    /// Quantize into this many hard bands instead of positioned stops.
    pub steps: Option<usize>,
    pub shape: GradientShape,
}

/// One anchor of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub color: Color,
    /// Position in percent, [0, 100].
    pub position: f64,
}

/// A complete, renderer-agnostic gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
    pub geometry: Geometry,
    /// True when stops are hard bands produced by quantization.
    pub stepped: bool,
}

/// Evenly spaced positions: `i * 100 / (n - 1)`, or 50 for a single color.
pub fn even_positions(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![50.0],
        _ => (0..n).map(|i| i as f64 * 100.0 / (n - 1) as f64).collect(),
    }
}

/// Checks explicit positions against the color count, range and ordering.
pub fn validate_positions(positions: &[f64], color_count: usize) -> Result<(), ColorError> {
    if positions.len() != color_count {
        return Err(ColorError::PositionCountMismatch {
            colors: color_count,
            positions: positions.len(),
        });
    }
    if let Some(p) = positions.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(ColorError::InvalidParameter(format!(
            "positions must be in [0, 100], got {p}"
        )));
    }
    if let Some(i) = positions.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ColorError::PositionsNotAscending { index: i + 1 });
    }
    Ok(())
}

/// Applies `easing` to interior positions; the first and last stay fixed.
///
/// Interior positions are normalized against the first and last stop, so
/// eased stops never leave that span.
pub fn ease_positions(positions: &[f64], easing: Easing) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
        return Vec::new();
    };
    let span = last - first;
    let end = positions.len() - 1;
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            if i == 0 || i == end || span <= 0.0 {
                p
            } else {
                first + easing.apply((p - first) / span) * span
            }
        })
        .collect()
}

/// Color index for each of `steps` equally spaced bands:
/// `floor(i / (steps - 1) * (count - 1))`.
pub fn quantized_indices(color_count: usize, steps: usize) -> Vec<usize> {
    if steps < 2 {
        return vec![0; steps];
    }
    let last = color_count.saturating_sub(1);
    (0..steps).map(|i| i * last / (steps - 1)).collect()
}

/// Builds a gradient from `colors`.
pub fn build_gradient(colors: &[Color], options: &GradientOptions) -> Result<Gradient, ColorError> {
    if colors.is_empty() {
        return Err(ColorError::EmptyInput);
    }
    if colors.len() > MAX_COLORS {
        return Err(ColorError::InvalidParameter(format!(
            "at most {MAX_COLORS} colors are allowed, got {}",
            colors.len()
        )));
    }
    let geometry = options.shape.resolve()?;

    if let Some(steps) = options.steps {
        if options.positions.is_some() {
            return Err(ColorError::InvalidParameter(
                "steps and explicit positions are mutually exclusive".to_string(),
            ));
        }
        if !(MIN_STEPS..=MAX_STEPS).contains(&steps) {
            return Err(ColorError::InvalidParameter(format!(
                "steps must be in [{MIN_STEPS}, {MAX_STEPS}], got {steps}"
            )));
        }
        if options.easing != Easing::Linear {
            log::debug!("easing {:?} ignored for a stepped gradient", options.easing);
        }
        let stops = quantized_indices(colors.len(), steps)
            .into_iter()
            .zip(even_positions(steps))
            .map(|(idx, position)| GradientStop {
                color: colors[idx],
                position: round_to(position, PRECISION),
            })
            .collect();
        return Ok(Gradient {
            stops,
            geometry,
            stepped: true,
        });
    }

    let positions = match &options.positions {
        Some(explicit) => {
            validate_positions(explicit, colors.len())?;
            explicit.clone()
        }
        None => even_positions(colors.len()),
    };
    let stops = colors
        .iter()
        .zip(ease_positions(&positions, options.easing))
        .map(|(&color, position)| GradientStop {
            color,
            position: round_to(position, PRECISION),
        })
        .collect();

    Ok(Gradient {
        stops,
        geometry,
        stepped: false,
    })
}

/// Interpolates hue using shortest-arc logic, handling wraparound at 360.
fn interpolate_hue(h0: f64, h1: f64, t: f64) -> f64 {
    let delta = match h1 - h0 {
        d if d > 180.0 => d - 360.0,
        d if d < -180.0 => d + 360.0,
        d => d,
    };
    normalize_hue(h0 + t * delta)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Interpolates between two colors in `space` at `t` in [0, 1].
pub fn interpolate(a: &Color, b: &Color, t: f64, space: MixSpace) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let (ra, rb) = (a.rgb_f64(), b.rgb_f64());
    let rgb = match space {
        MixSpace::Rgb => Rgb {
            r: lerp(ra.r, rb.r, t),
            g: lerp(ra.g, rb.g, t),
            b: lerp(ra.b, rb.b, t),
        },
        MixSpace::Lab => {
            let (la, lb) = (rgb_to_lab(ra), rgb_to_lab(rb));
            lab_to_rgb(Lab {
                l: lerp(la.l, lb.l, t),
                a: lerp(la.a, lb.a, t),
                b: lerp(la.b, lb.b, t),
            })
        }
        MixSpace::Hsl => {
            let (ha, hb) = (rgb_to_hsl(ra), rgb_to_hsl(rb));
            hsl_to_rgb(Hsl {
                h: interpolate_hue(ha.h, hb.h, t),
                s: lerp(ha.s, hb.s, t),
                l: lerp(ha.l, hb.l, t),
            })
        }
        MixSpace::Lch => {
            let (ca, cb) = (rgb_to_lch(ra), rgb_to_lch(rb));
            lch_to_rgb(Lch {
                l: lerp(ca.l, cb.l, t),
                c: lerp(ca.c, cb.c, t),
                h: interpolate_hue(ca.h, cb.h, t),
            })
        }
    };
    Color::from_rgb_clamped(rgb, lerp(a.alpha(), b.alpha(), t))
}

impl Gradient {
    /// Samples the gradient at `t` in [0, 1] (clamped).
    ///
    /// Before the first stop and after the last the end colors hold. Stepped
    /// gradients return the band color without interpolation. Returns `None`
    /// only for a gradient without stops.
    pub fn sample(&self, t: f64, space: MixSpace) -> Option<Color> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len();
        let (first, last) = (self.stops.first()?, self.stops.last()?);

        if self.stepped {
            let band = ((t * n as f64) as usize).min(n - 1);
            return Some(self.stops[band].color);
        }

        let p = t * 100.0;
        if p <= first.position {
            return Some(first.color);
        }
        if p >= last.position {
            return Some(last.color);
        }

        let idx = self
            .stops
            .windows(2)
            .position(|w| p <= w[1].position)
            .unwrap_or(n - 2);
        let (s0, s1) = (&self.stops[idx], &self.stops[idx + 1]);
        let span = s1.position - s0.position;
        let frac = if span > 0.0 {
            (p - s0.position) / span
        } else {
            1.0
        };
        Some(interpolate(&s0.color, &s1.color, frac, space))
    }
}
