//! Parsing of color strings.
//!
//! Accepted notations:
//! - hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (the `#` is optional)
//! - functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hsv()`, `hsva()`,
//!   `hsb()`, `lab()`, `lch()`, with comma or whitespace separators and an
//!   optional `/ alpha`
//! - CSS color keywords and `transparent`

use crate::color::Color;
use crate::error::ColorError;
use crate::named;

/// One numeric argument of a functional notation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Component {
    Number(f64),
    Percent(f64),
}

impl Component {
    /// Value with percentages mapped onto `[0, full]`.
    fn scaled(self, full: f64) -> f64 {
        match self {
            Component::Number(v) => v,
            Component::Percent(p) => p / 100.0 * full,
        }
    }
}

fn invalid(input: &str, reason: impl AsRef<str>) -> ColorError {
    ColorError::InvalidColorFormat(format!("'{input}': {}", reason.as_ref()))
}

/// Parses a color from any supported notation.
pub fn parse_color(input: &str) -> Result<Color, ColorError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid(input, "empty color string"));
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).map_err(|reason| invalid(input, reason));
    }

    if let Some(open) = s.find('(') {
        let name = s[..open].trim().to_ascii_lowercase();
        let args = s[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| invalid(input, "missing closing parenthesis"))?;
        return parse_function(&name, args).map_err(|e| match e {
            ColorError::InvalidColorFormat(reason) => invalid(input, reason),
            other => other,
        });
    }

    if s.eq_ignore_ascii_case("transparent") {
        return Color::from_rgba(0.0, 0.0, 0.0, 0.0);
    }

    if let Some(rgb) = named::lookup(s) {
        return Ok(Color::from_rgb8(rgb));
    }

    if matches!(s.len(), 3 | 4 | 6 | 8) && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return parse_hex(s).map_err(|reason| invalid(input, reason));
    }

    Err(invalid(input, "unrecognized color format"))
}

/// Parses the digits of a hex color (without `#`).
fn parse_hex(hex: &str) -> Result<Color, String> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digits '{hex}'"));
    }
    let digit = |i: usize| {
        u8::from_str_radix(&hex[i..i + 1], 16).map_err(|e| format!("invalid hex digit: {e}"))
    };
    let pair = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("invalid hex digits: {e}"))
    };

    let (r, g, b, a) = match hex.len() {
        3 => (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255),
        4 => (
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
            digit(3)? * 17,
        ),
        6 => (pair(0)?, pair(2)?, pair(4)?, 255),
        8 => (pair(0)?, pair(2)?, pair(4)?, pair(6)?),
        n => return Err(format!("expected 3, 4, 6 or 8 hex digits, got {n}")),
    };

    Color::from_rgba(r as f64, g as f64, b as f64, a as f64 / 255.0).map_err(|e| e.to_string())
}

/// Parses a single argument such as `42`, `50%`, `120deg` or `0.5turn`.
fn parse_component(token: &str) -> Result<Component, ColorError> {
    let bad = || ColorError::InvalidColorFormat(format!("invalid number '{token}'"));
    let number = |s: &str| -> Result<f64, ColorError> {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(bad)
    };

    if let Some(p) = token.strip_suffix('%') {
        Ok(Component::Percent(number(p)?))
    } else if let Some(d) = token.strip_suffix("deg") {
        Ok(Component::Number(number(d)?))
    } else if let Some(t) = token.strip_suffix("turn") {
        Ok(Component::Number(number(t)? * 360.0))
    } else if let Some(r) = token.strip_suffix("rad") {
        Ok(Component::Number(number(r)?.to_degrees()))
    } else {
        Ok(Component::Number(number(token)?))
    }
}

/// Alpha is either a 0–1 number or a percentage.
fn alpha_of(c: Option<&Component>) -> f64 {
    c.map(|c| c.scaled(1.0)).unwrap_or(1.0)
}

fn parse_function(name: &str, args: &str) -> Result<Color, ColorError> {
    let normalized = args.replace([',', '/'], " ");
    let parts = normalized
        .split_whitespace()
        .map(parse_component)
        .collect::<Result<Vec<_>, _>>()?;

    if !matches!(parts.len(), 3 | 4) {
        return Err(ColorError::InvalidColorFormat(format!(
            "{name}() expects 3 or 4 arguments, got {}",
            parts.len()
        )));
    }
    let alpha = alpha_of(parts.get(3));

    match name {
        "rgb" | "rgba" => Color::from_rgba(
            parts[0].scaled(255.0),
            parts[1].scaled(255.0),
            parts[2].scaled(255.0),
            alpha,
        ),
        "hsl" | "hsla" => Color::from_hsla(
            parts[0].scaled(360.0),
            parts[1].scaled(100.0),
            parts[2].scaled(100.0),
            alpha,
        ),
        "hsv" | "hsva" | "hsb" | "hsba" => Color::from_hsva(
            parts[0].scaled(360.0),
            parts[1].scaled(100.0),
            parts[2].scaled(100.0),
            alpha,
        ),
        // CSS maps 100% of a/b to 125 and 100% of chroma to 150.
        "lab" => Color::from_laba(
            parts[0].scaled(100.0),
            parts[1].scaled(125.0),
            parts[2].scaled(125.0),
            alpha,
        ),
        "lch" => Color::from_lcha(
            parts[0].scaled(100.0),
            parts[1].scaled(150.0),
            parts[2].scaled(360.0),
            alpha,
        ),
        other => Err(ColorError::InvalidColorFormat(format!(
            "unknown color function '{other}'"
        ))),
    }
}
