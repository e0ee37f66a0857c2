#![deny(unsafe_code)]
//! CLI binary for the chroma color toolkit.
//!
//! Subcommands:
//! - `convert <color>`: every color model plus CSS notations
//! - `mix <colors>...`: weighted mix or sequential blend
//! - `vary <color>`: tints, shades and tones
//! - `gradient <colors>...`: stops, geometry and CSS
//! - `contrast <fg> <bg>`: WCAG contrast ratio and conformance
//! - `analyze <color>`: luminance, complement and text color
//! - `tools`: list registered tools
//! - `call <tool>`: run any tool with raw JSON params

mod error;

use chroma_core::gradient::Center;
use chroma_core::GradientShape;
use chroma_tools::format::{ColorFormat, WcagRating};
use chroma_tools::{
    dispatch, AnalyzeRequest, ContrastRequest, ConvertRequest, GradientRequest, MixRequest,
    ToolKind, ToolRequest, VariationRequest,
};
use clap::{Parser, Subcommand};
use error::CliError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::process;

#[derive(Parser)]
#[command(name = "chroma", about = "Color conversion, mixing, gradients and contrast")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging entirely.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a color to every supported model.
    Convert {
        /// Color as hex, functional notation or CSS name.
        color: String,

        /// Comma-separated CSS notations to show (hex, rgb, hsl, hsv, lab, lch).
        #[arg(short, long, value_delimiter = ',')]
        formats: Vec<String>,
    },
    /// Mix colors by weight, or blend them with a blend mode.
    Mix {
        /// Colors to mix (1 to 10).
        #[arg(required = true)]
        colors: Vec<String>,

        /// Comma-separated weights, one per color, summing to 1.
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        weights: Vec<f64>,

        /// Model to mix in (rgb, hsl, lab, lch).
        #[arg(short, long, default_value = "rgb")]
        space: String,

        /// Blend mode (normal, multiply, screen, overlay, darken, lighten,
        /// difference, exclusion, color_burn, color_dodge).
        #[arg(short, long, default_value = "normal")]
        mode: String,
    },
    /// Generate tints, shades and tones of a color.
    Vary {
        /// Base color.
        color: String,

        /// Which series to generate (tints, shades, tones, all).
        #[arg(short, long, default_value = "all")]
        kind: String,

        /// Entries per series (3 to 20).
        #[arg(short, long, default_value_t = 5)]
        steps: usize,

        /// How far the last entry moves, in percent.
        #[arg(short, long, default_value_t = 100.0)]
        intensity: f64,
    },
    /// Build a gradient from two or more colors.
    Gradient {
        /// Colors in order (2 to 20).
        #[arg(required = true)]
        colors: Vec<String>,

        /// Comma-separated stop positions in percent, strictly ascending.
        #[arg(short, long, value_delimiter = ',')]
        positions: Vec<f64>,

        /// Easing for interior stops (linear, ease, ease_in, ease_out, bezier).
        #[arg(short, long, default_value = "linear")]
        easing: String,

        /// Quantize into this many hard bands (2 to 100).
        #[arg(short, long)]
        steps: Option<usize>,

        /// Gradient type (linear, radial, conic).
        #[arg(short = 't', long = "type", default_value = "linear")]
        kind: String,

        /// Angle in degrees (linear direction or conic start).
        #[arg(short, long, allow_negative_numbers = true)]
        angle: Option<f64>,

        /// Radial shape (circle, ellipse).
        #[arg(long, default_value = "ellipse")]
        shape: String,

        /// Radial size (closest_side, closest_corner, farthest_side,
        /// farthest_corner, explicit).
        #[arg(long, default_value = "farthest_corner")]
        size: String,

        /// Center as "x,y" in percent.
        #[arg(long, value_delimiter = ',')]
        center: Vec<f64>,

        /// Box width in pixels, for explicit radial sizes.
        #[arg(short = 'W', long)]
        width: Option<f64>,

        /// Box height in pixels, for explicit radial sizes.
        #[arg(short = 'H', long)]
        height: Option<f64>,

        /// Model for sampled midpoints (rgb, hsl, lab, lch).
        #[arg(long, default_value = "rgb")]
        interpolation: String,
    },
    /// Check the WCAG contrast of two colors.
    Contrast {
        /// Text color.
        foreground: String,
        /// Background color.
        background: String,
    },
    /// Analyze a single color.
    Analyze {
        /// Color to analyze.
        color: String,
    },
    /// List registered tools.
    Tools,
    /// Run a tool by name with JSON params.
    Call {
        /// Tool name (see `chroma tools`).
        tool: String,

        /// Tool parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

/// Parses a snake_case enum value the same way the JSON params do.
fn parse_enum<T: DeserializeOwned>(what: &str, value: &str) -> Result<T, CliError> {
    let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| CliError::Input(format!("invalid {what}: {value}")))
}

fn optional_list<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn parse_center(values: &[f64]) -> Result<Center, CliError> {
    match values {
        [] => Ok(Center::default()),
        [x, y] => Ok(Center { x: *x, y: *y }),
        _ => Err(CliError::Input(format!(
            "--center takes two values, got {}",
            values.len()
        ))),
    }
}

fn gradient_shape(
    kind: &str,
    angle: Option<f64>,
    shape: &str,
    size: &str,
    center: &[f64],
    width: Option<f64>,
    height: Option<f64>,
) -> Result<GradientShape, CliError> {
    let center = parse_center(center)?;
    match kind {
        "linear" => Ok(GradientShape::Linear {
            angle: angle.unwrap_or(180.0),
        }),
        "conic" => Ok(GradientShape::Conic {
            angle: angle.unwrap_or(0.0),
            center,
        }),
        "radial" => {
            let dimensions = match (width, height) {
                (Some(w), Some(h)) => Some([w, h]),
                (None, None) => None,
                _ => {
                    return Err(CliError::Input(
                        "--width and --height must be given together".to_string(),
                    ))
                }
            };
            Ok(GradientShape::Radial {
                shape: parse_enum("shape", shape)?,
                size: parse_enum("size", size)?,
                center,
                dimensions,
            })
        }
        other => Err(CliError::Input(format!("invalid gradient type: {other}"))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn rating_label(rating: WcagRating) -> &'static str {
    match rating {
        WcagRating::Aaa => "AAA",
        WcagRating::Aa => "AA",
        WcagRating::AaLarge => "AA Large",
        WcagRating::Fail => "Fail",
    }
}

fn pass(ok: bool) -> &'static str {
    if ok {
        "pass"
    } else {
        "fail"
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Convert { color, formats } => {
            let formats = formats
                .iter()
                .map(|f| parse_enum::<ColorFormat>("format", f))
                .collect::<Result<Vec<_>, _>>()?;
            let resp = ConvertRequest {
                color,
                formats: optional_list(formats),
            }
            .run()?;
            if cli.json {
                return print_json(&resp);
            }
            match resp.name {
                Some(name) => println!("{} ({name})", resp.hex),
                None => println!("{}", resp.hex),
            }
            for (format, css) in &resp.css {
                println!("  {:<4} {css}", format!("{format:?}").to_lowercase());
            }
            println!("  xyz  {} {} {}", resp.xyz.x, resp.xyz.y, resp.xyz.z);
        }
        Command::Mix {
            colors,
            weights,
            space,
            mode,
        } => {
            let resp = MixRequest {
                colors,
                weights: optional_list(weights),
                space: parse_enum("space", &space)?,
                mode: parse_enum("mode", &mode)?,
            }
            .run()?;
            if cli.json {
                return print_json(&resp);
            }
            println!("{}", resp.result);
            for (input, de) in resp.inputs.iter().zip(&resp.delta_e) {
                println!("  {input}  ΔE {de}");
            }
        }
        Command::Vary {
            color,
            kind,
            steps,
            intensity,
        } => {
            let resp = VariationRequest {
                color,
                kind: parse_enum("kind", &kind)?,
                steps,
                intensity,
            }
            .run()?;
            if cli.json {
                return print_json(&resp);
            }
            for series in &resp.series {
                let hexes: Vec<String> = series.steps.iter().map(|s| s.color.hex()).collect();
                println!("{:<6} {}", format!("{:?}", series.variant), hexes.join(" "));
            }
            if resp.skipped > 0 {
                eprintln!("skipped {} entries", resp.skipped);
            }
        }
        Command::Gradient {
            colors,
            positions,
            easing,
            steps,
            kind,
            angle,
            shape,
            size,
            center,
            width,
            height,
            interpolation,
        } => {
            let shape = gradient_shape(&kind, angle, &shape, &size, &center, width, height)?;
            let resp = GradientRequest {
                colors,
                positions: optional_list(positions),
                easing: parse_enum("easing", &easing)?,
                steps,
                shape,
                interpolation: parse_enum("interpolation", &interpolation)?,
            }
            .run()?;
            if cli.json {
                return print_json(&resp);
            }
            println!("{}", resp.css);
            for stop in &resp.stops {
                println!("  {}  {}%", stop.color, stop.position);
            }
        }
        Command::Contrast {
            foreground,
            background,
        } => {
            let resp = ContrastRequest {
                foreground,
                background,
            }
            .run()?;
            if cli.json {
                return print_json(&resp);
            }
            println!("{}:1 ({})", resp.ratio, rating_label(resp.wcag.rating));
            println!("  AA normal   {}", pass(resp.wcag.aa_normal));
            println!("  AA large    {}", pass(resp.wcag.aa_large));
            println!("  AAA normal  {}", pass(resp.wcag.aaa_normal));
            println!("  AAA large   {}", pass(resp.wcag.aaa_large));
        }
        Command::Analyze { color } => {
            let resp = AnalyzeRequest { color }.run()?;
            if cli.json {
                return print_json(&resp);
            }
            match resp.name {
                Some(name) => println!("{} ({name})", resp.color),
                None => println!("{}", resp.color),
            }
            let tone = if resp.is_light { "light" } else { "dark" };
            println!("  luminance   {} ({tone})", resp.luminance);
            println!(
                "  complement  {} (ΔE {})",
                resp.complement, resp.complement_delta_e
            );
            println!("  on white    {}:1", resp.contrast_on_white);
            println!("  on black    {}:1", resp.contrast_on_black);
            println!("  text color  {}", resp.text_color);
        }
        Command::Tools => {
            let tools = ToolKind::list_tools();
            if cli.json {
                return print_json(&tools);
            }
            for tool in tools {
                println!("  {:<20} {}", tool.name, tool.description);
            }
        }
        Command::Call { tool, params } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let out = dispatch(&tool, &params)?;
            print_json(&out)?;
        }
    }

    Ok(())
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Off;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the stderr logger. Fails if a logger is already set.
fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(log_level(cli.verbose, cli.quiet)) {
        eprintln!("warning: logging disabled: {e}");
    }
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_core::gradient::{RadialShape, RadialSize};
    use chroma_core::MixSpace;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_enum_accepts_dashes_and_case() {
        let space: MixSpace = parse_enum("space", "LAB").unwrap();
        assert_eq!(space, MixSpace::Lab);
        let size: RadialSize = parse_enum("size", "closest-side").unwrap();
        assert_eq!(size, RadialSize::ClosestSide);
    }

    #[test]
    fn parse_enum_rejects_unknown_values() {
        let err = parse_enum::<MixSpace>("space", "cmyk").unwrap_err();
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("cmyk"));
    }

    #[test]
    fn radial_shape_from_flags() {
        let shape = gradient_shape(
            "radial",
            None,
            "circle",
            "explicit",
            &[25.0, 75.0],
            Some(400.0),
            Some(200.0),
        )
        .unwrap();
        assert_eq!(
            shape,
            GradientShape::Radial {
                shape: RadialShape::Circle,
                size: RadialSize::Explicit,
                center: Center { x: 25.0, y: 75.0 },
                dimensions: Some([400.0, 200.0]),
            }
        );
    }

    #[test]
    fn lone_width_is_rejected() {
        let result = gradient_shape("radial", None, "circle", "explicit", &[], Some(400.0), None);
        assert!(result.is_err());
    }

    #[test]
    fn center_needs_two_values() {
        assert!(parse_center(&[10.0]).is_err());
        assert_eq!(parse_center(&[]).unwrap(), Center::default());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0, false), LevelFilter::Warn);
        assert_eq!(log_level(2, false), LevelFilter::Debug);
        assert_eq!(log_level(5, false), LevelFilter::Trace);
        assert_eq!(log_level(3, true), LevelFilter::Off);
    }

    #[test]
    fn second_logger_init_is_reported() {
        let _ = init_logging(LevelFilter::Off);
        assert!(init_logging(LevelFilter::Off).is_err());
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["chroma", "--json", "mix", "red", "blue", "-w", "0.5,0.5"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Mix { colors, weights, .. } => {
                assert_eq!(colors, vec!["red", "blue"]);
                assert_eq!(weights, vec![0.5, 0.5]);
            }
            _ => panic!("expected mix"),
        }
    }
}
