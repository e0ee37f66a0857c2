//! Error types for the color engine.

use thiserror::Error;

/// Errors produced by color construction and color operations.
///
/// Every failure is scoped to the single computation that produced it.
/// Arithmetic edge cases (division by zero in blend modes, out-of-gamut
/// conversions) are resolved by policy and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// A color string or numeric tuple could not be turned into a color.
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    /// Mixing weights had the wrong length, a negative entry, or did not sum to 1.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// An operation that needs at least one color received none.
    #[error("empty input: at least one color is required")]
    EmptyInput,

    /// Explicit gradient positions did not match the number of colors.
    #[error("position count mismatch: {colors} colors but {positions} positions")]
    PositionCountMismatch { colors: usize, positions: usize },

    /// Explicit gradient positions were not strictly ascending.
    #[error("positions not ascending: position {index} is not greater than the previous one")]
    PositionsNotAscending { index: usize },

    /// A numeric option was outside its allowed range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
