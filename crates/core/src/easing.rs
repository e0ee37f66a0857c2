//! Easing curves used to remap gradient stop positions.
//!
//! Every curve maps [0, 1] onto [0, 1], fixes both endpoints and is
//! monotonically non-decreasing.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Interpolation kind applied to normalized stop positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// Half-sine blend: slow at both ends, fastest through the midpoint.
    Ease,
    EaseIn,
    EaseOut,
    /// Smoothstep `3t² − 2t³`, standing in for a cubic bezier.
    Bezier,
}

impl Easing {
    /// Every easing kind, in declaration order.
    pub const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::Bezier,
    ];

    /// Applies the curve to `t`, which is clamped to [0, 1] first.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::Ease => (1.0 - (PI * t).cos()) / 2.0,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Bezier => t * t * (3.0 - 2.0 * t),
        }
    }
}
