//! Quadratic level adjustment through black, mid, and white points.
//!
//! # Algorithm
//! The curve is the unique quadratic through `(b, 0)`, `(m, 128)` and
//! `(w, 255)`. With Lagrange interpolation over those points the
//! coefficients reduce to:
//! ```text
//! D  = b²(m − w) − b(m² − w²) + w·m² − m·w²
//! Da = −b(128 − 255) + 128·w − 255·m
//! Db = b²(128 − 255) + 255·m² − 128·w²
//! Dc = b²(255·m − 128·w) − b(255·m² − 128·w²)
//! y  = (Da/D)·x² + (Db/D)·x + Dc/D
//! ```

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, clamp_f64};
use crate::error::{RastraError, Result};
use crate::image::Image;

/// Highest control point accepted.
const LEVEL_MAX: i64 = 255;

/// Fitted `y = a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LevelCurve {
    /// Fit the curve for control points `black ≤ mid ≤ white` in `[0, 255]`.
    ///
    /// Coincident points leave the quadratic undetermined and are rejected.
    pub fn fit(black: i64, mid: i64, white: i64) -> Result<Self> {
        for (name, p) in [("black", black), ("mid", mid), ("white", white)] {
            if !(0..=LEVEL_MAX).contains(&p) {
                return Err(RastraError::invalid(format!(
                    "{name} point {p} is outside 0..={LEVEL_MAX}"
                )));
            }
        }
        if black > mid || mid > white {
            return Err(RastraError::invalid(format!(
                "level points must satisfy black <= mid <= white, got {black}, {mid}, {white}"
            )));
        }
        if black == mid || mid == white {
            return Err(RastraError::invalid(format!(
                "level points must be distinct, got {black}, {mid}, {white}"
            )));
        }

        let (b, m, w) = (black as f64, mid as f64, white as f64);
        let d = b * b * (m - w) - b * (m * m - w * w) + w * m * m - m * w * w;
        let da = -b * (128.0 - 255.0) + 128.0 * w - 255.0 * m;
        let db = b * b * (128.0 - 255.0) + 255.0 * m * m - 128.0 * w * w;
        let dc = b * b * (255.0 * m - 128.0 * w) - b * (255.0 * m * m - 128.0 * w * w);

        Ok(Self {
            a: da / d,
            b: db / d,
            c: dc / d,
        })
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }
}

impl Channel {
    /// Remap every value through the level curve, clamped to
    /// `[0, max_value]`.
    pub fn levels_adjust(&self, black: i64, mid: i64, white: i64, max_value: u32) -> Result<Self> {
        let curve = LevelCurve::fit(black, mid, white)?;
        Ok(self.apply_curve(&curve, max_value))
    }

    /// Evaluate an already-fitted curve at every value.
    pub fn apply_curve(&self, curve: &LevelCurve, max_value: u32) -> Self {
        self.map_values(|v| clamp_f64(curve.eval(f64::from(v)), max_value))
    }
}

impl Image {
    /// Apply the same level curve to all three channels.
    pub fn levels_adjust(&self, black: i64, mid: i64, white: i64) -> Result<Self> {
        let curve = LevelCurve::fit(black, mid, white)?;
        let max = self.max_value();
        Ok(self.map_channels(|c| c.apply_curve(&curve, max)))
    }
}
