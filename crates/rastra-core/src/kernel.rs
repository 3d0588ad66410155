//! Convolution kernels.

use serde::{Deserialize, Serialize};

use crate::error::{RastraError, Result};

/// An odd-height × odd-width matrix of real weights, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    height: usize,
    width: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from rows of weights.
    ///
    /// Fails with `InvalidArgument` when the rows are ragged, empty, or either
    /// dimension is even.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(RastraError::invalid("kernel rows must all have the same length"));
        }
        if height % 2 == 0 || width % 2 == 0 {
            return Err(RastraError::invalid(format!(
                "kernel must have odd dimensions, got {height}x{width}"
            )));
        }
        Ok(Self {
            height,
            width,
            weights: rows.concat(),
        })
    }

    /// The 1×1 identity kernel.
    pub fn identity() -> Self {
        Self {
            height: 1,
            width: 1,
            weights: vec![1.0],
        }
    }

    /// 3×3 Gaussian blur, `[[1,2,1],[2,4,2],[1,2,1]] / 16`.
    pub fn gaussian_blur() -> Self {
        const W: [f64; 9] = [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0];
        Self {
            height: 3,
            width: 3,
            weights: W.iter().map(|w| w / 16.0).collect(),
        }
    }

    /// 5×5 sharpen: center 1, first ring 1/4, outer ring −1/8.
    pub fn sharpen() -> Self {
        let mut weights = Vec::with_capacity(25);
        for y in 0..5_i32 {
            for x in 0..5_i32 {
                let ring = (y - 2).abs().max((x - 2).abs());
                weights.push(match ring {
                    0 => 1.0,
                    1 => 0.25,
                    _ => -0.125,
                });
            }
        }
        Self {
            height: 5,
            width: 5,
            weights,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Vertical half-extent, `height / 2`.
    pub fn radius_y(&self) -> usize {
        self.height / 2
    }

    /// Horizontal half-extent, `width / 2`.
    pub fn radius_x(&self) -> usize {
        self.width / 2
    }

    #[inline]
    pub fn weight(&self, ky: usize, kx: usize) -> f64 {
        self.weights[ky * self.width + kx]
    }
}
