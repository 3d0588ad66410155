//! Lossy compression via a 1-D Haar transform over the flattened channel.
//!
//! # Algorithm
//! 1. Flatten the channel row by row and zero-pad to the next power of two.
//! 2. Forward transform: repeatedly replace pairs `(a, b)` with the average
//!    `(a + b)/√2` in the front half and the difference `(a − b)/√2` in the
//!    back half, recursing on the averages until one value remains.
//! 3. Keep the first `ratio%` coefficients (coarsest first) and zero the rest.
//! 4. Inverse transform, doubling the active length from 2 back up.
//! 5. Drop the padding, round, and clamp.

use std::f64::consts::SQRT_2;

use crate::channel::{Channel, clamp_f64};
use crate::error::{RastraError, Result};
use crate::image::Image;

/// In-place forward Haar transform. `data.len()` must be a power of two.
pub fn haar_forward(data: &mut [f64]) {
    debug_assert!(data.is_empty() || data.len().is_power_of_two());
    let mut scratch = vec![0.0; data.len()];
    let mut len = data.len();
    while len > 1 {
        let half = len / 2;
        for i in 0..half {
            let (a, b) = (data[2 * i], data[2 * i + 1]);
            scratch[i] = (a + b) / SQRT_2;
            scratch[half + i] = (a - b) / SQRT_2;
        }
        data[..len].copy_from_slice(&scratch[..len]);
        len = half;
    }
}

/// In-place inverse of [`haar_forward`].
pub fn haar_inverse(data: &mut [f64]) {
    debug_assert!(data.is_empty() || data.len().is_power_of_two());
    let mut scratch = vec![0.0; data.len()];
    let mut len = 2;
    while len <= data.len() {
        let half = len / 2;
        for i in 0..half {
            let (avg, diff) = (data[i], data[half + i]);
            scratch[2 * i] = (avg + diff) / SQRT_2;
            scratch[2 * i + 1] = (avg - diff) / SQRT_2;
        }
        data[..len].copy_from_slice(&scratch[..len]);
        len *= 2;
    }
}

/// Number of coefficients kept out of `padded_len` at `ratio` percent.
fn retained(padded_len: usize, ratio: f64) -> usize {
    ((padded_len as f64) * ratio / 100.0).round() as usize
}

fn check_ratio(ratio: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&ratio) {
        return Err(RastraError::invalid(format!(
            "compression ratio must be in [0, 100], got {ratio}"
        )));
    }
    Ok(())
}

impl Channel {
    /// Lossy reconstruction keeping `ratio` percent of the Haar coefficients.
    pub fn compress(&self, ratio: f64, max_value: u32) -> Result<Self> {
        check_ratio(ratio)?;
        if self.is_empty() {
            return Ok(self.clone());
        }

        let n = self.values().len();
        let padded = n.next_power_of_two();
        let mut coeffs = vec![0.0; padded];
        for (dst, &v) in coeffs.iter_mut().zip(self.values()) {
            *dst = f64::from(v);
        }

        haar_forward(&mut coeffs);
        let keep = retained(padded, ratio).min(padded);
        coeffs[keep..].fill(0.0);
        haar_inverse(&mut coeffs);

        let values = coeffs[..n].iter().map(|&v| clamp_f64(v, max_value)).collect();
        Ok(Self::from_parts(self.height(), self.width(), values))
    }
}

impl Image {
    /// Compress every channel independently.
    pub fn compress(&self, ratio: f64) -> Result<Self> {
        check_ratio(ratio)?;
        let max = self.max_value();
        self.try_map_channels(|c| c.compress(ratio, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_forward_pair() {
        let mut d = [3.0, 1.0];
        haar_forward(&mut d);
        assert!((d[0] - 4.0 / SQRT_2).abs() < EPSILON);
        assert!((d[1] - 2.0 / SQRT_2).abs() < EPSILON);
    }

    #[test]
    fn test_forward_puts_overall_average_first() {
        let mut d = [5.0, 5.0, 5.0, 5.0];
        haar_forward(&mut d);
        // Two levels of /√2 on a sum of four: 20 / 2 = 10, details all zero.
        assert!((d[0] - 10.0).abs() < EPSILON);
        assert!(d[1..].iter().all(|v| v.abs() < EPSILON));
    }

    #[test]
    fn test_inverse_undoes_forward() {
        let original = [9.0, 7.0, 3.0, 5.0, 0.0, 255.0, 12.0, 1.0];
        let mut d = original;
        haar_forward(&mut d);
        haar_inverse(&mut d);
        for (a, b) in d.iter().zip(original) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_full_ratio_is_lossless() {
        let c = Channel::from_rows(vec![vec![10, 200, 33], vec![0, 255, 7]]).unwrap();
        assert_eq!(c.compress(100.0, 255).unwrap(), c);
    }

    #[test]
    fn test_zero_ratio_blanks_the_channel() {
        let c = Channel::from_rows(vec![vec![10, 200], vec![0, 255]]).unwrap();
        assert_eq!(c.compress(0.0, 255).unwrap(), Channel::filled(2, 2, 0));
    }

    #[test]
    fn test_keeping_only_the_average_flattens() {
        // 4 values, 25% keeps the single average coefficient.
        let c = Channel::from_rows(vec![vec![10, 20], vec![30, 40]]).unwrap();
        assert_eq!(c.compress(25.0, 255).unwrap(), Channel::filled(2, 2, 25));
    }

    #[test]
    fn test_half_ratio_keeps_pair_means() {
        // 50% keeps the average and the top-level difference:
        // each half collapses to its own mean.
        let c = Channel::from_rows(vec![vec![10, 20, 30, 40]]).unwrap();
        let out = c.compress(50.0, 255).unwrap();
        assert_eq!(out.rows(), vec![vec![15, 15, 35, 35]]);
    }

    #[test]
    fn test_rejects_out_of_range_ratio() {
        let c = Channel::filled(2, 2, 1);
        assert!(c.compress(-1.0, 255).is_err());
        assert!(c.compress(100.1, 255).is_err());
        assert!(c.compress(f64::NAN, 255).is_err());
    }

    #[test]
    fn test_empty_channel_passes_through() {
        let c = Channel::default();
        assert_eq!(c.compress(50.0, 255).unwrap(), c);
    }
}
