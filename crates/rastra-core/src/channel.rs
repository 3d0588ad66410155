//! Single-plane intensity grid.
//!
//! A [`Channel`] is immutable once built: every transform allocates and
//! returns a new grid. The maximum intensity is carried by the owning
//! [`Image`](crate::Image), so operations that clamp take it as an argument.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RastraError, Result};
use crate::kernel::Kernel;

/// A rectangular grid of non-negative integer intensities, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ChannelParts")]
pub struct Channel {
    height: usize,
    width: usize,
    values: Vec<u32>,
}

/// Unchecked serde shape; deserialized channels go through [`Channel::new`].
#[derive(Deserialize)]
struct ChannelParts {
    height: usize,
    width: usize,
    values: Vec<u32>,
}

impl TryFrom<ChannelParts> for Channel {
    type Error = RastraError;

    fn try_from(parts: ChannelParts) -> Result<Self> {
        Self::new(parts.height, parts.width, parts.values)
    }
}

impl Channel {
    /// Build a `height × width` channel from row-major values.
    pub fn new(height: usize, width: usize, values: Vec<u32>) -> Result<Self> {
        if values.len() != width * height {
            return Err(RastraError::invalid(format!(
                "expected {} values for a {height}x{width} channel, got {}",
                width * height,
                values.len()
            )));
        }
        Ok(Self {
            height,
            width,
            values,
        })
    }

    /// Build a channel from a literal grid. Fails on ragged rows.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(RastraError::invalid(format!(
                "row {bad} has {} values, expected {width}",
                rows[bad].len()
            )));
        }
        Ok(Self {
            height,
            width,
            values: rows.concat(),
        })
    }

    /// Assemble a channel whose shape is already known to match `values`.
    pub(crate) fn from_parts(height: usize, width: usize, values: Vec<u32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            height,
            width,
            values,
        }
    }

    /// A channel where every cell holds `value`.
    pub fn filled(height: usize, width: usize, value: u32) -> Self {
        Self {
            height,
            width,
            values: vec![value; width * height],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-major view of every cell.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// An owned copy of the grid, one `Vec` per row.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.values.chunks(self.width).map(<[u32]>::to_vec).collect()
    }

    /// Value at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> Result<u32> {
        if y >= self.height || x >= self.width {
            return Err(RastraError::OutOfBounds {
                y,
                x,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.at(y, x))
    }

    #[inline]
    pub(crate) fn at(&self, y: usize, x: usize) -> u32 {
        self.values[y * self.width + x]
    }

    /// Largest value in the channel, or 0 when empty.
    pub fn max(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Apply `f` to every cell, keeping the shape.
    pub(crate) fn map_values(&self, f: impl Fn(u32) -> u32) -> Self {
        Self {
            height: self.height,
            width: self.width,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Reverse the order of the rows.
    pub fn flip_vertical(&self) -> Self {
        let rows = self.rows();
        Self {
            height: self.height,
            width: self.width,
            values: rows.into_iter().rev().flatten().collect(),
        }
    }

    /// Reverse the order of the columns within each row.
    pub fn flip_horizontal(&self) -> Self {
        let rows = self.rows();
        Self {
            height: self.height,
            width: self.width,
            values: rows
                .into_iter()
                .flat_map(|row| row.into_iter().rev())
                .collect(),
        }
    }

    /// Add `amount` to every cell, clamping to `[0, max_value]`.
    ///
    /// Negative amounts darken.
    pub fn shift(&self, amount: i64, max_value: u32) -> Self {
        self.map_values(|v| clamp_i64(i64::from(v).saturating_add(amount), max_value))
    }

    /// Convolve with `kernel`, rounding and clamping each output cell.
    ///
    /// Kernel cells whose input coordinate falls outside the grid are skipped,
    /// so edge pixels only see the in-bounds part of the neighbourhood.
    pub fn convolve(&self, kernel: &Kernel, max_value: u32) -> Self {
        if self.is_empty() {
            return self.clone();
        }

        let width = self.width;
        let height = self.height as isize;
        let ry = kernel.radius_y() as isize;
        let rx = kernel.radius_x() as isize;
        let mut values = vec![0u32; self.values.len()];

        values
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, out_row)| {
                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut sum = 0.0_f64;
                    for ky in 0..kernel.height() {
                        let iy = y as isize - ry + ky as isize;
                        if iy < 0 || iy >= height {
                            continue;
                        }
                        for kx in 0..kernel.width() {
                            let ix = x as isize - rx + kx as isize;
                            if ix < 0 || ix >= width as isize {
                                continue;
                            }
                            let v = self.values[iy as usize * width + ix as usize];
                            sum += kernel.weight(ky, kx) * f64::from(v);
                        }
                    }
                    *out = clamp_f64(sum, max_value);
                }
            });

        Self {
            height: self.height,
            width,
            values,
        }
    }
}

/// Clamp a signed value into `[0, max_value]`.
#[inline]
pub(crate) fn clamp_i64(v: i64, max_value: u32) -> u32 {
    v.clamp(0, i64::from(max_value)) as u32
}

/// Round to nearest and clamp into `[0, max_value]`.
#[inline]
pub(crate) fn clamp_f64(v: f64, max_value: u32) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, f64::from(max_value)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u32]]) -> Channel {
        Channel::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = Channel::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, RastraError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_channel_is_valid() {
        let c = Channel::from_rows(vec![]).unwrap();
        assert_eq!(c.height(), 0);
        assert_eq!(c.width(), 0);
        assert!(c.flip_vertical().is_empty());
        assert!(c.convolve(&Kernel::gaussian_blur(), 255).is_empty());
    }

    #[test]
    fn test_new_checks_value_count() {
        assert!(Channel::new(2, 2, vec![1, 2, 3]).is_err());
        let c = Channel::new(1, 3, vec![1, 2, 3]).unwrap();
        assert_eq!((c.height(), c.width()), (1, 3));
        assert_eq!(c.get(0, 2), Ok(3));
    }

    #[test]
    fn test_filled_is_height_first() {
        let c = Channel::filled(2, 3, 7);
        assert_eq!((c.height(), c.width()), (2, 3));
        assert_eq!(c.values(), &[7; 6]);
    }

    #[test]
    fn test_deserialize_validates_shape() {
        let err = serde_json::from_str::<Channel>(r#"{"height":2,"width":2,"values":[1]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("expected 4 values"), "{err}");

        let c: Channel =
            serde_json::from_str(r#"{"height":1,"width":2,"values":[4,5]}"#).unwrap();
        assert_eq!(c.flip_horizontal().get(0, 0), Ok(5));
        assert_eq!(serde_json::from_str::<Channel>(&serde_json::to_string(&c).unwrap()).unwrap(), c);
    }

    #[test]
    fn test_shift_darken_clamps_at_zero() {
        let c = grid(&[&[10, 20], &[30, 40]]);
        assert_eq!(c.shift(-15, 255), grid(&[&[0, 5], &[15, 25]]));
    }

    #[test]
    fn test_shift_brighten_clamps_at_max() {
        let c = grid(&[&[250, 100]]);
        assert_eq!(c.shift(10, 255), grid(&[&[255, 110]]));
    }

    #[test]
    fn test_flip_horizontal_reverses_columns() {
        let c = grid(&[&[5, 10, 15, 20]]);
        assert_eq!(c.flip_horizontal(), grid(&[&[20, 15, 10, 5]]));
    }

    #[test]
    fn test_flip_vertical_reverses_rows() {
        let c = grid(&[&[1, 2], &[3, 4], &[5, 6]]);
        assert_eq!(c.flip_vertical(), grid(&[&[5, 6], &[3, 4], &[1, 2]]));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let c = grid(&[&[1, 2], &[3, 4]]);
        assert_eq!(c.get(1, 0), Ok(3));
        assert!(matches!(c.get(2, 0), Err(RastraError::OutOfBounds { .. })));
        assert!(matches!(c.get(0, 2), Err(RastraError::OutOfBounds { .. })));
    }

    #[test]
    fn test_rows_is_a_copy() {
        let c = grid(&[&[1, 2], &[3, 4]]);
        let mut rows = c.rows();
        rows[0][0] = 99;
        assert_eq!(c.get(0, 0), Ok(1));
    }

    #[test]
    fn test_identity_kernel_is_noop() {
        let c = grid(&[&[0, 7, 300], &[12, 999, 4]]);
        assert_eq!(c.convolve(&Kernel::identity(), 999), c);
    }

    #[test]
    fn test_blur_edges_use_only_in_bounds_weights() {
        // Single bright pixel in the corner: only center (4/16), right (2/16),
        // below (2/16) and diagonal (1/16) weights reach in-bounds cells.
        let c = grid(&[&[160, 0], &[0, 0]]);
        let blurred = c.convolve(&Kernel::gaussian_blur(), 255);
        assert_eq!(blurred, grid(&[&[40, 20], &[20, 10]]));
    }

    #[test]
    fn test_convolution_clamps_to_max() {
        let c = grid(&[&[200, 200, 200], &[200, 200, 200], &[200, 200, 200]]);
        let sharpened = c.convolve(&Kernel::sharpen(), 255);
        // Center sees 1 + 8 * 0.25 = 3x the flat value before clamping.
        assert_eq!(sharpened.get(1, 1), Ok(255));
    }
}
