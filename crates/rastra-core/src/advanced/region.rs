//! Column trimming, overlay compositing, and bilinear downscaling.

use crate::channel::{Channel, clamp_f64};
use crate::error::{RastraError, Result};
use crate::image::Image;

impl Channel {
    /// Keep only columns `[start, end)` of every row.
    pub fn trim(&self, start: usize, end: usize) -> Result<Self> {
        if start >= end || end > self.width() {
            return Err(RastraError::invalid(format!(
                "trim range {start}..{end} is not inside 0..{}",
                self.width()
            )));
        }
        let values = self
            .rows()
            .into_iter()
            .flat_map(|row| row[start..end].to_vec())
            .collect();
        Ok(Self::from_parts(self.height(), end - start, values))
    }

    /// Copy of `self` with columns `start..min(width, other.width)` taken
    /// from `other` at the same row and column.
    pub fn overlay(&self, other: &Self, start: usize) -> Result<Self> {
        if start > self.width() {
            return Err(RastraError::invalid(format!(
                "overlay start {start} is past width {}",
                self.width()
            )));
        }
        if other.height() != self.height() {
            return Err(RastraError::mismatch(format!(
                "overlay needs equal heights, got {} and {}",
                self.height(),
                other.height()
            )));
        }
        let end = self.width().min(other.width());
        let mut values = self.values().to_vec();
        for y in 0..self.height() {
            for x in start..end {
                values[y * self.width() + x] = other.at(y, x);
            }
        }
        Ok(Self::from_parts(self.height(), self.width(), values))
    }

    /// Resize to `width × height` by bilinear interpolation.
    ///
    /// The target must be non-empty and no larger than the source.
    pub fn downscale(&self, width: usize, height: usize, max_value: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > self.width() || height > self.height() {
            return Err(RastraError::invalid(format!(
                "cannot downscale {}x{} to {height}x{width}",
                self.height(),
                self.width()
            )));
        }
        let sx = self.width() as f64 / width as f64;
        let sy = self.height() as f64 / height as f64;
        let mut values = Vec::with_capacity(width * height);
        for ty in 0..height {
            let y = ty as f64 * sy;
            let y0 = y.floor() as usize;
            let y1 = (y0 + 1).min(self.height() - 1);
            let fy = y - y0 as f64;
            for tx in 0..width {
                let x = tx as f64 * sx;
                let x0 = x.floor() as usize;
                let x1 = (x0 + 1).min(self.width() - 1);
                let fx = x - x0 as f64;

                let top = lerp(self.at(y0, x0), self.at(y0, x1), fx);
                let bottom = lerp(self.at(y1, x0), self.at(y1, x1), fx);
                values.push(clamp_f64(top + (bottom - top) * fy, max_value));
            }
        }
        Ok(Self::from_parts(height, width, values))
    }
}

fn lerp(a: u32, b: u32, t: f64) -> f64 {
    f64::from(a) + (f64::from(b) - f64::from(a)) * t
}

impl Image {
    /// Keep only columns `[start, end)`.
    pub fn trim(&self, start: usize, end: usize) -> Result<Self> {
        self.try_map_channels(|c| c.trim(start, end))
    }

    /// Split-screen composite: `self` with columns from `start` onward taken
    /// from `other`. The result keeps `self`'s max value.
    pub fn overlay(&self, other: &Self, start: usize) -> Result<Self> {
        let [r, g, b] = other.channels();
        let max = self.max_value();
        let composite = Self::from_channels(
            self.red().overlay(r, start)?,
            self.green().overlay(g, start)?,
            self.blue().overlay(b, start)?,
            max,
        );
        // `other` may carry a larger range; clamp into ours.
        if other.max_value() > max {
            return Ok(composite.map_channels(|c| c.map_values(|v| v.min(max))));
        }
        Ok(composite)
    }

    /// Bilinear resize to a smaller `width × height`.
    pub fn downscale(&self, width: usize, height: usize) -> Result<Self> {
        let max = self.max_value();
        self.try_map_channels(|c| c.downscale(width, height, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u32]]) -> Channel {
        Channel::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_trim_shifts_by_start() {
        let c = grid(&[&[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10]]);
        assert_eq!(c.trim(1, 4).unwrap(), grid(&[&[2, 3, 4], &[7, 8, 9]]));
        assert_eq!(c.trim(0, 5).unwrap(), c);
    }

    #[test]
    fn test_trim_rejects_bad_ranges() {
        let c = grid(&[&[1, 2, 3]]);
        assert!(c.trim(2, 2).is_err());
        assert!(c.trim(2, 1).is_err());
        assert!(c.trim(0, 4).is_err());
    }

    #[test]
    fn test_overlay_replaces_from_start() {
        let base = grid(&[&[1, 2, 3, 4], &[5, 6, 7, 8]]);
        let top = grid(&[&[10, 20, 30], &[50, 60, 70]]);
        // other is narrower: only columns 1..3 change
        assert_eq!(
            base.overlay(&top, 1).unwrap(),
            grid(&[&[1, 20, 30, 4], &[5, 60, 70, 8]])
        );
        assert_eq!(base.overlay(&top, 4).unwrap(), base);
    }

    #[test]
    fn test_overlay_errors() {
        let base = grid(&[&[1, 2], &[3, 4]]);
        assert!(matches!(
            base.overlay(&base, 3),
            Err(RastraError::InvalidArgument(_))
        ));
        let short = grid(&[&[1, 2]]);
        assert!(matches!(
            base.overlay(&short, 0),
            Err(RastraError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_downscale_halves_and_interpolates() {
        let c = grid(&[&[0, 100, 200, 300], &[0, 100, 200, 300]]);
        let small = c.downscale(2, 1, 300).unwrap();
        assert_eq!(small, grid(&[&[0, 200]]));

        let row = grid(&[&[0, 100, 200]]);
        // target x=1 maps to source 1.5 → halfway between 100 and 200
        assert_eq!(row.downscale(2, 1, 255).unwrap(), grid(&[&[0, 150]]));
    }

    #[test]
    fn test_downscale_rejects_upscale_and_zero() {
        let c = grid(&[&[1, 2], &[3, 4]]);
        assert!(c.downscale(3, 2, 255).is_err());
        assert!(c.downscale(0, 1, 255).is_err());
        assert_eq!(c.downscale(2, 2, 255).unwrap(), c);
    }

    #[test]
    fn test_image_overlay_clamps_to_own_range() {
        let low = Image::from_pixels(1, 2, &[[1, 1, 1], [2, 2, 2]], 100).unwrap();
        let high = Image::from_pixels(1, 2, &[[9, 9, 9], [250, 250, 250]], 255).unwrap();
        let mixed = low.overlay(&high, 1).unwrap();
        assert_eq!(mixed.pixel(0, 0), Ok([1, 1, 1]));
        assert_eq!(mixed.pixel(0, 1), Ok([100, 100, 100]));
        assert_eq!(mixed.max_value(), 100);
    }
}
