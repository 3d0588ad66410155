//! Split preview: show a transform on the left part of the image only.

use crate::error::{RastraError, Result};
use crate::image::Image;

/// Column where the transformed region ends for a given split percentage.
///
/// `percent` must lie in `(0, 100]`.
pub fn split_boundary(width: usize, percent: f64) -> Result<usize> {
    if !(percent > 0.0 && percent <= 100.0) {
        return Err(RastraError::invalid(format!(
            "split percentage must be in (0, 100], got {percent}"
        )));
    }
    Ok(((width as f64) * percent / 100.0).floor() as usize)
}

/// Keep `transformed` in columns `[0, boundary)` and `original` from the
/// boundary onward, channel by channel.
///
/// Both images must have the same shape.
pub fn split_preview(original: &Image, transformed: &Image, percent: f64) -> Result<Image> {
    let boundary = split_boundary(original.width(), percent)?;
    if (original.height(), original.width()) != (transformed.height(), transformed.width()) {
        return Err(RastraError::mismatch(format!(
            "preview needs equal shapes, got {}x{} and {}x{}",
            original.height(),
            original.width(),
            transformed.height(),
            transformed.width()
        )));
    }
    transformed.overlay(original, boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Channel;

    fn ramp_image() -> Image {
        let c = Channel::from_rows(vec![vec![10, 20, 30, 40], vec![50, 60, 70, 80]]).unwrap();
        Image::new(c.clone(), c.clone(), c, 255).unwrap()
    }

    #[test]
    fn test_boundary_floors() {
        assert_eq!(split_boundary(4, 50.0), Ok(2));
        assert_eq!(split_boundary(5, 50.0), Ok(2));
        assert_eq!(split_boundary(5, 100.0), Ok(5));
        assert_eq!(split_boundary(3, 10.0), Ok(0));
    }

    #[test]
    fn test_boundary_rejects_out_of_range() {
        for bad in [0.0, -5.0, 100.5, f64::NAN] {
            assert!(matches!(
                split_boundary(4, bad),
                Err(RastraError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_half_preview_keeps_right_half_original() {
        let original = ramp_image();
        let transformed = original.brighten(100);
        let preview = split_preview(&original, &transformed, 50.0).unwrap();
        assert_eq!(
            preview.red().rows(),
            vec![vec![110, 120, 30, 40], vec![150, 160, 70, 80]]
        );
        assert_eq!(preview.max_value(), 255);
    }

    #[test]
    fn test_full_preview_is_the_transform() {
        let original = ramp_image();
        let transformed = original.flip_horizontal();
        assert_eq!(split_preview(&original, &transformed, 100.0).unwrap(), transformed);
    }

    #[test]
    fn test_preview_rejects_shape_change() {
        let original = ramp_image();
        let trimmed = original.trim(0, 2).unwrap();
        assert!(matches!(
            split_preview(&original, &trimmed, 50.0),
            Err(RastraError::DimensionMismatch(_))
        ));
    }
}
