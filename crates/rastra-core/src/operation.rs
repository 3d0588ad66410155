//! The closed set of single-image transforms.
//!
//! Each variant carries its own parameters; whether it can be previewed is a
//! property of the variant rather than of a wrapper type.

use serde::{Deserialize, Serialize};

use crate::error::{RastraError, Result};
use crate::image::{ComponentKind, Image};
use crate::preview::split_preview;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    FlipVertical,
    FlipHorizontal,
    Brighten(i64),
    Darken(i64),
    Blur,
    Sharpen,
    Sepia,
    Component(ComponentKind),
    /// 256×256 line graph of the channel histograms.
    Histogram,
    ColorCorrect,
    LevelsAdjust { black: i64, mid: i64, white: i64 },
    /// Percentage of Haar coefficients to keep.
    Compress(f64),
    Trim { start: usize, end: usize },
    Downscale { width: usize, height: usize },
}

impl Operation {
    /// Short human-readable name, used in error messages and logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FlipVertical => "vertical flip",
            Self::FlipHorizontal => "horizontal flip",
            Self::Brighten(_) => "brighten",
            Self::Darken(_) => "darken",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::Sepia => "sepia",
            Self::Component(_) => "component extraction",
            Self::Histogram => "histogram",
            Self::ColorCorrect => "color correction",
            Self::LevelsAdjust { .. } => "levels adjustment",
            Self::Compress(_) => "compression",
            Self::Trim { .. } => "trim",
            Self::Downscale { .. } => "downscale",
        }
    }

    /// Whether the result keeps the input's shape, so a split preview can
    /// stitch it against the original.
    pub const fn supports_preview(&self) -> bool {
        !matches!(
            self,
            Self::Histogram | Self::Trim { .. } | Self::Downscale { .. }
        )
    }

    /// Run the transform over the whole image.
    pub fn apply(&self, image: &Image) -> Result<Image> {
        Ok(match *self {
            Self::FlipVertical => image.flip_vertical(),
            Self::FlipHorizontal => image.flip_horizontal(),
            Self::Brighten(amount) => image.brighten(amount),
            Self::Darken(amount) => image.darken(amount),
            Self::Blur => image.blur(),
            Self::Sharpen => image.sharpen(),
            Self::Sepia => image.sepia(),
            Self::Component(kind) => image.component(kind),
            Self::Histogram => image.histogram_view(),
            Self::ColorCorrect => image.color_correct(),
            Self::LevelsAdjust { black, mid, white } => image.levels_adjust(black, mid, white)?,
            Self::Compress(ratio) => image.compress(ratio)?,
            Self::Trim { start, end } => image.trim(start, end)?,
            Self::Downscale { width, height } => image.downscale(width, height)?,
        })
    }

    /// Run the transform, optionally limited to the left `split` percent of
    /// the width.
    pub fn apply_with_preview(&self, image: &Image, split: Option<f64>) -> Result<Image> {
        let Some(percent) = split else {
            return self.apply(image);
        };
        if !self.supports_preview() {
            return Err(RastraError::UnsupportedOperation(self.label()));
        }
        let transformed = self.apply(image)?;
        split_preview(image, &transformed, percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Channel;

    fn sample() -> Image {
        let c = Channel::from_rows(vec![vec![10, 20, 30, 40], vec![50, 60, 70, 80]]).unwrap();
        Image::new(c.clone(), c.clone(), c, 255).unwrap()
    }

    #[test]
    fn test_apply_matches_direct_calls() {
        let img = sample();
        assert_eq!(Operation::Blur.apply(&img).unwrap(), img.blur());
        assert_eq!(Operation::Darken(5).apply(&img).unwrap(), img.darken(5));
        assert_eq!(
            Operation::Component(ComponentKind::Luma).apply(&img).unwrap(),
            img.component(ComponentKind::Luma)
        );
    }

    #[test]
    fn test_preview_on_histogram_is_unsupported() {
        let err = Operation::Histogram
            .apply_with_preview(&sample(), Some(50.0))
            .unwrap_err();
        assert_eq!(err, RastraError::UnsupportedOperation("histogram"));
    }

    #[test]
    fn test_no_split_means_full_width() {
        let img = sample();
        assert_eq!(
            Operation::Sepia.apply_with_preview(&img, None).unwrap(),
            img.sepia()
        );
        // Shape-changing ops still work without a split.
        let trimmed = Operation::Trim { start: 1, end: 3 }
            .apply_with_preview(&img, None)
            .unwrap();
        assert_eq!(trimmed.width(), 2);
    }

    #[test]
    fn test_preview_halves() {
        let img = sample();
        let out = Operation::Brighten(100)
            .apply_with_preview(&img, Some(50.0))
            .unwrap();
        assert_eq!(out.green().rows(), vec![vec![110, 120, 30, 40], vec![150, 160, 70, 80]]);
    }

    #[test]
    fn test_preview_rejects_bad_percent() {
        let err = Operation::Blur
            .apply_with_preview(&sample(), Some(0.0))
            .unwrap_err();
        assert!(matches!(err, RastraError::InvalidArgument(_)));
    }

    #[test]
    fn test_parameter_errors_surface() {
        let err = Operation::LevelsAdjust { black: 100, mid: 50, white: 200 }
            .apply(&sample())
            .unwrap_err();
        assert!(matches!(err, RastraError::InvalidArgument(_)));
    }
}
