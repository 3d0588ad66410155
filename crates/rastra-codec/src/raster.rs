//! General raster formats (PNG, JPEG, BMP, TIFF) via the `image` crate.
//!
//! Decoding always yields 8-bit RGB with max value 255. Encoding rescales
//! each value from `[0, max]` to `[0, 255]`.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use rastra_core::Image;

use crate::error::CodecError;

/// Max value of every decoded raster image.
pub const RASTER_MAX: u32 = 255;

pub fn decode(path: &Path) -> Result<Image, CodecError> {
    let img = image::open(path).map_err(CodecError::Decode)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels: Vec<[u32; 3]> = rgb
        .pixels()
        .map(|p| [p.0[0].into(), p.0[1].into(), p.0[2].into()])
        .collect();
    Ok(Image::from_pixels(
        height as usize,
        width as usize,
        &pixels,
        RASTER_MAX,
    )?)
}

pub fn encode(path: &Path, image: &Image, format: ImageFormat) -> Result<(), CodecError> {
    to_rgb8(image)
        .save_with_format(path, format)
        .map_err(CodecError::Encode)
}

/// Rescale to 8 bits per channel.
pub fn to_rgb8(image: &Image) -> RgbImage {
    let max = image.max_value();
    let scale = |v: u32| -> u8 {
        if max == 0 {
            return 0;
        }
        (f64::from(v) * 255.0 / f64::from(max)).round().clamp(0.0, 255.0) as u8
    };
    let [r, g, b] = image.channels();
    RgbImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let at = |c: &rastra_core::Channel| c.values()[y * image.width() + x];
        Rgb([scale(at(r)), scale(at(g)), scale(at(b))])
    })
}
