//! File codecs for Rastra images.
//!
//! This crate turns files into [`rastra_core::Image`] values and back. The
//! format is chosen from the file extension: `.ppm` uses the plain-text
//! `P3` codec, everything else goes through the `image` crate.

mod error;
pub mod ppm;
pub mod raster;

use std::fs;
use std::path::Path;

use image::ImageFormat;
use rastra_core::Image;

pub use error::CodecError;

/// On-disk encoding selected from a path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Plain-text `P3` PPM.
    Ppm,
    /// Any format the `image` crate handles.
    Raster(ImageFormat),
}

impl FileFormat {
    /// Pick the format for `path` by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if ext == "ppm" {
            return Ok(Self::Ppm);
        }
        ImageFormat::from_extension(&ext)
            .map(Self::Raster)
            .ok_or(CodecError::UnsupportedFormat(ext))
    }
}

/// Read an image from disk.
pub fn load(path: &Path) -> Result<Image, CodecError> {
    let format = FileFormat::from_path(path)?;
    let image = match format {
        FileFormat::Ppm => ppm::decode(&fs::read_to_string(path)?)?,
        FileFormat::Raster(_) => raster::decode(path)?,
    };
    tracing::info!(
        "loaded {} ({}x{}, max {})",
        path.display(),
        image.width(),
        image.height(),
        image.max_value()
    );
    Ok(image)
}

/// Write an image to disk.
pub fn save(path: &Path, image: &Image) -> Result<(), CodecError> {
    match FileFormat::from_path(path)? {
        FileFormat::Ppm => fs::write(path, ppm::encode(image))?,
        FileFormat::Raster(format) => raster::encode(path, image, format)?,
    }
    tracing::info!("saved {}", path.display());
    Ok(())
}
