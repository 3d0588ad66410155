use rastra_core::RastraError;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("malformed PPM at line {line}: {reason}")]
    Ppm { line: usize, reason: String },
    #[error("unsupported file format: {0:?}")]
    UnsupportedFormat(String),
    #[error("decoded data is not a valid image: {0}")]
    Image(#[from] RastraError),
}
