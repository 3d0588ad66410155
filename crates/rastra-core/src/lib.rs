//! Rastra Core — immutable raster transforms.
//!
//! This crate contains the channel grid, convolution, RGB composition,
//! split preview, and the histogram, level, compression, and compositing
//! operations built on them. No file formats or command parsing live here.

pub mod advanced;
pub mod channel;
pub mod error;
pub mod image;
pub mod kernel;
pub mod operation;
pub mod preview;

// Re-exports for convenience.
pub use advanced::{Histogram, LevelCurve};
pub use channel::Channel;
pub use error::{RastraError, Result};
pub use image::{ComponentKind, Image};
pub use kernel::Kernel;
pub use operation::Operation;
pub use preview::{split_boundary, split_preview};
