//! Analysis and adjustment operations built on top of the basic channel
//! contract: histograms, level curves, Haar compression, trimming, overlay,
//! colour correction, and histogram rendering.

pub mod compress;
pub mod correct;
pub mod histogram;
pub mod levels;
pub mod region;
pub mod view;

pub use histogram::{Histogram, LEVELS};
pub use levels::LevelCurve;
