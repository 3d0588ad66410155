//! RGB image composed of three same-shaped channels.

use std::fmt;

use glam::{DMat3, DVec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, clamp_f64};
use crate::error::{RastraError, Result};
use crate::kernel::Kernel;

/// Rec. 709 luma weights.
const LUMA_REC709: DVec3 = DVec3::new(0.2126, 0.7152, 0.0722);

/// Sepia tone matrix, stored column-major so `SEPIA * rgb` mixes each row.
const SEPIA: DMat3 = DMat3::from_cols(
    DVec3::new(0.393, 0.349, 0.272),
    DVec3::new(0.769, 0.686, 0.534),
    DVec3::new(0.189, 0.168, 0.131),
);

/// Which greyscale visualization [`Image::component`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Red,
    Green,
    Blue,
    /// Per-pixel maximum of the three channels.
    Value,
    /// Truncating mean of the three channels.
    Intensity,
    /// Rec. 709 weighted sum, rounded.
    Luma,
}

impl ComponentKind {
    pub fn all() -> &'static [Self] {
        const ALL: [ComponentKind; 6] = [
            ComponentKind::Red,
            ComponentKind::Green,
            ComponentKind::Blue,
            ComponentKind::Value,
            ComponentKind::Intensity,
            ComponentKind::Luma,
        ];
        &ALL
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
            Self::Value => write!(f, "value"),
            Self::Intensity => write!(f, "intensity"),
            Self::Luma => write!(f, "luma"),
        }
    }
}

/// Three equally-shaped channels plus the shared maximum intensity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ImageParts")]
pub struct Image {
    red: Channel,
    green: Channel,
    blue: Channel,
    max_value: u32,
}

#[derive(Deserialize)]
struct ImageParts {
    red: Channel,
    green: Channel,
    blue: Channel,
    max_value: u32,
}

impl TryFrom<ImageParts> for Image {
    type Error = RastraError;

    fn try_from(parts: ImageParts) -> Result<Self> {
        Self::new(parts.red, parts.green, parts.blue, parts.max_value)
    }
}

impl Image {
    /// Assemble an image, checking that all channels agree in shape and stay
    /// within `max_value`.
    pub fn new(red: Channel, green: Channel, blue: Channel, max_value: u32) -> Result<Self> {
        check_same_shape(&red, &green, &blue)?;
        for (name, ch) in [("red", &red), ("green", &green), ("blue", &blue)] {
            let peak = ch.max();
            if peak > max_value {
                return Err(RastraError::invalid(format!(
                    "{name} channel holds {peak}, above max value {max_value}"
                )));
            }
        }
        Ok(Self {
            red,
            green,
            blue,
            max_value,
        })
    }

    /// Build a `height × width` image from row-major `[r, g, b]` pixels.
    pub fn from_pixels(
        height: usize,
        width: usize,
        pixels: &[[u32; 3]],
        max_value: u32,
    ) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(RastraError::invalid(format!(
                "expected {} pixels for a {height}x{width} image, got {}",
                width * height,
                pixels.len()
            )));
        }
        let [r, g, b] = split_pixels(pixels);
        Self::new(
            Channel::from_parts(height, width, r),
            Channel::from_parts(height, width, g),
            Channel::from_parts(height, width, b),
            max_value,
        )
    }

    /// Internal constructor for transform outputs that are known to satisfy
    /// the shape and range invariants.
    pub(crate) fn from_channels(red: Channel, green: Channel, blue: Channel, max_value: u32) -> Self {
        debug_assert!(check_same_shape(&red, &green, &blue).is_ok());
        Self {
            red,
            green,
            blue,
            max_value,
        }
    }

    pub fn red(&self) -> &Channel {
        &self.red
    }

    pub fn green(&self) -> &Channel {
        &self.green
    }

    pub fn blue(&self) -> &Channel {
        &self.blue
    }

    pub fn channels(&self) -> [&Channel; 3] {
        [&self.red, &self.green, &self.blue]
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    /// `[r, g, b]` at row `y`, column `x`.
    pub fn pixel(&self, y: usize, x: usize) -> Result<[u32; 3]> {
        Ok([self.red.get(y, x)?, self.green.get(y, x)?, self.blue.get(y, x)?])
    }

    /// Apply the same channel transform to all three channels.
    pub(crate) fn map_channels(&self, f: impl Fn(&Channel) -> Channel) -> Self {
        Self::from_channels(f(&self.red), f(&self.green), f(&self.blue), self.max_value)
    }

    /// Same as [`map_channels`](Self::map_channels) for fallible transforms.
    pub(crate) fn try_map_channels(&self, f: impl Fn(&Channel) -> Result<Channel>) -> Result<Self> {
        Ok(Self::from_channels(
            f(&self.red)?,
            f(&self.green)?,
            f(&self.blue)?,
            self.max_value,
        ))
    }

    /// Apply a per-pixel colour transform. Rows are processed in parallel.
    pub(crate) fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn([u32; 3]) -> [u32; 3] + Sync + Send,
    {
        let (r, g, b) = (self.red.values(), self.green.values(), self.blue.values());
        let mixed: Vec<[u32; 3]> = (0..r.len())
            .into_par_iter()
            .map(|i| f([r[i], g[i], b[i]]))
            .collect();
        let [red, green, blue] = split_pixels(&mixed);
        let (h, w) = (self.height(), self.width());
        Self::from_channels(
            Channel::from_parts(h, w, red),
            Channel::from_parts(h, w, green),
            Channel::from_parts(h, w, blue),
            self.max_value,
        )
    }

    /// Greyscale visualization of one component: all three output channels
    /// hold the same values.
    pub fn component(&self, kind: ComponentKind) -> Self {
        let grey = match kind {
            ComponentKind::Red => self.red.clone(),
            ComponentKind::Green => self.green.clone(),
            ComponentKind::Blue => self.blue.clone(),
            ComponentKind::Value => self.map_pixels(|[r, g, b]| [r.max(g).max(b); 3]).red,
            ComponentKind::Intensity => {
                self.map_pixels(|[r, g, b]| {
                    let mean = (u64::from(r) + u64::from(g) + u64::from(b)) / 3;
                    [mean as u32; 3]
                })
                .red
            }
            ComponentKind::Luma => {
                let max = self.max_value;
                self.map_pixels(|px| [clamp_f64(LUMA_REC709.dot(to_dvec(px)), max); 3])
                    .red
            }
        };
        Self::from_channels(grey.clone(), grey.clone(), grey, self.max_value)
    }

    pub fn flip_vertical(&self) -> Self {
        self.map_channels(Channel::flip_vertical)
    }

    pub fn flip_horizontal(&self) -> Self {
        self.map_channels(Channel::flip_horizontal)
    }

    /// Add `amount` to every channel value, clamped.
    pub fn brighten(&self, amount: i64) -> Self {
        let max = self.max_value;
        self.map_channels(|c| c.shift(amount, max))
    }

    /// Subtract `amount` from every channel value, clamped.
    pub fn darken(&self, amount: i64) -> Self {
        self.brighten(amount.saturating_neg())
    }

    /// Convolve every channel with `kernel`.
    pub fn convolve(&self, kernel: &Kernel) -> Self {
        let max = self.max_value;
        self.map_channels(|c| c.convolve(kernel, max))
    }

    /// 3×3 Gaussian blur.
    pub fn blur(&self) -> Self {
        self.convolve(&Kernel::gaussian_blur())
    }

    /// 5×5 unsharp mask.
    pub fn sharpen(&self) -> Self {
        self.convolve(&Kernel::sharpen())
    }

    /// Classic sepia tone.
    pub fn sepia(&self) -> Self {
        let max = self.max_value;
        self.map_pixels(|px| {
            let out = SEPIA * to_dvec(px);
            [clamp_f64(out.x, max), clamp_f64(out.y, max), clamp_f64(out.z, max)]
        })
    }

    /// Split into one greyscale image per channel: `[red, green, blue]`.
    pub fn rgb_split(&self) -> [Self; 3] {
        [
            self.component(ComponentKind::Red),
            self.component(ComponentKind::Green),
            self.component(ComponentKind::Blue),
        ]
    }

    /// Combine the red channel of `red`, the green channel of `green` and the
    /// blue channel of `blue` into one image.
    ///
    /// The result's max value is the largest of the three inputs'.
    pub fn rgb_combine(red: &Self, green: &Self, blue: &Self) -> Result<Self> {
        check_same_shape(&red.red, &green.green, &blue.blue)?;
        let max_value = red.max_value.max(green.max_value).max(blue.max_value);
        Ok(Self::from_channels(
            red.red.clone(),
            green.green.clone(),
            blue.blue.clone(),
            max_value,
        ))
    }
}

fn to_dvec([r, g, b]: [u32; 3]) -> DVec3 {
    DVec3::new(f64::from(r), f64::from(g), f64::from(b))
}

fn split_pixels(pixels: &[[u32; 3]]) -> [Vec<u32>; 3] {
    let mut out = [
        Vec::with_capacity(pixels.len()),
        Vec::with_capacity(pixels.len()),
        Vec::with_capacity(pixels.len()),
    ];
    for px in pixels {
        for (buf, v) in out.iter_mut().zip(px) {
            buf.push(*v);
        }
    }
    out
}

fn check_same_shape(red: &Channel, green: &Channel, blue: &Channel) -> Result<()> {
    let shape = |c: &Channel| (c.height(), c.width());
    if shape(red) != shape(green) || shape(red) != shape(blue) {
        return Err(RastraError::mismatch(format!(
            "channels are {}x{}, {}x{} and {}x{}",
            red.height(),
            red.width(),
            green.height(),
            green.width(),
            blue.height(),
            blue.width()
        )));
    }
    Ok(())
}
