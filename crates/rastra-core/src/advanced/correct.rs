//! Colour correction by aligning histogram peaks.

use crate::image::Image;

/// Peaks outside this range are usually clipped blacks or whites and are
/// ignored when aligning channels.
const MEANINGFUL_LO: u8 = 10;
const MEANINGFUL_HI: u8 = 245;

impl Image {
    /// Shift each channel so its histogram peak (within `[10, 245]`) lands on
    /// the average of the three channel peaks.
    pub fn color_correct(&self) -> Self {
        let peaks = self
            .channels()
            .map(|c| c.frequency().peak_in(MEANINGFUL_LO, MEANINGFUL_HI));
        let average = peaks.iter().map(|&p| f64::from(p)).sum::<f64>() / 3.0;
        let [r, g, b] = self.channels();
        let max = self.max_value();
        let offset = |peak: u8| (average - f64::from(peak)).round() as i64;
        Self::from_channels(
            r.shift(offset(peaks[0]), max),
            g.shift(offset(peaks[1]), max),
            b.shift(offset(peaks[2]), max),
            max,
        )
    }
}
