//! Intensity frequency tables.

use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// Number of buckets, one per 8-bit intensity level.
pub const LEVELS: usize = 256;

/// Per-level pixel counts for one channel.
///
/// Values above 255 are counted in the top bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Count how many cells of `channel` take each level.
    pub fn of(channel: &Channel) -> Self {
        let mut counts = vec![0u64; LEVELS];
        for &v in channel.values() {
            counts[(v as usize).min(LEVELS - 1)] += 1;
        }
        Self { counts }
    }

    /// Counts indexed by level, always `LEVELS` long.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn count(&self, level: u8) -> u64 {
        self.counts[usize::from(level)]
    }

    /// Largest bucket count.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Level with the highest count. Ties go to the lowest level.
    pub fn peak(&self) -> u8 {
        self.peak_in(0, (LEVELS - 1) as u8)
    }

    /// Level with the highest count within `lo..=hi`, ties to the lowest.
    ///
    /// Returns `lo` when every bucket in range is empty.
    pub fn peak_in(&self, lo: u8, hi: u8) -> u8 {
        let mut best = lo;
        for level in lo..=hi {
            if self.count(level) > self.count(best) {
                best = level;
            }
        }
        best
    }
}

impl Channel {
    /// Frequency table of this channel's values.
    pub fn frequency(&self) -> Histogram {
        Histogram::of(self)
    }

    /// The most common intensity level, lowest level on ties.
    pub fn peak_frequency_value(&self) -> u8 {
        self.frequency().peak()
    }
}
