use crate::packet::SampleVector;
use serde::Serialize;

/// Width of the reporting buckets (`0x00-0x0F`, `0x10-0x1F`, ...).
pub const BUCKET_WIDTH: usize = 16;

/// Buckets always reported, covering `0x00-0x5F`.
pub const MIN_BUCKETS: usize = 6;

/// Occurrence count of every byte value across a set of frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueHistogram {
    #[serde(skip)]
    counts: Vec<u64>,
    total: u64,
}

/// Occurrences of one observed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueShare {
    pub value: u8,
    pub count: u64,
    pub percent: f64,
}

/// One reporting bucket of a [`ValueHistogram`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub low: u8,
    pub high: u8,
    pub count: u64,
    pub percent: f64,
}

impl ValueHistogram {
    pub fn new() -> Self {
        Self {
            counts: vec![0; 256],
            total: 0,
        }
    }

    pub fn from_frames<'a>(frames: impl IntoIterator<Item = &'a SampleVector>) -> Self {
        let mut histogram = Self::new();
        for frame in frames {
            histogram.push(frame);
        }
        histogram
    }

    pub fn push(&mut self, frame: &SampleVector) {
        for value in frame.iter() {
            self.counts[value as usize] += 1;
        }
        self.total += frame.samples().len() as u64;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    pub fn min(&self) -> Option<u8> {
        self.counts.iter().position(|&c| c > 0).map(|v| v as u8)
    }

    pub fn max(&self) -> Option<u8> {
        self.counts.iter().rposition(|&c| c > 0).map(|v| v as u8)
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Non-empty `(value, count)` pairs in ascending value order.
    pub fn occupied(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(v, &c)| (v as u8, c))
    }

    /// Every observed value with its share of all samples.
    pub fn shares(&self) -> Vec<ValueShare> {
        self.occupied()
            .map(|(value, count)| ValueShare {
                value,
                count,
                percent: self.percent_of(count),
            })
            .collect()
    }

    fn percent_of(&self, count: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }

    /// The first [`MIN_BUCKETS`] buckets, extended to reach the largest observed value.
    pub fn buckets(&self) -> Vec<HistogramBucket> {
        let last = self
            .max()
            .map_or(MIN_BUCKETS - 1, |max| (max as usize / BUCKET_WIDTH).max(MIN_BUCKETS - 1));
        (0..=last)
            .map(|bucket| {
                let low = bucket * BUCKET_WIDTH;
                let high = low + BUCKET_WIDTH - 1;
                let count: u64 = self.counts[low..=high].iter().sum();
                HistogramBucket {
                    low: low as u8,
                    high: high as u8,
                    count,
                    percent: self.percent_of(count),
                }
            })
            .collect()
    }
}

impl Default for ValueHistogram {
    fn default() -> Self {
        Self::new()
    }
}
