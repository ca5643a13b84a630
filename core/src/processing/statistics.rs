use crate::math::StatsHelper;
use crate::packet::SampleVector;
use crate::prelude::DEPTH_SAMPLES;
use crate::processing::aggregate::{frame_matrix, to_depth_array, DepthProfile};
use ndarray::Axis;
use serde::Serialize;
use std::ops::Range;

/// Sample level above which a return counts as significant.
pub const DEFAULT_SIGNIFICANT_LEVEL: u8 = 16;

/// Summary of one depth index across a set of frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthStat {
    pub depth: usize,
    pub mean: f64,
    pub median: f64,
    pub min: u8,
    pub max: u8,
    pub non_zero_pct: f64,
    pub significant_pct: f64,
}

/// Named, inclusive range of depth indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepthBand {
    pub name: &'static str,
    pub first: usize,
    pub last: usize,
}

/// Water-column bands reported by value distribution, surface first.
pub const DEPTH_BANDS: [DepthBand; 5] = [
    DepthBand { name: "Surface", first: 0, last: 15 },
    DepthBand { name: "Upper", first: 16, last: 30 },
    DepthBand { name: "Middle", first: 31, last: 60 },
    DepthBand { name: "Lower", first: 61, last: 75 },
    DepthBand { name: "Bottom", first: 76, last: 89 },
];

/// Most frequent values kept per band.
pub const BAND_TOP_VALUES: usize = 10;

/// Value distribution of every sample inside one [`DepthBand`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSummary {
    pub band: DepthBand,
    pub mean: f64,
    pub median: f64,
    /// `(value, count)` by descending count; ties keep first-seen order.
    pub top_values: Vec<(u8, u64)>,
}

/// Per-depth summary statistics used by reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthStatistics {
    pub frame_count: usize,
    pub significant_level: u8,
    pub depths: Vec<DepthStat>,
    pub bands: Vec<BandSummary>,
}

impl DepthStatistics {
    /// Summarizes `frames`; an empty set yields all-zero rows.
    pub fn from_frames(frames: &[SampleVector], significant_level: u8) -> Self {
        let matrix = frame_matrix(frames);
        let level = f64::from(significant_level);
        let depths = matrix
            .axis_iter(Axis(1))
            .enumerate()
            .map(|(depth, column)| {
                let values = column.to_vec();
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                DepthStat {
                    depth,
                    mean: StatsHelper::mean(&values),
                    median: StatsHelper::median(&values),
                    min: if values.is_empty() { 0 } else { min as u8 },
                    max: if values.is_empty() { 0 } else { max as u8 },
                    non_zero_pct: StatsHelper::percent_where(&values, |v| v > 0.0),
                    significant_pct: StatsHelper::percent_where(&values, |v| v > level),
                }
            })
            .collect();
        let bands = DEPTH_BANDS
            .iter()
            .map(|&band| summarize_band(frames, band))
            .collect();

        Self {
            frame_count: frames.len(),
            significant_level,
            depths,
            bands,
        }
    }

    pub fn mean_profile(&self) -> DepthProfile {
        DepthProfile::new(to_depth_array(self.depths.iter().map(|d| d.mean)))
    }

    /// Depth with the highest mean inside `band`; the shallowest wins ties.
    ///
    /// Typically used to locate a lure suspended mid-column.
    pub fn strongest_in(&self, band: Range<usize>) -> Option<&DepthStat> {
        let band = band.start.min(DEPTH_SAMPLES)..band.end.min(DEPTH_SAMPLES);
        self.depths
            .get(band)?
            .iter()
            .fold(None, |best: Option<&DepthStat>, stat| match best {
                Some(b) if b.mean >= stat.mean => Some(b),
                _ => Some(stat),
            })
    }

    /// Shallowest depth whose mean exceeds `level`.
    pub fn first_mean_above(&self, level: f64) -> Option<&DepthStat> {
        self.depths.iter().find(|stat| stat.mean > level)
    }
}

/// Samples are visited depth by depth, frames in order within a depth.
fn summarize_band(frames: &[SampleVector], band: DepthBand) -> BandSummary {
    let mut values = Vec::with_capacity(frames.len() * (band.last + 1 - band.first));
    let mut slots = [None::<usize>; 256];
    let mut counts: Vec<(u8, u64)> = Vec::new();

    for depth in band.first..=band.last {
        for frame in frames {
            let value = frame.samples()[depth];
            values.push(f64::from(value));
            match slots[value as usize] {
                Some(slot) => counts[slot].1 += 1,
                None => {
                    slots[value as usize] = Some(counts.len());
                    counts.push((value, 1));
                }
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(BAND_TOP_VALUES);

    BandSummary {
        band,
        mean: StatsHelper::mean(&values),
        median: StatsHelper::median(&values),
        top_values: counts,
    }
}
