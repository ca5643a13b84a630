use crate::packet::SampleVector;
use crate::prelude::{DepthSeries, DEPTH_SAMPLES};
use ndarray::{Array2, Axis};
use serde::Serialize;

/// Per-depth aggregate of many frames, surface first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthProfile(#[serde(serialize_with = "serialize_values")] [f64; DEPTH_SAMPLES]);

impl DepthProfile {
    pub fn new(values: [f64; DEPTH_SAMPLES]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; DEPTH_SAMPLES])
    }

    /// Builds a profile from a slice, rejecting anything that is not exactly 90 values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        values.try_into().ok().map(Self)
    }

    pub fn values(&self) -> &[f64; DEPTH_SAMPLES] {
        &self.0
    }

    pub fn get(&self, depth: usize) -> Option<f64> {
        self.0.get(depth).copied()
    }
}

impl DepthSeries for DepthProfile {
    fn depth_values(&self) -> [f64; DEPTH_SAMPLES] {
        self.0
    }
}

impl From<&SampleVector> for DepthProfile {
    fn from(frame: &SampleVector) -> Self {
        Self(frame.depth_values())
    }
}

fn serialize_values<S: serde::Serializer>(
    values: &[f64; DEPTH_SAMPLES],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter())
}

/// Stacks frames into an `(frames, depth)` matrix.
pub(crate) fn frame_matrix(frames: &[SampleVector]) -> Array2<f64> {
    Array2::from_shape_fn((frames.len(), DEPTH_SAMPLES), |(row, depth)| {
        f64::from(frames[row].samples()[depth])
    })
}

pub(crate) fn to_depth_array(values: impl IntoIterator<Item = f64>) -> [f64; DEPTH_SAMPLES] {
    let mut out = [0.0; DEPTH_SAMPLES];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value;
    }
    out
}

/// Mean of every depth index across `frames`; all zeros when `frames` is empty.
pub fn aggregate_mean(frames: &[SampleVector]) -> DepthProfile {
    match frame_matrix(frames).mean_axis(Axis(0)) {
        Some(mean) => DepthProfile(to_depth_array(mean.iter().copied())),
        None => DepthProfile::zeros(),
    }
}

/// Streaming per-depth sum, for building a mean from chunks processed apart.
///
/// Partial accumulators merge losslessly because sums stay integral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeanAccumulator {
    sums: [u64; DEPTH_SAMPLES],
    count: u64,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self {
            sums: [0; DEPTH_SAMPLES],
            count: 0,
        }
    }

    pub fn push(&mut self, frame: &SampleVector) {
        for (sum, value) in self.sums.iter_mut().zip(frame.iter()) {
            *sum += u64::from(value);
        }
        self.count += 1;
    }

    pub fn merge(&mut self, other: &MeanAccumulator) {
        for (sum, value) in self.sums.iter_mut().zip(other.sums.iter()) {
            *sum += value;
        }
        self.count += other.count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn finish(&self) -> DepthProfile {
        if self.count == 0 {
            return DepthProfile::zeros();
        }
        let count = self.count as f64;
        DepthProfile(self.sums.map(|sum| sum as f64 / count))
    }
}

impl Default for MeanAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Extend<&'a SampleVector> for MeanAccumulator {
    fn extend<I: IntoIterator<Item = &'a SampleVector>>(&mut self, frames: I) {
        for frame in frames {
            self.push(frame);
        }
    }
}
