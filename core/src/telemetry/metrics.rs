use crate::prelude::RejectKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Thread-safe ingest counters shared between capture readers.
pub struct MetricsRecorder {
    inner: Mutex<IngestCounts>,
}

/// Point-in-time copy of the recorder's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestCounts {
    pub frames: usize,
    pub rejected: BTreeMap<RejectKind, usize>,
}

impl IngestCounts {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    /// Rejections other than outbound traffic, which is expected in every capture.
    pub fn malformed_total(&self) -> usize {
        self.rejected
            .iter()
            .filter(|(kind, _)| **kind != RejectKind::Outbound)
            .map(|(_, count)| count)
            .sum()
    }

    pub fn merge(&mut self, other: &IngestCounts) {
        self.frames += other.frames;
        for (kind, count) in &other.rejected {
            *self.rejected.entry(*kind).or_insert(0) += count;
        }
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(IngestCounts::default()),
        }
    }

    pub fn record_frame(&self) {
        if let Ok(mut counts) = self.inner.lock() {
            counts.frames += 1;
        }
    }

    pub fn record_rejected(&self, kind: RejectKind) {
        if let Ok(mut counts) = self.inner.lock() {
            *counts.rejected.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn snapshot(&self) -> IngestCounts {
        if let Ok(counts) = self.inner.lock() {
            counts.clone()
        } else {
            IngestCounts::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_rejections_by_kind() {
        let metrics = MetricsRecorder::new();
        metrics.record_frame();
        metrics.record_frame();
        metrics.record_rejected(RejectKind::Outbound);
        metrics.record_rejected(RejectKind::InvalidHex);
        metrics.record_rejected(RejectKind::InvalidHex);

        let counts = metrics.snapshot();
        assert_eq!(counts.frames, 2);
        assert_eq!(counts.rejected_total(), 3);
        assert_eq!(counts.malformed_total(), 2);
        assert_eq!(counts.rejected[&RejectKind::InvalidHex], 2);

        let mut total = IngestCounts::default();
        total.merge(&counts);
        total.merge(&counts);
        assert_eq!(total.frames, 4);
        assert_eq!(total.rejected[&RejectKind::Outbound], 2);
    }

    #[test]
    fn recorder_is_shareable_across_threads() {
        let metrics = MetricsRecorder::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| metrics.record_frame());
            }
        });
        assert_eq!(metrics.snapshot().frames, 4);
    }
}
