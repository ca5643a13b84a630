use serde::Serialize;
use sonarcore::math::{HistogramBucket, ValueHistogram, ValueShare};
use sonarcore::processing::{
    DepthProfile, DepthStat, DepthStatistics, DepthZone, ReflectionResult, SearchWindow,
};
use sonarcore::telemetry::IngestCounts;

/// Analysis of one capture, or of several captures combined.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub name: String,
    pub ingest: IngestCounts,
    pub profile: DepthProfile,
    pub reflection: ReflectionResult,
    pub search_window: Option<SearchWindow>,
    pub zones: Vec<DepthZone>,
    pub statistics: DepthStatistics,
    pub lure_candidate: Option<DepthStat>,
    pub bottom_candidate: Option<DepthStat>,
    pub histogram: Option<HistogramSummary>,
}

impl SectionReport {
    pub fn frame_count(&self) -> usize {
        self.ingest.frames
    }

    pub fn hidden_depths(&self) -> usize {
        self.zones.iter().filter(|zone| zone.is_hidden()).count()
    }
}

/// Serializable digest of a [`ValueHistogram`].
#[derive(Debug, Clone, Serialize)]
pub struct HistogramSummary {
    pub total: u64,
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub distinct: usize,
    pub buckets: Vec<HistogramBucket>,
    /// Every occupied value, ascending.
    pub values: Vec<ValueShare>,
}

impl From<&ValueHistogram> for HistogramSummary {
    fn from(histogram: &ValueHistogram) -> Self {
        Self {
            total: histogram.total(),
            min: histogram.min(),
            max: histogram.max(),
            distinct: histogram.distinct(),
            buckets: histogram.buckets(),
            values: histogram.shares(),
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub combined: SectionReport,
    pub files: Vec<SectionReport>,
}
