use anyhow::Context;
use serde::{Deserialize, Serialize};
use sonarcore::processing::DEFAULT_SIGNIFICANT_LEVEL;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Reporting knobs for an analysis run. Detection constants are not configurable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Drop the first line of every capture as a column header.
    pub skip_header: bool,
    /// Samples above this count as significant in depth statistics.
    pub significant_level: u8,
    /// First depth searched for a suspended lure.
    pub lure_band_start: usize,
    /// Depth after the last one searched for a suspended lure.
    pub lure_band_end: usize,
    /// Mean level a depth must exceed to be reported as the bottom candidate.
    pub bottom_candidate_level: f64,
    /// Emit a section per capture file in addition to the combined one.
    pub per_file: bool,
    /// Include the sample value histogram.
    pub histogram: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            skip_header: true,
            significant_level: DEFAULT_SIGNIFICANT_LEVEL,
            lure_band_start: 20,
            lure_band_end: 70,
            bottom_candidate_level: 50.0,
            per_file: true,
            histogram: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading analyzer config {}", path_ref.display()))?;
        let config: AnalyzerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing analyzer config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lure_band_start >= self.lure_band_end {
            anyhow::bail!(
                "lure band {}..{} is empty",
                self.lure_band_start,
                self.lure_band_end
            );
        }
        Ok(())
    }

    pub fn lure_band(&self) -> Range<usize> {
        self.lure_band_start..self.lure_band_end
    }
}
