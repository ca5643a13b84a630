use crate::report::model::{AnalysisReport, HistogramSummary, SectionReport};
use crate::workflow::config::AnalyzerConfig;
use anyhow::Context;
use log::{info, warn};
use sonarcore::math::ValueHistogram;
use sonarcore::packet::{read_capture_file, CaptureReader, SampleVector};
use sonarcore::processing::{aggregate_mean, classify_zones, detect, DepthStatistics};
use sonarcore::telemetry::{IngestCounts, MetricsRecorder};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Frames read from one capture plus what was skipped on the way.
pub struct CaptureFrames {
    pub name: String,
    pub frames: Vec<SampleVector>,
    pub ingest: IngestCounts,
}

#[derive(Clone)]
pub struct Runner {
    config: AnalyzerConfig,
}

impl Runner {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn read_capture<R: BufRead>(&self, name: &str, reader: R) -> anyhow::Result<CaptureFrames> {
        let metrics = MetricsRecorder::new();
        let frames = CaptureReader::new(reader, name)
            .with_header(self.config.skip_header)
            .with_metrics(&metrics)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("reading capture {}", name))?;

        let ingest = metrics.snapshot();
        if frames.is_empty() {
            warn!("{}: no valid packets", name);
        } else {
            info!(
                "{}: {} packets, {} records skipped",
                name,
                frames.len(),
                ingest.rejected_total()
            );
        }
        Ok(CaptureFrames {
            name: name.to_string(),
            frames,
            ingest,
        })
    }

    pub fn read_file(&self, path: &Path) -> anyhow::Result<CaptureFrames> {
        let metrics = MetricsRecorder::new();
        let frames = read_capture_file(path, self.config.skip_header, Some(&metrics))
            .with_context(|| format!("reading capture {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(CaptureFrames {
            name,
            frames,
            ingest: metrics.snapshot(),
        })
    }

    /// Analyzes each capture and all of them combined.
    pub fn execute(&self, captures: &[CaptureFrames]) -> AnalysisReport {
        let mut all_frames = Vec::new();
        let mut all_ingest = IngestCounts::default();
        for capture in captures {
            all_frames.extend_from_slice(&capture.frames);
            all_ingest.merge(&capture.ingest);
        }

        let combined_name = match captures {
            [single] => single.name.clone(),
            _ => format!("combined ({} captures)", captures.len()),
        };
        let combined = self.section(combined_name, &all_frames, all_ingest);

        let files = if self.config.per_file && captures.len() > 1 {
            captures
                .iter()
                .map(|c| self.section(c.name.clone(), &c.frames, c.ingest.clone()))
                .collect()
        } else {
            Vec::new()
        };

        AnalysisReport { combined, files }
    }

    pub fn execute_files(&self, paths: &[PathBuf]) -> anyhow::Result<AnalysisReport> {
        let captures = paths
            .iter()
            .map(|path| self.read_file(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(self.execute(&captures))
    }

    fn section(&self, name: String, frames: &[SampleVector], ingest: IngestCounts) -> SectionReport {
        let profile = aggregate_mean(frames);
        let reflection = detect(&profile);
        let statistics = DepthStatistics::from_frames(frames, self.config.significant_level);
        let lure_candidate = statistics.strongest_in(self.config.lure_band()).copied();
        let bottom_candidate = statistics
            .first_mean_above(self.config.bottom_candidate_level)
            .copied();
        let histogram = self
            .config
            .histogram
            .then(|| HistogramSummary::from(&ValueHistogram::from_frames(frames)));

        SectionReport {
            name,
            ingest,
            profile,
            reflection,
            search_window: reflection.search_window(),
            zones: classify_zones(&reflection).to_vec(),
            statistics,
            lure_candidate,
            bottom_candidate,
            histogram,
        }
    }
}

/// Expands directories into their `*.csv` files, sorted by name.
pub fn resolve_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = std::fs::read_dir(input)
                .with_context(|| format!("listing capture directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
                })
                .collect::<Vec<_>>();
            found.sort();
            if found.is_empty() {
                warn!("no CSV captures in {}", input.display());
            }
            resolved.extend(found);
        } else {
            resolved.push(input.clone());
        }
    }
    Ok(resolved)
}
