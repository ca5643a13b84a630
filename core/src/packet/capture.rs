use crate::packet::frame::{extract_frame, SampleVector};
use crate::prelude::CaptureError;
use crate::telemetry::{LogManager, MetricsRecorder};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streams frames out of a capture, skipping records that carry none.
///
/// The first line is treated as a column header unless disabled. Rejected
/// records are logged and counted on the optional [`MetricsRecorder`];
/// only I/O failures surface as errors.
pub struct CaptureReader<'m, R> {
    lines: std::io::Lines<R>,
    source_name: String,
    line_number: usize,
    skip_header: bool,
    metrics: Option<&'m MetricsRecorder>,
    logger: LogManager,
}

impl<'m, R: BufRead> CaptureReader<'m, R> {
    pub fn new(reader: R, source_name: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            source_name: source_name.into(),
            line_number: 0,
            skip_header: true,
            metrics: None,
            logger: LogManager::new("capture"),
        }
    }

    pub fn with_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    pub fn with_metrics(mut self, metrics: &'m MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn next_line(&mut self) -> Option<Result<String, CaptureError>> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line.map_err(|source| CaptureError::Io {
            source_name: self.source_name.clone(),
            source,
        }))
    }
}

impl<'m, R: BufRead> Iterator for CaptureReader<'m, R> {
    type Item = Result<SampleVector, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.next_line()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            if self.skip_header && self.line_number == 1 {
                continue;
            }
            match extract_frame(&line) {
                Ok(frame) => {
                    if let Some(metrics) = self.metrics {
                        metrics.record_frame();
                    }
                    return Some(Ok(frame));
                }
                Err(err) => {
                    self.logger.rejected(&self.source_name, self.line_number, &err);
                    if let Some(metrics) = self.metrics {
                        metrics.record_rejected(err.kind());
                    }
                }
            }
        }
    }
}

/// Reads every frame of a capture file.
pub fn read_capture_file(
    path: impl AsRef<Path>,
    skip_header: bool,
    metrics: Option<&MetricsRecorder>,
) -> Result<Vec<SampleVector>, CaptureError> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|source| CaptureError::Io {
        source_name: source_name.clone(),
        source,
    })?;

    let mut reader = CaptureReader::new(BufReader::new(file), source_name).with_header(skip_header);
    if let Some(metrics) = metrics {
        reader = reader.with_metrics(metrics);
    }
    let frames = reader.collect::<Result<Vec<_>, _>>()?;
    let logger = LogManager::new("capture");
    if frames.is_empty() {
        logger.warn(&format!("{}: no valid packets", path.display()));
    } else {
        logger.record(&format!("{} -> {} frames", path.display(), frames.len()));
    }
    Ok(frames)
}
