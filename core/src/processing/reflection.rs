//! Bottom-echo and second-reflection detection over a 90-sample depth series.
//!
//! The detector runs four stages:
//!
//! 1. derive a noise-adaptive bottom threshold from the non-saturated samples,
//! 2. locate the bottom window ending at the first saturated sample,
//! 3. place the second-reflection search window relative to that bottom,
//! 4. scan the window for the first run of strong, unsaturated samples.
//!
//! Every constant lives in [`policy`] and is part of the behavioural contract.

use crate::math::StatsHelper;
use crate::prelude::{DepthSeries, DEPTH_SAMPLES};
use serde::Serialize;

/// Fixed detection constants.
pub mod policy {
    /// Samples below this are treated as the noise floor.
    pub const NOISE_FLOOR: f64 = 2.0;
    /// Samples at or above this are clipped by the sensor.
    pub const SATURATION_LEVEL: f64 = 80.0;
    /// First sample at or above this marks the end of the bottom window.
    pub const SATURATION_ONSET: f64 = 79.5;
    /// Rank used for the percentile part of the bottom threshold.
    pub const PERCENTILE_RANK: f64 = 0.90;
    /// Percentile used when no sample is valid.
    pub const FALLBACK_PERCENTILE: f64 = 20.0;
    /// Strongest valid sample assumed when no sample is valid.
    pub const FALLBACK_MAX_SIGNAL: f64 = 79.0;
    /// Fraction of the strongest valid sample the threshold never drops below.
    pub const MAX_SIGNAL_FRACTION: f64 = 0.75;
    /// Bottom onset samples must exceed this.
    pub const BOTTOM_ONSET_LEVEL: f64 = 20.0;
    /// How many samples above the first saturated one are searched for the onset.
    pub const BOTTOM_LOOKBACK: usize = 5;
    /// Search start offset as a multiple of the bottom onset depth.
    pub const SEARCH_START_FACTOR: f64 = 0.5;
    /// Search end offset as a multiple of the bottom onset depth.
    pub const SEARCH_END_FACTOR: f64 = 1.5;
    /// Second-reflection threshold as a fraction of the bottom threshold.
    pub const SECOND_REFLECTION_FRACTION: f64 = 0.5;
    /// Consecutive samples that must clear the second-reflection threshold.
    pub const SECOND_REFLECTION_RUN: usize = 3;
}

use policy::*;

/// Onset and saturation point of the main bottom echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BottomWindow {
    pub start: usize,
    pub end: usize,
}

impl BottomWindow {
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Half-open depth range scanned for a second reflection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchWindow {
    pub start: usize,
    pub end: usize,
    pub threshold: f64,
}

impl SearchWindow {
    pub fn for_bottom(bottom: BottomWindow, bottom_threshold: f64) -> Self {
        let end_depth = bottom.end as f64;
        let onset_depth = bottom.start as f64;
        let start = (end_depth + onset_depth * SEARCH_START_FACTOR).floor() as usize;
        let end = ((end_depth + onset_depth * SEARCH_END_FACTOR).floor() as usize).min(DEPTH_SAMPLES);
        Self {
            start,
            end,
            threshold: bottom_threshold * SECOND_REFLECTION_FRACTION,
        }
    }

    /// Candidate run starts, each leaving room for a full run before `end`.
    fn candidates(&self) -> std::ops::Range<usize> {
        self.start..self.end.saturating_sub(SECOND_REFLECTION_RUN - 1)
    }
}

/// Outcome of one detector run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflectionResult {
    pub bottom: Option<BottomWindow>,
    pub second_reflection: Option<usize>,
    pub threshold: f64,
}

impl ReflectionResult {
    /// The window the second-reflection scan covered, if a bottom was found.
    pub fn search_window(&self) -> Option<SearchWindow> {
        self.bottom
            .map(|bottom| SearchWindow::for_bottom(bottom, self.threshold))
    }
}

/// Runs the full detector on a raw frame or an aggregated profile.
pub fn detect<S: DepthSeries>(series: &S) -> ReflectionResult {
    let values = series.depth_values();
    let threshold = bottom_threshold(&values);

    let Some(bottom) = locate_bottom(&values) else {
        return ReflectionResult {
            bottom: None,
            second_reflection: None,
            threshold,
        };
    };

    let window = SearchWindow::for_bottom(bottom, threshold);
    ReflectionResult {
        bottom: Some(bottom),
        second_reflection: scan_second_reflection(&values, &window),
        threshold,
    }
}

/// `max(P90, 0.75 * strongest)` over samples in `[NOISE_FLOOR, SATURATION_LEVEL)`.
pub fn bottom_threshold(values: &[f64]) -> f64 {
    let mut valid: Vec<f64> = values
        .iter()
        .copied()
        .filter(|&v| (NOISE_FLOOR..SATURATION_LEVEL).contains(&v))
        .collect();
    valid.sort_by(f64::total_cmp);

    let p90 = StatsHelper::rank_percentile(&valid, PERCENTILE_RANK).unwrap_or(FALLBACK_PERCENTILE);
    let max_signal = valid.last().copied().unwrap_or(FALLBACK_MAX_SIGNAL);
    p90.max(max_signal * MAX_SIGNAL_FRACTION)
}

/// Bottom window ending at the first saturated sample, or `None` if nothing saturates.
pub fn locate_bottom(values: &[f64]) -> Option<BottomWindow> {
    let end = values.iter().position(|&v| v >= SATURATION_ONSET)?;
    let start = (end.saturating_sub(BOTTOM_LOOKBACK)..end)
        .rev()
        .find(|&depth| {
            let v = values[depth];
            v > BOTTOM_ONSET_LEVEL && v < SATURATION_LEVEL
        })
        .unwrap_or(end);
    Some(BottomWindow { start, end })
}

/// First depth in `window` opening a run of unsaturated samples above its threshold.
pub fn scan_second_reflection(values: &[f64], window: &SearchWindow) -> Option<usize> {
    window.candidates().find(|&depth| {
        values
            .get(depth..depth + SECOND_REFLECTION_RUN)
            .is_some_and(|run| {
                run.iter().all(|&v| v < SATURATION_LEVEL)
                    && run.iter().all(|&v| v > window.threshold)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::SampleVector;

    /// Mean profile of a lake capture with a strong second reflection.
    const LAKE_PROFILE: [f64; DEPTH_SAMPLES] = [
        0.00, 0.00, 0.01, 0.00, 0.01, 0.00, 0.00, 0.01, 0.00, 0.02, //
        0.00, 0.00, 0.01, 0.00, 0.00, 0.00, 0.00, 0.01, 0.00, 0.01, //
        0.07, 0.41, 0.06, 0.57, 0.46, 10.33, 21.43, 21.73, 21.32, 6.48, //
        8.71, 7.60, 7.04, 12.97, 8.38, 14.43, 19.81, 16.51, 15.72, 11.52, //
        9.68, 8.94, 8.76, 39.04, 79.96, 79.84, 78.97, 57.95, 37.89, 37.30, //
        18.67, 14.34, 23.91, 42.28, 28.36, 28.88, 71.09, 77.71, 70.24, 58.79, //
        36.99, 37.81, 35.31, 24.77, 35.83, 33.55, 25.62, 39.06, 62.97, 39.62, //
        38.02, 55.34, 67.89, 61.86, 49.81, 61.43, 79.95, 79.99, 79.90, 79.23, //
        63.82, 58.30, 38.08, 35.50, 50.05, 41.83, 42.12, 34.74, 0.00, 0.00,
    ];

    fn profile_with(points: &[(usize, f64)]) -> [f64; DEPTH_SAMPLES] {
        let mut values = [0.0; DEPTH_SAMPLES];
        for &(depth, value) in points {
            values[depth] = value;
        }
        values
    }

    #[test]
    fn lake_profile_matches_reference_trace() {
        let result = detect(&LAKE_PROFILE);
        assert_eq!(result.threshold, 78.97);
        assert_eq!(result.bottom, Some(BottomWindow { start: 43, end: 44 }));

        let window = result.search_window().unwrap();
        assert_eq!((window.start, window.end), (65, 90));
        assert_eq!(window.threshold, 78.97 * 0.5);

        assert_eq!(result.second_reflection, Some(71));
    }

    #[test]
    fn all_zero_profile_has_no_bottom() {
        let result = detect(&[0.0; DEPTH_SAMPLES]);
        assert_eq!(result.bottom, None);
        assert_eq!(result.second_reflection, None);
        assert!(result.search_window().is_none());
        assert_eq!(result.threshold, FALLBACK_PERCENTILE.max(FALLBACK_MAX_SIGNAL * 0.75));
    }

    #[test]
    fn unsaturated_profile_has_no_bottom() {
        let values = profile_with(&[(30, 79.49), (31, 60.0), (60, 70.0), (61, 70.0), (62, 70.0)]);
        let result = detect(&values);
        assert_eq!(result.bottom, None);
        assert_eq!(result.second_reflection, None);
    }

    #[test]
    fn onset_sample_just_above_saturation_starts_bottom() {
        let values = profile_with(&[(43, 39.0), (44, 79.9)]);
        let result = detect(&values);
        assert_eq!(result.bottom, Some(BottomWindow { start: 43, end: 44 }));
    }

    #[test]
    fn nearest_qualifying_sample_within_lookback_wins() {
        let values = profile_with(&[(37, 50.0), (39, 30.0), (41, 25.0), (42, 15.0), (44, 85.0)]);
        assert_eq!(locate_bottom(&values), Some(BottomWindow { start: 41, end: 44 }));

        // Depth 38 is six samples above the saturation point, out of reach.
        let values = profile_with(&[(38, 50.0), (44, 85.0)]);
        let bottom = locate_bottom(&values).unwrap();
        assert!(bottom.is_degenerate());
        assert_eq!(bottom.start, 44);
    }

    #[test]
    fn onset_must_be_strictly_above_twenty() {
        let values = profile_with(&[(43, 20.0), (44, 79.5)]);
        assert_eq!(
            locate_bottom(&values),
            Some(BottomWindow { start: 44, end: 44 })
        );

        let values = profile_with(&[(42, 20.01), (43, 20.0), (44, 79.5)]);
        assert_eq!(
            locate_bottom(&values),
            Some(BottomWindow { start: 42, end: 44 })
        );
    }

    #[test]
    fn saturation_at_surface_is_degenerate() {
        let values = profile_with(&[(0, 90.0)]);
        assert_eq!(locate_bottom(&values), Some(BottomWindow { start: 0, end: 0 }));
        let result = detect(&values);
        // Window [0, 0) is empty.
        assert_eq!(result.second_reflection, None);
    }

    #[test]
    fn search_window_is_clamped_to_profile() {
        let window = SearchWindow::for_bottom(BottomWindow { start: 60, end: 62 }, 40.0);
        assert_eq!((window.start, window.end), (92, DEPTH_SAMPLES));
        assert_eq!(window.threshold, 20.0);
        assert!(window.candidates().is_empty());

        let window = SearchWindow::for_bottom(BottomWindow { start: 9, end: 10 }, 40.0);
        assert_eq!((window.start, window.end), (14, 23));
    }

    #[test]
    fn saturated_runs_are_skipped() {
        let window = SearchWindow {
            start: 50,
            end: 70,
            threshold: 30.0,
        };
        let values = profile_with(&[
            (52, 40.0),
            (53, 40.0),
            (54, 85.0),
            (55, 40.0),
            (56, 40.0),
            (57, 40.0),
        ]);
        assert_eq!(scan_second_reflection(&values, &window), Some(55));
    }

    #[test]
    fn run_must_fit_inside_window_end() {
        let values = profile_with(&[(67, 50.0), (68, 50.0), (69, 50.0)]);
        let short = SearchWindow {
            start: 60,
            end: 69,
            threshold: 30.0,
        };
        assert_eq!(scan_second_reflection(&values, &short), None);

        let exact = SearchWindow { end: 70, ..short };
        assert_eq!(scan_second_reflection(&values, &exact), Some(67));
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let window = SearchWindow {
            start: 0,
            end: 10,
            threshold: 30.0,
        };
        let values = profile_with(&[(2, 30.0), (3, 31.0), (4, 31.0), (5, 31.0)]);
        assert_eq!(scan_second_reflection(&values, &window), Some(3));
    }

    #[test]
    fn threshold_grows_with_single_peak() {
        let mut previous = f64::MIN;
        for peak in [2.0, 10.0, 25.5, 40.0, 61.0, 79.9] {
            let threshold = bottom_threshold(&profile_with(&[(40, peak)]));
            assert!(threshold >= previous, "{} < {}", threshold, previous);
            previous = threshold;
        }
    }

    #[test]
    fn threshold_ignores_noise_floor_and_saturation() {
        let values = profile_with(&[(10, 1.99), (11, 80.0), (12, 120.0)]);
        assert_eq!(bottom_threshold(&values), 79.0 * 0.75);

        let values = profile_with(&[(10, 40.0), (11, 10.0), (12, 10.0)]);
        assert_eq!(bottom_threshold(&values), 40.0);
    }

    #[test]
    fn detector_runs_on_raw_frames() {
        let mut samples = [0u8; DEPTH_SAMPLES];
        samples[20] = 45;
        samples[21] = 95;
        samples[32..36].copy_from_slice(&[40, 42, 41, 40]);
        let frame = SampleVector::new(samples);

        let result = detect(&frame);
        assert_eq!(result.bottom, Some(BottomWindow { start: 20, end: 21 }));
        // Window is [31, 51) with threshold 45 * 0.5 = 22.5.
        assert_eq!(result.second_reflection, Some(32));
    }

    #[test]
    fn detection_is_repeatable() {
        assert_eq!(detect(&LAKE_PROFILE), detect(&LAKE_PROFILE));
    }

    #[test]
    fn result_serializes_absent_fields_as_null() {
        let json = serde_json::to_value(detect(&[0.0; DEPTH_SAMPLES])).unwrap();
        assert!(json["bottom"].is_null());
        assert!(json["second_reflection"].is_null());
    }
}
