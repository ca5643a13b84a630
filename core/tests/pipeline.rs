use sonarcore::packet::CaptureReader;
use sonarcore::processing::{aggregate_mean, DepthStatistics, DEFAULT_SIGNIFICANT_LEVEL};
use sonarcore::telemetry::MetricsRecorder;
use sonarcore::{classify_zones, detect, BottomWindow, DepthZone, DEPTH_SAMPLES};
use std::io::Cursor;

const HEADER: &str = "Direction,Timestamp,Hex Data,Parsed Info,Error";

/// Mean sample per depth the two synthetic frames average to.
fn target_means() -> [u8; DEPTH_SAMPLES] {
    let mut means = [0u8; DEPTH_SAMPLES];
    means[43] = 39;
    means[44] = 90;
    means[45] = 85;
    means[46] = 50;
    means[71..74].copy_from_slice(&[60, 60, 60]);
    means
}

fn record(direction: &str, samples: &[u8]) -> String {
    let mut bytes = vec![0x55u8; 92];
    bytes.extend_from_slice(samples);
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{},2025-11-17T18:12:00.000Z,\"{}\",\"depth frame\",",
        direction,
        hex.join(" ")
    )
}

fn capture_text() -> String {
    let means = target_means();
    let low: Vec<u8> = means.iter().map(|&m| m.saturating_sub(1)).collect();
    let high: Vec<u8> = means.iter().map(|&m| if m == 0 { 0 } else { m + 1 }).collect();
    [
        HEADER.to_string(),
        record("RX", &low),
        String::new(),
        record("TX", &high),
        "RX,2025-11-17T18:12:00.100Z,\"01 02 03\"".to_string(),
        record("RX", &high),
    ]
    .join("\n")
}

#[test]
fn capture_to_zones_end_to_end() {
    let metrics = MetricsRecorder::new();
    let frames = CaptureReader::new(Cursor::new(capture_text()), "synthetic")
        .with_metrics(&metrics)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(frames.len(), 2);

    let counts = metrics.snapshot();
    assert_eq!(counts.frames, 2);
    assert_eq!(counts.rejected_total(), 3);
    assert_eq!(counts.malformed_total(), 2);

    let profile = aggregate_mean(&frames);
    assert_eq!(profile.get(43), Some(39.0));
    assert_eq!(profile.get(44), Some(90.0));

    let result = detect(&profile);
    assert_eq!(result.threshold, 60.0);
    assert_eq!(result.bottom, Some(BottomWindow { start: 43, end: 44 }));
    assert_eq!(result.second_reflection, Some(71));
    let window = result.search_window().unwrap();
    assert_eq!((window.start, window.end), (65, 90));

    let zones = classify_zones(&result);
    assert_eq!(zones[43], DepthZone::BottomStart);
    assert_eq!(zones[44], DepthZone::BottomEnd);
    assert_eq!(zones[71], DepthZone::SecondReflectionStart);
    assert_eq!(zones.iter().filter(|z| z.is_hidden()).count(), 18);
}

#[test]
fn statistics_agree_with_mean_profile() {
    let frames = CaptureReader::new(Cursor::new(capture_text()), "synthetic")
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let stats = DepthStatistics::from_frames(&frames, DEFAULT_SIGNIFICANT_LEVEL);

    assert_eq!(stats.mean_profile(), aggregate_mean(&frames));
    let bottom = stats.depths[44];
    assert_eq!((bottom.min, bottom.max, bottom.median), (89, 91, 90.0));
    assert_eq!(stats.first_mean_above(50.0).map(|d| d.depth), Some(44));
    assert_eq!(stats.strongest_in(20..70).map(|d| d.depth), Some(44));
}

#[test]
fn empty_capture_degrades_to_no_detection() {
    let frames = CaptureReader::new(Cursor::new(HEADER.to_string()), "empty")
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!(frames.is_empty());

    let profile = aggregate_mean(&frames);
    let result = detect(&profile);
    assert_eq!(result.bottom, None);
    assert_eq!(result.second_reflection, None);
    assert!(classify_zones(&result)
        .iter()
        .all(|&zone| zone == DepthZone::Normal));
}
