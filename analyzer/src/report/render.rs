use crate::report::model::{AnalysisReport, HistogramSummary, SectionReport};
use sonarcore::processing::DepthZone;
use std::fmt::{self, Write};

const RULE_WIDTH: usize = 80;

fn rule(out: &mut String, ch: char) -> fmt::Result {
    writeln!(out, "{}", ch.to_string().repeat(RULE_WIDTH))
}

fn optional_depth(depth: Option<usize>) -> String {
    depth.map_or_else(|| "none".to_string(), |d| d.to_string())
}

/// Plain-text rendering of a whole run.
pub fn render_text(report: &AnalysisReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_section(&mut out, &report.combined)?;
    for section in &report.files {
        writeln!(out)?;
        render_section(&mut out, section)?;
    }
    Ok(out)
}

fn render_section(out: &mut String, section: &SectionReport) -> fmt::Result {
    rule(out, '=')?;
    writeln!(out, "{}", section.name)?;
    writeln!(
        out,
        "Packets: {}  (skipped records: {}, malformed: {})",
        section.frame_count(),
        section.ingest.rejected_total(),
        section.ingest.malformed_total()
    )?;
    rule(out, '=')?;

    if section.frame_count() == 0 {
        return writeln!(out, "No valid packets found.");
    }

    render_detection(out, section)?;
    rule(out, '-')?;
    render_depth_table(out, section)?;
    rule(out, '-')?;
    render_bands(out, section)?;
    rule(out, '-')?;
    render_candidates(out, section)?;
    if let Some(histogram) = &section.histogram {
        rule(out, '-')?;
        render_histogram(out, histogram)?;
    }
    Ok(())
}

fn render_detection(out: &mut String, section: &SectionReport) -> fmt::Result {
    let reflection = &section.reflection;
    writeln!(out, "Bottom threshold: {:.2}", reflection.threshold)?;
    match reflection.bottom {
        Some(bottom) => writeln!(out, "Bottom window: {}..={}", bottom.start, bottom.end)?,
        None => writeln!(out, "Bottom window: none (no saturated depth)")?,
    }
    if let Some(window) = section.search_window {
        writeln!(
            out,
            "Second reflection search: [{}, {}) above {:.2}",
            window.start, window.end, window.threshold
        )?;
    }
    writeln!(
        out,
        "Second reflection: {}  (hidden depths: {})",
        optional_depth(reflection.second_reflection),
        section.hidden_depths()
    )
}

fn render_depth_table(out: &mut String, section: &SectionReport) -> fmt::Result {
    writeln!(
        out,
        "{:>5} | {:>6} | {:>6} | {:>3} | {:>3} | {:>6} | {:>6} | Zone",
        "Depth",
        "Avg",
        "Median",
        "Min",
        "Max",
        "Non-0%",
        format!("Sig>{}", section.statistics.significant_level)
    )?;
    for (stat, zone) in section.statistics.depths.iter().zip(&section.zones) {
        let marker = match zone {
            DepthZone::Normal => String::new(),
            other => format!("<- {}", other.label()),
        };
        writeln!(
            out,
            "{:>5} | {:>6.2} | {:>6.2} | {:>3} | {:>3} | {:>5.1}% | {:>5.1}% | {}",
            stat.depth,
            stat.mean,
            stat.median,
            stat.min,
            stat.max,
            stat.non_zero_pct,
            stat.significant_pct,
            marker
        )?;
    }
    Ok(())
}

fn render_bands(out: &mut String, section: &SectionReport) -> fmt::Result {
    writeln!(out, "Value distribution by depth band:")?;
    for summary in &section.statistics.bands {
        writeln!(
            out,
            "  {} ({}-{}): avg {:.2}, median {:.2}",
            summary.band.name, summary.band.first, summary.band.last, summary.mean, summary.median
        )?;
        let top = summary
            .top_values
            .iter()
            .map(|(value, count)| format!("{}({})", value, count))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "    most common: {}", top)?;
    }
    Ok(())
}

fn render_candidates(out: &mut String, section: &SectionReport) -> fmt::Result {
    match &section.lure_candidate {
        Some(lure) => writeln!(
            out,
            "Lure candidate: depth {} (avg {:.2}, median {:.2}, max {})",
            lure.depth, lure.mean, lure.median, lure.max
        )?,
        None => writeln!(out, "Lure candidate: none")?,
    }
    match &section.bottom_candidate {
        Some(bottom) => writeln!(
            out,
            "Bottom candidate: depth {} (avg {:.2})",
            bottom.depth, bottom.mean
        ),
        None => writeln!(out, "Bottom candidate: none"),
    }
}

fn render_histogram(out: &mut String, histogram: &HistogramSummary) -> fmt::Result {
    writeln!(
        out,
        "Values: {} samples, range {}..={}, {} distinct",
        histogram.total,
        optional_depth(histogram.min.map(usize::from)),
        optional_depth(histogram.max.map(usize::from)),
        histogram.distinct
    )?;
    writeln!(out, "{:>4} | {:>3} | {:>6} | {:>7}", "Hex", "Dec", "Count", "Percent")?;
    for share in &histogram.values {
        writeln!(
            out,
            "0x{:02X} | {:3} | {:6} | {:6.2}%",
            share.value, share.value, share.count, share.percent
        )?;
    }
    writeln!(out, "Ranges:")?;
    for bucket in &histogram.buckets {
        writeln!(
            out,
            "  0x{:02X}-0x{:02X} ({:3}-{:3}): {:8} ({:6.2}%)",
            bucket.low, bucket.high, bucket.low, bucket.high, bucket.count, bucket.percent
        )?;
    }
    Ok(())
}

/// JSON rendering of a whole run.
pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
