use anyhow::Context;
use clap::{Parser, ValueEnum};
use generator::profile::{build_capture, GeneratorConfig};
use report::render::{render_json, render_text};
use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use workflow::config::AnalyzerConfig;
use workflow::runner::{resolve_inputs, Runner};

mod generator;
mod report;
mod workflow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Sonar capture depth profile and second-reflection analyzer")]
struct Args {
    /// Capture CSV files, or directories scanned for *.csv
    inputs: Vec<PathBuf>,
    /// Load analyzer settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Only report the combined section
    #[arg(long, default_value_t = false)]
    combined_only: bool,
    /// Analyze a generated capture with this many frames instead of files
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Append the report to this file instead of printing it
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        AnalyzerConfig::load(path)?
    } else {
        AnalyzerConfig::default()
    };
    if args.combined_only {
        config.per_file = false;
    }

    let runner = Runner::new(config);
    let report = if let Some(frames) = args.synthetic {
        let capture = build_capture(&GeneratorConfig {
            frames,
            seed: args.seed,
            ..Default::default()
        })?;
        let captured = runner.read_capture("synthetic", Cursor::new(capture))?;
        runner.execute(&[captured])
    } else {
        let paths = resolve_inputs(&args.inputs)?;
        if paths.is_empty() {
            anyhow::bail!("no capture files given (pass files, a directory, or --synthetic N)");
        }
        runner.execute_files(&paths)?
    };

    let rendered = match args.format {
        OutputFormat::Text => render_text(&report).context("rendering report")?,
        OutputFormat::Json => render_json(&report).context("serializing report")?,
    };

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening report {}", path.display()))?;
            file.write_all(rendered.as_bytes())?;
            log::info!("report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
