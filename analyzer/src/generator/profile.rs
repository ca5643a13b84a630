use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sonarcore::prelude::{DEPTH_SAMPLES, INBOUND_TAG, SONAR_OFFSET};

const HEADER: &str = "Direction,Timestamp,Hex Data,Parsed Info,Error";
const TRAILER_BYTES: usize = 8;
const PLATEAU_LEN: usize = 6;

/// Configuration for generating synthetic sonar captures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub frames: usize,
    /// Depth of the bottom onset; saturation follows one sample deeper.
    pub bottom_depth: usize,
    /// Upper bound of the surface noise floor.
    pub noise: u8,
    /// Add a plateau at twice the bottom depth.
    pub second_reflection: bool,
    /// Interleave one outbound control record every this many frames (0 disables).
    pub control_every: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames: 50,
            bottom_depth: 30,
            noise: 3,
            second_reflection: true,
            control_every: 5,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    /// Deepest bottom that still fits the plateau inside the frame.
    pub fn max_bottom_depth() -> usize {
        (DEPTH_SAMPLES - PLATEAU_LEN) / 2
    }

    fn validate(&self) -> anyhow::Result<()> {
        // The taper below the bottom must end above the plateau.
        let min = 11;
        let max = Self::max_bottom_depth();
        if !(min..=max).contains(&self.bottom_depth) {
            anyhow::bail!(
                "bottom depth {} outside supported range {}..={}",
                self.bottom_depth,
                min,
                max
            );
        }
        Ok(())
    }
}

fn sample_at(rng: &mut StdRng, config: &GeneratorConfig, depth: usize) -> u8 {
    let bottom = config.bottom_depth;
    let plateau = 2 * bottom..2 * bottom + PLATEAU_LEN;
    let around = |rng: &mut StdRng, center: i32| (center + rng.gen_range(-3..=3)) as u8;

    if depth < bottom {
        rng.gen_range(0..=config.noise)
    } else if depth == bottom {
        around(rng, 38)
    } else if depth <= bottom + 3 {
        rng.gen_range(80..=95)
    } else if depth <= bottom + 10 {
        let step = (depth - bottom - 4) as i32;
        around(rng, 70 - 7 * step)
    } else if config.second_reflection && plateau.contains(&depth) {
        around(rng, 55)
    } else if depth < plateau.start {
        around(rng, 10)
    } else {
        around(rng, 12)
    }
}

fn hex_line(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn timestamp(millis: usize) -> String {
    format!(
        "2025-11-17T18:{:02}:{:02}.{:03}Z",
        (millis / 60_000) % 60,
        (millis / 1000) % 60,
        millis % 1000
    )
}

fn build_record(rng: &mut StdRng, config: &GeneratorConfig, millis: usize) -> String {
    let mut bytes: Vec<u8> = (0..SONAR_OFFSET).map(|_| rng.gen()).collect();
    bytes.extend((0..DEPTH_SAMPLES).map(|depth| sample_at(rng, config, depth)));
    bytes.extend((0..TRAILER_BYTES).map(|_| rng.gen::<u8>()));
    format!(
        "{},{},\"{}\",\"sonar frame\",",
        INBOUND_TAG,
        timestamp(millis),
        hex_line(&bytes)
    )
}

/// Renders a complete capture, header line included.
pub fn build_capture(config: &GeneratorConfig) -> anyhow::Result<String> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut lines = vec![HEADER.to_string()];

    for index in 0..config.frames {
        let millis = index * 125;
        if config.control_every > 0 && index % config.control_every == 0 {
            lines.push(format!(
                "TX,{},\"A5 01 {:02X}\",\"ping\",",
                timestamp(millis),
                index % 256
            ));
        }
        lines.push(build_record(&mut rng, config, millis));
    }

    let mut capture = lines.join("\n");
    capture.push('\n');
    Ok(capture)
}
