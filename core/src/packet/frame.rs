use crate::prelude::{
    DepthSeries, FrameError, FrameResult, DEPTH_SAMPLES, INBOUND_TAG, MIN_PACKET_LEN, SONAR_OFFSET,
};
use serde::{Deserialize, Serialize};

/// One packet's 90 depth samples, surface first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleVector(#[serde(with = "sample_array")] [u8; DEPTH_SAMPLES]);

impl SampleVector {
    pub fn new(samples: [u8; DEPTH_SAMPLES]) -> Self {
        Self(samples)
    }

    /// Builds a frame from a slice, rejecting anything that is not exactly 90 samples.
    pub fn from_slice(samples: &[u8]) -> Option<Self> {
        samples.try_into().ok().map(Self)
    }

    pub fn samples(&self) -> &[u8; DEPTH_SAMPLES] {
        &self.0
    }

    /// Sample at `depth`, or `None` outside `0..90`.
    pub fn get(&self, depth: usize) -> Option<u8> {
        self.0.get(depth).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl DepthSeries for SampleVector {
    fn depth_values(&self) -> [f64; DEPTH_SAMPLES] {
        self.0.map(f64::from)
    }
}

/// Parses one capture line into a frame.
///
/// The line must be an inbound record with at least three comma-separated
/// fields and a quoted, whitespace-separated hex byte string of at least
/// [`MIN_PACKET_LEN`] bytes. Any unparseable token rejects the whole record.
pub fn extract_frame(line: &str) -> FrameResult<SampleVector> {
    let line = line.trim();
    if line.is_empty() {
        return Err(FrameError::Blank);
    }

    let fields: Vec<&str> = line.splitn(3, ',').collect();
    if fields.len() < 3 {
        return Err(FrameError::TooFewFields(fields.len()));
    }
    if fields[0] != INBOUND_TAG {
        return Err(FrameError::Outbound(fields[0].to_string()));
    }

    let payload = quoted_payload(line).ok_or(FrameError::MissingPayload)?;
    let bytes = parse_hex_bytes(payload)?;
    if bytes.len() < MIN_PACKET_LEN {
        return Err(FrameError::ShortPayload(bytes.len()));
    }

    SampleVector::from_slice(&bytes[SONAR_OFFSET..MIN_PACKET_LEN])
        .ok_or(FrameError::ShortPayload(bytes.len()))
}

fn quoted_payload(line: &str) -> Option<&str> {
    let open = line.find('"')? + 1;
    let close = line[open..].find('"')? + open;
    Some(&line[open..close])
}

fn parse_hex_bytes(payload: &str) -> FrameResult<Vec<u8>> {
    payload
        .split_whitespace()
        .map(|token| {
            u8::from_str_radix(token, 16)
                .map_err(|_| FrameError::InvalidHexToken(token.to_string()))
        })
        .collect()
}

mod sample_array {
    use super::DEPTH_SAMPLES;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        samples: &[u8; DEPTH_SAMPLES],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(samples.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; DEPTH_SAMPLES], D::Error> {
        let samples = Vec::<u8>::deserialize(deserializer)?;
        let len = samples.len();
        samples
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"exactly 90 samples"))
    }
}
