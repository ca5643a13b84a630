use serde::{Deserialize, Serialize};

/// Number of depth samples carried by every frame and profile.
pub const DEPTH_SAMPLES: usize = 90;

/// Byte offset of the sonar samples inside a parsed packet.
pub const SONAR_OFFSET: usize = 92;

/// Minimum parsed packet length that still contains the full sonar field.
pub const MIN_PACKET_LEN: usize = SONAR_OFFSET + DEPTH_SAMPLES;

/// Direction tag carried by inbound (transducer to host) records.
pub const INBOUND_TAG: &str = "RX";

/// Reason a raw capture record did not yield a frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("blank record")]
    Blank,
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("not an inbound record: {0:?}")]
    Outbound(String),
    #[error("no quoted payload")]
    MissingPayload,
    #[error("invalid hex token {0:?}")]
    InvalidHexToken(String),
    #[error("payload too short: {0} bytes")]
    ShortPayload(usize),
}

impl FrameError {
    /// Stable label used when counting rejections.
    pub fn kind(&self) -> RejectKind {
        match self {
            FrameError::Blank => RejectKind::Blank,
            FrameError::TooFewFields(_) => RejectKind::TooFewFields,
            FrameError::Outbound(_) => RejectKind::Outbound,
            FrameError::MissingPayload => RejectKind::MissingPayload,
            FrameError::InvalidHexToken(_) => RejectKind::InvalidHex,
            FrameError::ShortPayload(_) => RejectKind::ShortPayload,
        }
    }
}

/// Payload-free classification of [`FrameError`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RejectKind {
    Blank,
    TooFewFields,
    Outbound,
    MissingPayload,
    InvalidHex,
    ShortPayload,
}

pub type FrameResult<T> = Result<T, FrameError>;

/// Failure while reading a capture stream.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("reading capture {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can be viewed as a depth-indexed scalar sequence.
///
/// Implemented by raw frames and aggregated profiles so the detector runs on
/// either without conversion at the call site.
pub trait DepthSeries {
    fn depth_values(&self) -> [f64; DEPTH_SAMPLES];
}

impl DepthSeries for [f64; DEPTH_SAMPLES] {
    fn depth_values(&self) -> [f64; DEPTH_SAMPLES] {
        *self
    }
}
