//! Core of the sonar capture analysis workspace.
//!
//! Raw capture records are turned into fixed 90-sample frames, reduced into
//! per-depth profiles, and scanned for the bottom echo and any second
//! reflection below it. Everything here is pure computation; reading files
//! and rendering reports belong to the driver crates.

pub mod math;
pub mod packet;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use packet::{extract_frame, CaptureReader, SampleVector};
pub use prelude::{DepthSeries, FrameError, DEPTH_SAMPLES};
pub use processing::{
    classify_zones, detect, BottomWindow, DepthProfile, DepthStatistics, DepthZone,
    ReflectionResult,
};
