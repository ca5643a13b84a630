pub mod capture;
pub mod frame;

pub use capture::{read_capture_file, CaptureReader};
pub use frame::{extract_frame, SampleVector};
