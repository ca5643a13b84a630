pub mod histogram;
pub mod stats;

pub use histogram::{HistogramBucket, ValueHistogram, ValueShare};
pub use stats::StatsHelper;
