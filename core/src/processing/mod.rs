pub mod aggregate;
pub mod reflection;
pub mod statistics;
pub mod zones;

pub use aggregate::{aggregate_mean, DepthProfile, MeanAccumulator};
pub use reflection::{detect, BottomWindow, ReflectionResult, SearchWindow};
pub use statistics::{
    BandSummary, DepthBand, DepthStat, DepthStatistics, DEFAULT_SIGNIFICANT_LEVEL, DEPTH_BANDS,
};
pub use zones::{classify_zones, DepthZone};
