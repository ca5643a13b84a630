use crate::prelude::DEPTH_SAMPLES;
use crate::processing::reflection::ReflectionResult;
use serde::Serialize;

/// Role of one depth index in a detector result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepthZone {
    BottomStart,
    BottomEnd,
    BottomArea,
    SecondReflectionStart,
    /// Below the second-reflection onset; consumers should suppress it.
    Hidden,
    Normal,
}

impl DepthZone {
    /// Zone of `depth` under `result`. A degenerate bottom reports `BottomStart`.
    pub fn for_depth(result: &ReflectionResult, depth: usize) -> Self {
        if let Some(bottom) = result.bottom {
            if depth == bottom.start {
                return DepthZone::BottomStart;
            }
            if depth == bottom.end {
                return DepthZone::BottomEnd;
            }
        }
        if let Some(onset) = result.second_reflection {
            if depth == onset {
                return DepthZone::SecondReflectionStart;
            }
        }
        if let Some(bottom) = result.bottom {
            if bottom.start < depth && depth < bottom.end {
                return DepthZone::BottomArea;
            }
        }
        match result.second_reflection {
            Some(onset) if depth > onset => DepthZone::Hidden,
            _ => DepthZone::Normal,
        }
    }

    pub fn is_hidden(self) -> bool {
        self == DepthZone::Hidden
    }

    pub fn label(self) -> &'static str {
        match self {
            DepthZone::BottomStart => "BOTTOM START",
            DepthZone::BottomEnd => "BOTTOM END",
            DepthZone::BottomArea => "BOTTOM AREA",
            DepthZone::SecondReflectionStart => "SECOND REFLECTION START",
            DepthZone::Hidden => "HIDDEN",
            DepthZone::Normal => "",
        }
    }
}

/// Zone of every depth index, surface first.
pub fn classify_zones(result: &ReflectionResult) -> [DepthZone; DEPTH_SAMPLES] {
    std::array::from_fn(|depth| DepthZone::for_depth(result, depth))
}
