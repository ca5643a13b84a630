use crate::prelude::FrameError;
use log::{debug, info, warn};

/// Component-scoped logger over the `log` facade.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }

    /// Per-record rejections are noisy, so they stay at debug level.
    pub fn rejected(&self, source: &str, line_number: usize, error: &FrameError) {
        debug!(
            "[{}] {}:{} skipped: {}",
            self.component, source, line_number, error
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("sonarcore")
    }
}
