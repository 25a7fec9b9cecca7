//! Flapping predicate.

use crate::config::FlappingConfig;
use crate::flapping::history::DEFAULT_WINDOW;

/// Default uptime below which a run counts as short-lived.
pub const DEFAULT_THRESHOLD_SECS: u64 = 60;

/// Judges whether a history shows repeated short-lived runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlapDetector {
    window: usize,
    threshold_secs: u64,
}

impl FlapDetector {
    pub fn new(window: usize, threshold_secs: u64) -> Self {
        Self { window, threshold_secs }
    }

    pub fn from_config(config: &FlappingConfig) -> Self {
        Self::new(config.window, config.threshold_secs)
    }

    /// True iff at least `window` samples exist and all are below the threshold.
    ///
    /// Callers pass the history as it stood before the current observation.
    pub fn is_flapping(&self, history: &[u64]) -> bool {
        history.len() >= self.window && history.iter().all(|&uptime| uptime < self.threshold_secs)
    }
}

impl Default for FlapDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_THRESHOLD_SECS)
    }
}
