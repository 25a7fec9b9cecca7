//! Bounded uptime history per service.

/// Default number of up-observations kept.
pub const DEFAULT_WINDOW: usize = 5;

/// Uptimes of the most recent up-observations, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptimeHistory {
    samples: Vec<u64>,
    capacity: usize,
}

impl UptimeHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepend an uptime seen on an up-observation, dropping the oldest
    /// sample beyond capacity. Down observations must not be recorded.
    pub fn record(&mut self, uptime_secs: u64) {
        self.samples.insert(0, uptime_secs);
        self.samples.truncate(self.capacity);
    }

    /// Samples newest first.
    pub fn current(&self) -> &[u64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples joined with `sep`, newest first.
    pub fn join(&self, sep: &str) -> String {
        self.samples
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl Default for UptimeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
