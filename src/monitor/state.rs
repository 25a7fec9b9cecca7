//! Per-service monitor state.

use std::collections::HashMap;

use crate::flapping::history::DEFAULT_WINDOW;
use crate::flapping::{NotificationLatch, UptimeHistory};

/// Everything the poller remembers about one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceState {
    pub history: UptimeHistory,
    pub latch: NotificationLatch,
}

impl ServiceState {
    pub fn new(window: usize) -> Self {
        Self {
            history: UptimeHistory::new(window),
            latch: NotificationLatch::default(),
        }
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Service name → state, owned by the poller.
///
/// Entries are created empty on first reference and kept for the lifetime
/// of the process, even after a service disappears from the directory.
#[derive(Debug, Clone)]
pub struct ServiceTable {
    window: usize,
    states: HashMap<String, ServiceState>,
}

impl ServiceTable {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            states: HashMap::new(),
        }
    }

    /// Existing state for `name`, or a fresh empty one.
    pub fn get_or_insert(&mut self, name: &str) -> &mut ServiceState {
        let window = self.window;
        self.states
            .entry(name.to_string())
            .or_insert_with(|| ServiceState::new(window))
    }

    pub fn get(&self, name: &str) -> Option<&ServiceState> {
        self.states.get(name)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
