//! Notification debouncing.
//!
//! # State Transitions
//! ```text
//! Armed → Notified: service judged flapping (alert fires)
//! Notified → Armed: service observed up and not flapping
//! down observation: no change
//! ```
//!
//! Re-arming does not wait for a clean streak: one up-observation with a
//! non-flapping verdict is enough, including when the history is still too
//! short to judge.

/// One alert per flapping episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationLatch {
    notified: bool,
}

impl NotificationLatch {
    pub fn is_set(&self) -> bool {
        self.notified
    }

    /// Returns true when an alert must be sent for this verdict.
    pub fn should_notify(&mut self, flapping: bool) -> bool {
        if flapping && !self.notified {
            self.notified = true;
            return true;
        }
        false
    }

    /// Apply the recovery rule for an up-observation.
    pub fn observe_up(&mut self, flapping: bool) {
        if !flapping {
            self.notified = false;
        }
    }
}
