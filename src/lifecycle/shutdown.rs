//! Stop signal for the poll loop.
//!
//! The signal listener owns the trigger side; `Poller::run` holds a
//! receiver and checks it only while sleeping between ticks, so a tick in
//! flight always completes and its state updates are never half applied.

use tokio::sync::broadcast;

/// One-shot stop request fanned out to every poll loop.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        // A single slot suffices: the loop only cares that a stop was sent.
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a poll loop. Must be taken before `trigger`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed loop to stop at its next sleep.
    ///
    /// Triggering with no loop subscribed is a no-op.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Poll loops still holding a receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
