use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Trailing-edge debouncer: publishes a "settled" copy of a rapidly-changing
/// value once it has been stable for the configured delay.
///
/// The settled value starts equal to the initial value, with no artificial
/// delay. Each `update` cancels any pending emission and arms a fresh timer,
/// so n updates inside one delay window produce exactly one settle event
/// carrying the last value. A zero delay settles on the next runtime tick.
/// Dropping the debouncer aborts the pending timer; nothing fires afterward.
pub struct Debouncer<T> {
    delay: Duration,
    settled_tx: watch::Sender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    /// Must be called from within a tokio runtime; `update` spawns the
    /// timer task on it.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (settled_tx, _) = watch::channel(initial);
        Debouncer {
            delay,
            settled_tx,
            pending: None,
        }
    }

    /// Receiver for the settled value. Subscribers see the current settled
    /// value immediately and every later settle event.
    pub fn settled(&self) -> watch::Receiver<T> {
        self.settled_tx.subscribe()
    }

    /// Feed the next raw value, cancelling any emission still pending.
    pub fn update(&mut self, value: T) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let settled_tx = self.settled_tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            settled_tx.send_replace(value);
        }));
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
