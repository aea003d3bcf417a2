//! The navigation timer.
//!
//! One sleeping tokio task at a time. Every reset aborts the previous sleep
//! before starting a new one, and each firing carries the generation it was
//! started for, so the engine can also reject a timer that slipped through.

use std::sync::mpsc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::AbortHandle;

use crate::core::action::Action;

pub struct Debouncer {
    delay: Duration,
    tx: mpsc::Sender<Action>,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration, tx: mpsc::Sender<Action>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    /// Cancels any running timer and starts a new one for `generation`.
    pub fn reset(&mut self, generation: u64) {
        self.cancel();
        let delay = self.delay;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Debounce generation {} elapsed", generation);
            if tx.send(Action::DebounceFired(generation)).is_err() {
                warn!("Failed to send DebounceFired: receiver dropped");
            }
        });
        self.pending = Some(handle.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_reset_fires() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.reset(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.reset(2);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.reset(3);
        tokio::time::sleep(Duration::from_millis(400)).await;

        let fired: Vec<Action> = rx.try_iter().collect();
        assert_eq!(fired, vec![Action::DebounceFired(3)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.reset(1);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(rx.try_recv().is_err());
    }
}
