// src/exec/signal.rs

//! Single-fire completion signals between workers.
//!
//! Each task owns one [`CompletionSignal`]; every dependent holds a
//! [`DoneListener`] for it. Firing wakes all listeners at once. Dropping the
//! signal without firing (failed work, panicking worker) closes the channel,
//! which listeners observe as "will never complete".

use tokio::sync::watch;

/// Sending half, owned by the task that completes.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<bool>,
}

/// Receiving half, cloned once per dependent.
#[derive(Debug, Clone)]
pub struct DoneListener {
    rx: watch::Receiver<bool>,
}

impl CompletionSignal {
    pub fn new() -> (Self, DoneListener) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, DoneListener { rx })
    }

    /// Mark the task as done. Consumes the signal so it fires at most once.
    pub fn fire(self) {
        self.tx.send_replace(true);
    }
}

impl DoneListener {
    /// A listener whose task will never complete.
    pub fn closed() -> Self {
        let (_signal, listener) = CompletionSignal::new();
        listener
    }

    /// Wait until the task completes.
    ///
    /// Returns `true` once the signal fired, `false` if it was dropped
    /// without firing.
    pub async fn wait(&mut self) -> bool {
        self.rx.wait_for(|done| *done).await.map(|_| ()).is_ok()
    }
}
