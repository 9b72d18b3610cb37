// src/controller/state.rs

//! The shared "automation running" flag.
//!
//! Reads are immediate (no waiting on a render cycle or an executor tick),
//! and every actual change is broadcast to subscribers so a UI layer can
//! re-render without polling.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::RunId;

#[derive(Debug)]
pub(crate) struct RunningFlag {
    tx: watch::Sender<bool>,
}

impl RunningFlag {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub(crate) fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Write the flag. Subscribers are only woken when the value changes.
    pub(crate) fn set(&self, value: bool) {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Set the flag only if it is currently clear.
    ///
    /// On success a new run id is reserved from `last_id`; otherwise the id
    /// of the run holding the flag is returned. Both happen under the
    /// channel lock, so a refused caller always sees the winner's id.
    pub(crate) fn try_acquire(&self, last_id: &AtomicU64) -> Result<RunId, RunId> {
        let mut outcome = Err(0);
        self.tx.send_if_modified(|running| {
            if *running {
                outcome = Err(last_id.load(Ordering::SeqCst));
                false
            } else {
                *running = true;
                outcome = Ok(last_id.fetch_add(1, Ordering::SeqCst) + 1);
                true
            }
        });
        outcome
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
