// src/controller/stop.rs

//! Cooperative stop signalling.
//!
//! `AutomationController::stop` never interrupts a running task. Instead it
//! bumps a stop epoch; every [`StopToken`] handed out before that moment
//! observes the bump and the task may wind down at its next convenient
//! point.

use tokio::sync::watch;

#[derive(Debug)]
pub(crate) struct StopSignal {
    tx: watch::Sender<u64>,
}

impl StopSignal {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    pub(crate) fn request(&self) {
        self.tx.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
    }

    /// Token bound to the current epoch.
    pub(crate) fn token(&self) -> StopToken {
        let rx = self.tx.subscribe();
        let epoch = *rx.borrow();
        StopToken { rx, epoch }
    }
}

/// Handle a supervised task can poll (or await) to learn that a stop was
/// requested after it started.
#[derive(Debug, Clone)]
pub struct StopToken {
    rx: watch::Receiver<u64>,
    epoch: u64,
}

impl StopToken {
    pub fn is_stop_requested(&self) -> bool {
        *self.rx.borrow() != self.epoch
    }

    /// Resolves once `stop` has been called on the owning controller.
    ///
    /// Useful inside `tokio::select!` to abandon a long wait early.
    pub async fn stopped(&self) {
        let epoch = self.epoch;
        let mut rx = self.rx.clone();
        let signalled = rx.wait_for(|current| *current != epoch).await.is_ok();
        if !signalled {
            // Controller is gone; nobody can ask us to stop any more.
            std::future::pending::<()>().await;
        }
    }
}
