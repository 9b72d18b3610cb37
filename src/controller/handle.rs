// src/controller/handle.rs

use tokio::task::JoinHandle;

use super::RunId;

/// How a supervised run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    /// The task returned an error; the payload is the rendered error chain.
    Failed(String),
    Panicked,
    /// The runtime shut down before the run could finish. The flag is
    /// cleared all the same.
    Aborted,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }
}

/// Optional observer for a run started with `AutomationController::start`.
///
/// Dropping the handle detaches from the run without affecting it, so
/// callers that only care about the running flag can ignore it entirely.
#[derive(Debug)]
pub struct RunHandle {
    id: RunId,
    join: JoinHandle<RunOutcome>,
}

impl RunHandle {
    pub(crate) fn new(id: RunId, join: JoinHandle<RunOutcome>) -> Self {
        Self { id, join }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    /// True once the run has finished and the flag reset has happened.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to end and return its outcome.
    pub async fn wait(self) -> RunOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(_) => RunOutcome::Aborted,
        }
    }
}
