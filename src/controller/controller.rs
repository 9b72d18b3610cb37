// src/controller/controller.rs

//! Single-flag automation supervisor.
//!
//! State machine (two states):
//!
//! - `Idle --start--> Running`
//! - `Running --run finishes (any outcome)--> Idle`
//! - `Running --stop--> Idle` (the run keeps going in the background)
//! - `Idle --stop--> Idle`
//!
//! The flag is the only shared state. Runs are not tracked by identity, so
//! under [`AdmissionPolicy::Allow`] any finishing run resets the flag even if
//! a newer run is still in flight.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::debug;

use crate::errors::{AutopilotError, Result};
use crate::types::AdmissionPolicy;

use super::handle::{RunHandle, RunOutcome};
use super::state::RunningFlag;
use super::stop::{StopSignal, StopToken};
use super::RunId;

/// Callback receiving errors that the controller otherwise swallows.
pub type FailureHook = Arc<dyn Fn(RunId, &anyhow::Error) + Send + Sync>;

struct Inner {
    flag: RunningFlag,
    stop: StopSignal,
    last_id: AtomicU64,
    policy: AdmissionPolicy,
    on_failure: Option<FailureHook>,
}

/// Supervises fire-and-forget automation runs behind one "running" flag.
///
/// Cloning is cheap; all clones share the same flag.
#[derive(Clone)]
pub struct AutomationController {
    inner: Arc<Inner>,
}

impl fmt::Debug for AutomationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomationController")
            .field("running", &self.is_running())
            .field("policy", &self.inner.policy)
            .field("last_run", &self.inner.last_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for AutomationController {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationController {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_policy(policy: AdmissionPolicy) -> Self {
        Self::builder().policy(policy).build()
    }

    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.inner.policy
    }

    /// Current value of the flag.
    pub fn is_running(&self) -> bool {
        self.inner.flag.get()
    }

    /// Receiver that is notified whenever the flag actually changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.flag.subscribe()
    }

    /// Start a run for a zero-argument task.
    ///
    /// See [`start_with`](Self::start_with).
    pub fn start<F>(&self, task: F) -> Result<RunHandle>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.start_with(move |_ctx| task)
    }

    /// Start a run, handing the task a [`RunContext`] it can poll between
    /// steps.
    ///
    /// The flag is set before `task` is even called, so it is visible to the
    /// caller as soon as this returns. The run executes on the current tokio
    /// runtime; when it ends the flag is reset exactly once and any error is
    /// delivered only to the failure hook and the returned [`RunHandle`].
    pub fn start_with<T, F>(&self, task: T) -> Result<RunHandle>
    where
        T: FnOnce(RunContext) -> F,
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| AutopilotError::NoRuntime)?;

        let id = match self.inner.policy {
            AdmissionPolicy::Allow => {
                self.inner.flag.set(true);
                self.inner.last_id.fetch_add(1, Ordering::SeqCst) + 1
            }
            AdmissionPolicy::Reject => match self.inner.flag.try_acquire(&self.inner.last_id) {
                Ok(id) => id,
                Err(current) => {
                    debug!(run_id = current, "start rejected; automation already running");
                    return Err(AutopilotError::Busy(current));
                }
            },
        };

        let ctx = RunContext {
            id,
            controller: self.clone(),
            stop: self.inner.stop.token(),
        };
        debug!(run_id = id, "automation run started");

        let work = task(ctx);
        let inner = Arc::clone(&self.inner);
        // Created outside the supervisor future so the flag is cleared even
        // if the runtime drops that future before its first poll.
        let reset = ResetOnDrop {
            inner: Arc::clone(&self.inner),
            id,
        };

        let join = runtime.spawn(async move {
            // Run the task in its own tokio task so a panic surfaces as a
            // JoinError here instead of unwinding through the supervisor.
            let (outcome, error) = match tokio::spawn(work).await {
                Ok(Ok(())) => (RunOutcome::Succeeded, None),
                Ok(Err(err)) => (RunOutcome::Failed(format!("{err:#}")), Some(err)),
                Err(join_err) if join_err.is_panic() => (
                    RunOutcome::Panicked,
                    Some(anyhow!("automation task panicked")),
                ),
                Err(_) => (
                    RunOutcome::Aborted,
                    Some(anyhow!("automation task was cancelled by the runtime")),
                ),
            };

            drop(reset);
            debug!(
                run_id = id,
                success = outcome.is_success(),
                "automation run finished"
            );

            if let (Some(hook), Some(err)) = (inner.on_failure.as_ref(), error.as_ref()) {
                hook(id, err);
            }

            outcome
        });

        Ok(RunHandle::new(id, join))
    }

    /// Mark the automation as stopped.
    ///
    /// Does not cancel anything: in-flight runs keep executing and will
    /// reset the flag again when they finish. Their [`StopToken`]s report
    /// the request so they can exit cooperatively.
    pub fn stop(&self) {
        let was_running = self.is_running();
        self.inner.flag.set(false);
        self.inner.stop.request();
        debug!(was_running, "automation stop requested");
    }
}

/// Clears the flag when a run's supervisor future goes away, whether it
/// completed or was dropped by a shutting-down runtime.
struct ResetOnDrop {
    inner: Arc<Inner>,
    id: RunId,
}

impl Drop for ResetOnDrop {
    fn drop(&mut self) {
        self.inner.flag.set(false);
        debug!(run_id = self.id, "automation flag cleared");
    }
}

/// Builder for [`AutomationController`].
#[derive(Default)]
pub struct ControllerBuilder {
    policy: AdmissionPolicy,
    on_failure: Option<FailureHook>,
}

impl ControllerBuilder {
    pub fn policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register a callback for run failures (errors, panics, aborts).
    ///
    /// Without a hook failures are dropped once the flag has been reset.
    pub fn on_failure<H>(mut self, hook: H) -> Self
    where
        H: Fn(RunId, &anyhow::Error) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> AutomationController {
        AutomationController {
            inner: Arc::new(Inner {
                flag: RunningFlag::new(),
                stop: StopSignal::new(),
                last_id: AtomicU64::new(0),
                policy: self.policy,
                on_failure: self.on_failure,
            }),
        }
    }
}

/// Per-run view handed to a task started with
/// [`AutomationController::start_with`].
#[derive(Debug, Clone)]
pub struct RunContext {
    id: RunId,
    controller: AutomationController,
    stop: StopToken,
}

impl RunContext {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// The controller's flag, exactly as `AutomationController::is_running`.
    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn stop_token(&self) -> &StopToken {
        &self.stop
    }

    /// Whether a multi-step task should go on with its next step.
    ///
    /// False once the flag has dropped or a stop was requested after this
    /// run started.
    pub fn should_continue(&self) -> bool {
        self.is_running() && !self.stop.is_stop_requested()
    }
}
