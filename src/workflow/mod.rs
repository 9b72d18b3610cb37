// src/workflow/mod.rs

//! Multi-step automation workflows run under the controller.
//!
//! - [`backend`] provides the `StepBackend` trait and the production
//!   `DelayBackend`; tests plug in their own backend.
//! - [`runner`] drives the steps in order and checks the controller flag
//!   between them, which is how a run notices `stop`. Each step gets the
//!   workflow's prompt rendered with `{workflow}`, `{run}`, `{step}` and
//!   `{total}`.

use std::time::Duration;

pub mod backend;
pub mod runner;

pub use backend::{DelayBackend, StepBackend};
pub use runner::run_workflow;

/// What to run: a named workflow of `steps` sequential steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSpec {
    pub name: String,
    pub steps: usize,
    /// Simulated latency of each step for [`DelayBackend`].
    pub step_delay: Duration,
    /// Prompt id, looked up under this workflow's name in the prompt store.
    pub prompt: Option<String>,
}

/// One step handed to a [`StepBackend`]. `index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    pub workflow: String,
    pub index: usize,
    pub total: usize,
    /// The workflow's prompt rendered for this step, if it has one.
    pub prompt: Option<String>,
}

impl StepSpec {
    /// `"3/5"`-style label.
    pub fn label(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }
}
