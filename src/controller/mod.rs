// src/controller/mod.rs

//! Automation lifecycle controller.
//!
//! - [`state`] holds the shared flag and its change notifications.
//! - [`stop`] provides the cooperative [`StopToken`].
//! - [`handle`] defines [`RunHandle`] and [`RunOutcome`].
//! - [`controller`] implements [`AutomationController`] itself.

/// Identifier assigned to each accepted run, starting at 1.
pub type RunId = u64;

#[allow(clippy::module_inception)]
pub mod controller;
pub mod handle;
pub(crate) mod state;
pub mod stop;

pub use controller::{AutomationController, ControllerBuilder, FailureHook, RunContext};
pub use handle::{RunHandle, RunOutcome};
pub use stop::StopToken;
