// src/workflow/backend.rs

//! Pluggable step execution.
//!
//! The runner talks to a `StepBackend` rather than to any remote service
//! directly, so tests can script step timing and failures.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use super::StepSpec;

/// Executes a single workflow step.
pub trait StepBackend: Send + Sync {
    fn run_step<'a>(
        &'a self,
        step: &'a StepSpec,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;
}

/// Backend standing in for a remote call: every step just takes `delay`.
#[derive(Debug, Clone)]
pub struct DelayBackend {
    delay: Duration,
}

impl DelayBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl StepBackend for DelayBackend {
    fn run_step<'a>(
        &'a self,
        step: &'a StepSpec,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                workflow = %step.workflow,
                step = %step.label(),
                delay_ms = self.delay.as_millis() as u64,
                prompt = step.prompt.as_deref(),
                "running step"
            );
            tokio::time::sleep(self.delay).await;
            Ok(())
        })
    }
}
