use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use autopilot::workflow::{StepBackend, StepSpec};

/// A fake step backend that:
/// - records which step indices were run, and the prompt each one got
/// - optionally sleeps per step (use with paused tokio time)
/// - optionally fails at a given step index.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    executed: Arc<Mutex<Vec<usize>>>,
    prompts: Arc<Mutex<Vec<Option<String>>>>,
    delay: Option<Duration>,
    fail_at: Option<usize>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Indices of steps that were started, in order.
    pub fn executed(&self) -> Vec<usize> {
        self.executed.lock().unwrap().clone()
    }

    /// Rendered prompts handed to each started step, in order.
    pub fn prompts(&self) -> Vec<Option<String>> {
        self.prompts.lock().unwrap().clone()
    }
}

impl StepBackend for ScriptedBackend {
    fn run_step<'a>(
        &'a self,
        step: &'a StepSpec,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(step.index);
            self.prompts.lock().unwrap().push(step.prompt.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail_at == Some(step.index) {
                return Err(anyhow!("scripted failure at step {}", step.label()));
            }
            Ok(())
        })
    }
}
