// src/workflow/runner.rs

use anyhow::anyhow;
use tracing::info;

use crate::activity::ActivityLog;
use crate::controller::RunContext;
use crate::prompts::PromptStore;
use crate::types::LogKind;

use super::{StepBackend, StepSpec, WorkflowSpec};

/// Run every step of `spec` in order on `backend`, recording progress in
/// `log`. Returns the number of steps that completed.
///
/// Before each step the run checks [`RunContext::should_continue`]; once the
/// controller has been stopped the workflow ends early and still counts as a
/// success. A failing step ends the workflow with that step's error, and so
/// does a prompt id that is missing from `prompts`.
pub async fn run_workflow<B>(
    ctx: &RunContext,
    backend: &B,
    spec: &WorkflowSpec,
    prompts: &PromptStore,
    log: &ActivityLog,
) -> anyhow::Result<usize>
where
    B: StepBackend + ?Sized,
{
    log.add(
        format!("{} started ({} steps, run {})", spec.name, spec.steps, ctx.id()),
        LogKind::Info,
    );

    let mut completed = 0;
    for index in 0..spec.steps {
        if !ctx.should_continue() {
            info!(run_id = ctx.id(), completed, "workflow stopped before next step");
            log.add(
                format!(
                    "{} stopped after {} of {} steps",
                    spec.name, completed, spec.steps
                ),
                LogKind::Info,
            );
            return Ok(completed);
        }

        let mut step = StepSpec {
            workflow: spec.name.clone(),
            index,
            total: spec.steps,
            prompt: None,
        };

        log.add(format!("step {} in progress", step.label()), LogKind::Generating);

        let result = match render_prompt(ctx, &step, spec, prompts) {
            Ok(prompt) => {
                step.prompt = prompt;
                backend.run_step(&step).await
            }
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            log.add(
                format!("step {} failed: {err:#}", step.label()),
                LogKind::Error,
            );
            return Err(err.context(format!("{} step {}", spec.name, step.label())));
        }

        completed += 1;
        log.add(format!("step {} done", step.label()), LogKind::Success);
    }

    log.add(
        format!("{} finished ({} steps)", spec.name, completed),
        LogKind::Success,
    );
    Ok(completed)
}

fn render_prompt(
    ctx: &RunContext,
    step: &StepSpec,
    spec: &WorkflowSpec,
    prompts: &PromptStore,
) -> anyhow::Result<Option<String>> {
    let Some(id) = spec.prompt.as_deref() else {
        return Ok(None);
    };

    let run = ctx.id().to_string();
    let number = (step.index + 1).to_string();
    let total = step.total.to_string();
    let vars = [
        ("workflow", spec.name.as_str()),
        ("run", run.as_str()),
        ("step", number.as_str()),
        ("total", total.as_str()),
    ];

    prompts
        .interpolate(&spec.name, id, &vars)
        .map(Some)
        .ok_or_else(|| anyhow!("no prompt '{id}' for {}", spec.name))
}
