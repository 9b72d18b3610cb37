// src/lib.rs

pub mod activity;
pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod keys;
pub mod logging;
pub mod prompts;
pub mod types;
pub mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{error, info, warn};

use crate::activity::ActivityLog;
use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::controller::{AutomationController, RunOutcome};
use crate::errors::AutopilotError;
use crate::keys::KeyStore;
use crate::prompts::PromptStore;
use crate::workflow::{DelayBackend, run_workflow};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - key store population + validation
/// - the prompt store seeded from `[prompts]`
/// - the automation controller and activity log
/// - the workflow run
/// - Ctrl-C handling (mapped to `controller.stop()`)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let keys = key_store_from_config(&cfg);
    let missing = keys.missing(&cfg.keys.required);
    if !missing.is_empty() {
        return Err(AutopilotError::MissingKeys(missing).into());
    }

    let prompts = prompt_store_from_config(&cfg);
    let log = ActivityLog::new();
    let controller = AutomationController::builder()
        .policy(cfg.controller.on_busy)
        .on_failure(|run_id, err| {
            error!(run_id, error = %format!("{err:#}"), "automation run failed");
        })
        .build();

    let backend = Arc::new(DelayBackend::new(cfg.workflow.step_delay));
    let spec = cfg.workflow.clone();
    let handle = {
        let log = log.clone();
        controller.start_with(move |ctx| async move {
            run_workflow(&ctx, backend.as_ref(), &spec, &prompts, &log)
                .await
                .map(|_steps| ())
        })?
    };

    // Ctrl-C only flips the flag; the workflow notices before its next step.
    {
        let controller = controller.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            warn!("Ctrl+C received; stopping automation after the current step");
            controller.stop();
        });
    }

    let run_id = handle.id();
    let outcome = handle.wait().await;
    info!(run_id, ?outcome, "automation run ended");

    print_activity(&log);

    match outcome {
        RunOutcome::Succeeded => Ok(()),
        RunOutcome::Failed(msg) => Err(anyhow!("run {run_id} failed: {msg}")),
        RunOutcome::Panicked => Err(anyhow!("run {run_id} panicked")),
        RunOutcome::Aborted => Err(anyhow!("run {run_id} was aborted")),
    }
}

/// Build a key store holding every `[keys.values]` entry.
pub fn key_store_from_config(cfg: &ConfigFile) -> KeyStore {
    let store = KeyStore::new();
    for (name, value) in cfg.keys.values.iter() {
        store.set(name.as_str(), value.as_str());
    }
    store
}

/// Build a prompt store whose defaults are the configured templates.
pub fn prompt_store_from_config(cfg: &ConfigFile) -> PromptStore {
    PromptStore::with_defaults(cfg.prompts.iter().cloned())
}

fn print_activity(log: &ActivityLog) {
    for entry in log.entries() {
        println!(
            "[{}] {:<10} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.kind,
            entry.message
        );
    }
}

/// Print the parsed config with key values redacted.
fn print_dry_run(cfg: &ConfigFile) {
    println!("autopilot dry-run");
    println!("  controller.on_busy = {:?}", cfg.controller.on_busy);
    println!();

    println!("keys ({}):", cfg.keys.values.len());
    for (name, value) in cfg.keys.values.iter() {
        let state = if value.trim().is_empty() { "<empty>" } else { "<set>" };
        println!("  - {name}: {state}");
    }
    if !cfg.keys.required.is_empty() {
        println!("  required: {:?}", cfg.keys.required);
    }
    println!();

    println!("workflow:");
    println!("  name: {}", cfg.workflow.name);
    println!("  steps: {}", cfg.workflow.steps);
    println!("  step_delay: {:?}", cfg.workflow.step_delay);
    if let Some(prompt) = cfg.workflow.prompt.as_deref() {
        println!("  prompt: {prompt}");
    }

    if !cfg.prompts.is_empty() {
        println!();
        println!("prompts ({}):", cfg.prompts.len());
        for (automation, prompt) in cfg.prompts.iter() {
            println!("  - {automation}/{}: {}", prompt.id, prompt.name);
            let vars = prompt.variables();
            if !vars.is_empty() {
                println!("      variables: {}", vars.join(", "));
            }
        }
    }
}
