// tests/controller_lifecycle.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::time::Duration;

use anyhow::bail;
use tokio::time::sleep;

use autopilot::controller::{AutomationController, RunOutcome};

async fn succeed_after(delay: Duration) -> anyhow::Result<()> {
    sleep(delay).await;
    Ok(())
}

async fn fail_after(delay: Duration) -> anyhow::Result<()> {
    sleep(delay).await;
    bail!("remote API returned 500")
}

async fn explode() -> anyhow::Result<()> {
    panic!("task blew up")
}

#[test]
fn fresh_controller_is_idle() {
    let controller = AutomationController::new();
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn start_sets_flag_before_task_runs() {
    init_tracing();
    let controller = AutomationController::new();

    let handle = controller
        .start(succeed_after(Duration::from_millis(100)))
        .unwrap();

    // Current-thread runtime: the task has not been polled yet.
    assert!(controller.is_running());
    assert!(!handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn completion_resets_flag_only_after_task_finishes() {
    init_tracing();
    let controller = AutomationController::new();

    let handle = controller
        .start(succeed_after(Duration::from_millis(100)))
        .unwrap();

    sleep(Duration::from_millis(50)).await;
    assert!(controller.is_running(), "flag dropped before task finished");

    sleep(Duration::from_millis(100)).await;
    assert!(!controller.is_running());
    assert!(handle.is_finished());
    assert_eq!(handle.wait().await, RunOutcome::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn failure_resets_flag_and_is_not_rethrown() {
    init_tracing();
    let controller = AutomationController::new();

    // `start` itself succeeds; the failure only shows up on the handle.
    let handle = controller
        .start(fail_after(Duration::from_millis(10)))
        .expect("start must not surface task failures");
    assert!(controller.is_running());

    let outcome = with_timeout(handle.wait()).await;
    assert_eq!(outcome, RunOutcome::Failed("remote API returned 500".to_string()));
    assert!(!controller.is_running());
}

#[tokio::test]
async fn panic_resets_flag() {
    init_tracing();
    let controller = AutomationController::new();

    let handle = controller.start(explode()).unwrap();
    let outcome = with_timeout(handle.wait()).await;

    assert_eq!(outcome, RunOutcome::Panicked);
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn stop_is_immediate_but_task_keeps_running() {
    init_tracing();
    let controller = AutomationController::new();

    let handle = controller
        .start(succeed_after(Duration::from_millis(100)))
        .unwrap();
    sleep(Duration::from_millis(10)).await;

    controller.stop();
    assert!(!controller.is_running());
    assert!(!handle.is_finished(), "stop must not cancel the task");

    assert_eq!(handle.wait().await, RunOutcome::Succeeded);
    assert!(!controller.is_running());
}

#[test]
fn stop_while_idle_is_a_no_op() {
    let controller = AutomationController::new();
    controller.stop();
    controller.stop();
    assert!(!controller.is_running());
}

/// No run identity tracking: the first run to finish clears the shared flag
/// even though another run is still in flight.
#[tokio::test(start_paused = true)]
async fn double_start_first_completion_clears_flag() {
    init_tracing();
    let controller = AutomationController::new();

    let long = controller
        .start(succeed_after(Duration::from_millis(200)))
        .unwrap();
    let short = controller
        .start(succeed_after(Duration::from_millis(50)))
        .unwrap();
    assert_ne!(long.id(), short.id());
    assert!(controller.is_running());

    sleep(Duration::from_millis(100)).await;
    assert!(short.is_finished());
    assert!(!long.is_finished());
    assert!(!controller.is_running(), "short run resets the shared flag");

    sleep(Duration::from_millis(150)).await;
    assert!(long.is_finished());
    assert!(!controller.is_running());
}

/// Stop, then start again: the old run finishing clears the flag of the
/// new one.
#[tokio::test(start_paused = true)]
async fn stale_completion_after_restart_clears_flag() {
    init_tracing();
    let controller = AutomationController::new();

    let old = controller
        .start(succeed_after(Duration::from_millis(50)))
        .unwrap();
    controller.stop();

    let new = controller
        .start(succeed_after(Duration::from_millis(500)))
        .unwrap();
    assert!(controller.is_running());

    assert_eq!(old.wait().await, RunOutcome::Succeeded);
    assert!(!new.is_finished());
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn clones_share_the_same_flag() {
    let controller = AutomationController::new();
    let view = controller.clone();

    let handle = controller
        .start(succeed_after(Duration::from_millis(10)))
        .unwrap();
    assert!(view.is_running());

    view.stop();
    assert!(!controller.is_running());
    handle.wait().await;
}

#[test]
fn runtime_shutdown_mid_run_clears_flag() {
    init_tracing();
    let controller = AutomationController::new();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    rt.block_on(async {
        let _handle = controller
            .start(succeed_after(Duration::from_secs(3600)))
            .unwrap();
        tokio::task::yield_now().await;
        assert!(controller.is_running());
    });
    assert!(controller.is_running(), "run outlives block_on");

    drop(rt);
    assert!(!controller.is_running());
}

#[test]
fn runtime_shutdown_before_first_poll_clears_flag() {
    let controller = AutomationController::new();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    {
        let _guard = rt.enter();
        controller
            .start(succeed_after(Duration::from_secs(3600)))
            .unwrap();
    }
    assert!(controller.is_running());

    drop(rt);
    assert!(!controller.is_running());
}
