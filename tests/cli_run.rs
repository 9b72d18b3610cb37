// tests/cli_run.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::{init_tracing, with_timeout};

use std::io::Write;

use tempfile::NamedTempFile;

use autopilot::cli::CliArgs;
use autopilot::errors::AutopilotError;
use autopilot::{key_store_from_config, run};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn args(file: &NamedTempFile, dry_run: bool) -> CliArgs {
    CliArgs {
        config: file.path().to_string_lossy().into_owned(),
        log_level: None,
        dry_run,
    }
}

// An hour per step: if any of these tests started a run, `with_timeout`
// would fail them.
const BLANK_GEMINI_KEY: &str = r#"
[keys]
required = ["gemini", "reddit"]

[keys.values]
gemini = "   "
reddit = "someone"

[workflow]
name = "reddit-comment"
step_delay = "1h"
"#;

#[tokio::test]
async fn blank_required_key_refuses_to_run() {
    init_tracing();
    let file = write_config(BLANK_GEMINI_KEY);

    let err = with_timeout(run(args(&file, false))).await.unwrap_err();

    match err.downcast_ref::<AutopilotError>() {
        Some(AutopilotError::MissingKeys(missing)) => assert_eq!(missing, &vec!["gemini"]),
        other => panic!("expected MissingKeys, got {other:?}"),
    }
    assert!(err.to_string().contains("gemini"), "{err}");
}

#[tokio::test]
async fn dry_run_returns_without_starting_a_run() {
    init_tracing();
    let file = write_config(BLANK_GEMINI_KEY);

    with_timeout(run(args(&file, true))).await.unwrap();
}

#[tokio::test]
async fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let cli = CliArgs {
        config: dir.path().join("absent.toml").to_string_lossy().into_owned(),
        log_level: None,
        dry_run: true,
    };

    let err = run(cli).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AutopilotError>(),
        Some(AutopilotError::IoError(_))
    ));
}

#[tokio::test]
async fn configured_workflow_runs_to_completion() {
    init_tracing();
    let file = write_config(
        r#"
[controller]
on_busy = "reject"

[keys]
required = ["gemini"]

[keys.values]
gemini = "g-key"

[workflow]
name = "reddit-comment"
steps = 2
step_delay = "10ms"
prompt = "reply"

[prompts.reddit-comment.reply]
template = "Reply {step}/{total}"
"#,
    );

    with_timeout(run(args(&file, false))).await.unwrap();
}

#[test]
fn key_store_is_seeded_from_config_values() {
    let cfg = ConfigFileBuilder::new()
        .with_key("gemini", "g-key")
        .with_key("reddit", "")
        .require_key("gemini")
        .build();

    let keys = key_store_from_config(&cfg);

    assert_eq!(keys.get("gemini"), "g-key");
    assert_eq!(keys.get("reddit"), "");
    assert_eq!(keys.names(), vec!["gemini", "reddit"]);
    assert!(keys.validate(&cfg.keys.required));
    assert_eq!(keys.missing(&["gemini", "reddit"]), vec!["reddit"]);
}
