// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutopilotError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// `start` was refused because a run is in flight and the controller
    /// uses [`AdmissionPolicy::Reject`](crate::types::AdmissionPolicy::Reject).
    #[error("automation already running (run {0})")]
    Busy(u64),

    #[error("no tokio runtime available to spawn the automation task")]
    NoRuntime,

    #[error("missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AutopilotError>;
