use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Behaviour when `start` is called while a run is already in flight.
///
/// - `Allow`: start another run anyway. There is no run identity tracking,
///   so whichever run finishes first resets the shared flag (default).
/// - `Reject`: refuse the new run with a busy error and leave the flag as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionPolicy {
    Allow,
    Reject,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        AdmissionPolicy::Allow
    }
}

impl FromStr for AdmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(AdmissionPolicy::Allow),
            "reject" => Ok(AdmissionPolicy::Reject),
            other => Err(format!(
                "invalid on_busy policy: {other} (expected \"allow\" or \"reject\")"
            )),
        }
    }
}

/// Kind of an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Error,
    /// A step is waiting on a remote generation call.
    Generating,
}

impl Default for LogKind {
    fn default() -> Self {
        LogKind::Info
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Error => "error",
            LogKind::Generating => "generating",
        };
        f.pad(s)
    }
}
