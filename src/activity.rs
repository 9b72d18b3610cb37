// src/activity.rs

//! Append-only activity log for automation runs.
//!
//! Entries are kept in memory for display and mirrored to `tracing`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::types::LogKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub kind: LogKind,
}

#[derive(Debug, Default)]
struct LogBuffer {
    next_id: u64,
    entries: Vec<LogEntry>,
}

/// Shared activity log handle.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    inner: Arc<Mutex<LogBuffer>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LogBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry and return its id.
    pub fn add(&self, message: impl Into<String>, kind: LogKind) -> u64 {
        let message = message.into();
        match kind {
            LogKind::Error => error!(target: "autopilot::activity", "{message}"),
            LogKind::Generating => debug!(target: "autopilot::activity", "{message}"),
            LogKind::Info | LogKind::Success => {
                info!(target: "autopilot::activity", %kind, "{message}")
            }
        }

        let mut buf = self.lock();
        buf.next_id += 1;
        let id = buf.next_id;
        buf.entries.push(LogEntry {
            id,
            timestamp: Local::now(),
            message,
            kind,
        });
        id
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    /// Drop all entries. Ids keep increasing afterwards.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
