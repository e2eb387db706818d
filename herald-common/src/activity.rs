//! Bounded ring of recent dispatcher activity
//!
//! Every component appends here; the reporting endpoint polls
//! [`ActivityLog::snapshot`]. The ring holds at most [`MAX_ENTRIES`]
//! entries and evicts the single oldest entry before an append that would
//! overflow it.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Maximum number of entries retained in the ring.
pub const MAX_ENTRIES: usize = 101;

/// How consequential a log entry is, as rendered by the operator UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Success,
    Error,
}

/// One recorded event.
///
/// Serialized field names match what the operator UI polls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time of the event, `HH:MM:SS`.
    pub time: String,

    /// Human-readable description.
    #[serde(rename = "msg")]
    pub message: String,

    #[serde(rename = "type")]
    pub severity: Severity,

    /// Brand the event belongs to, or `System`.
    #[serde(rename = "brand")]
    pub tenant: String,
}

/// Thread-safe ring buffer of recent [`LogEntry`] values.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl ActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest one first if the ring is full.
    ///
    /// The entry is also emitted as a `tracing` event at the matching
    /// level, so the terminal mirrors what the UI shows.
    pub fn append(&self, severity: Severity, tenant: &str, message: impl Into<String>) {
        let message = message.into();

        match severity {
            Severity::Info | Severity::Success => {
                tracing::info!(tenant = %tenant, "{message}");
            }
            Severity::Warning => tracing::warn!(tenant = %tenant, "{message}"),
            Severity::Error => tracing::error!(tenant = %tenant, "{message}"),
        }

        let entry = LogEntry {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            message,
            severity,
            tenant: tenant.to_string(),
        };

        let mut entries = self.entries.lock();
        if entries.len() >= MAX_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn info(&self, tenant: &str, message: impl Into<String>) {
        self.append(Severity::Info, tenant, message);
    }

    pub fn warning(&self, tenant: &str, message: impl Into<String>) {
        self.append(Severity::Warning, tenant, message);
    }

    pub fn success(&self, tenant: &str, message: impl Into<String>) {
        self.append(Severity::Success, tenant, message);
    }

    pub fn error(&self, tenant: &str, message: impl Into<String>) {
        self.append(Severity::Error, tenant, message);
    }

    /// A copy of the current contents, oldest entry first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
