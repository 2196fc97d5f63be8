//! Status log and loading indicator.
//!
//! The status log is the user-facing record of everything the dashboard
//! did in this session. Each entry is also mirrored to `tracing` under the
//! `status` target, which the default filter leaves off; `RUST_LOG=status=info`
//! brings the same events into diagnostic output.
//!
//! The loading indicator is a plain visible/hidden flag. Showing it hands
//! back a [`LoadingGuard`] that hides it again when dropped, whichever way
//! the request finished.

use crate::utils::clock_time;
use chrono::Local;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

/// Severity of a status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// One line in the status log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Info => write!(f, "[{}] {}", self.time, self.message),
            Severity::Error => write!(f, "[{}] ERROR {}", self.time, self.message),
        }
    }
}

/// Append-only log of status messages for the session.
///
/// Entries are never truncated or rotated. Readers keep a cursor and call
/// [`StatusLog::since`] to follow the tail.
#[derive(Debug, Default)]
pub struct StatusLog {
    entries: Vec<StatusEntry>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(message, Severity::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(message, Severity::Error);
    }

    /// Append a message stamped with the current local time.
    pub fn log(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Info => info!(target: "status", "{message}"),
            Severity::Error => error!(target: "status", "{message}"),
        }
        self.entries.push(StatusEntry {
            time: clock_time(&Local::now()),
            message,
            severity,
        });
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    /// Entries appended at or after `cursor`.
    pub fn since(&self, cursor: usize) -> &[StatusEntry] {
        self.entries.get(cursor..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn last(&self) -> Option<&StatusEntry> {
        self.entries.last()
    }
}

/// Blocking "request in flight" indicator.
///
/// Not reference counted: any guard dropping hides it.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    visible: Arc<AtomicBool>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the indicator until the returned guard is dropped.
    #[must_use = "the indicator hides as soon as the guard is dropped"]
    pub fn show(&self) -> LoadingGuard {
        self.visible.store(true, Ordering::SeqCst);
        tracing::debug!("loading indicator shown");
        LoadingGuard {
            visible: Arc::clone(&self.visible),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// Hides the loading indicator on drop.
#[derive(Debug)]
pub struct LoadingGuard {
    visible: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.visible.store(false, Ordering::SeqCst);
        tracing::debug!("loading indicator hidden");
    }
}
