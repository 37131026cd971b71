//! Command-facing logger with per-target outcome collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{STAGE_TARGET, SUCCESS_TARGET};
use super::types::{TargetEntry, TargetStatus};
use super::utils::log_file_path;

/// Structured logger used by the commands.
///
/// Messages go through [`tracing`], so they reach both the console and the
/// persistent log file at `$XDG_CACHE_HOME/confs/<command>.log`. Commands
/// that act on several targets record each outcome and print a summary at
/// the end.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TargetEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a section header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log the successful completion of an operation.
    pub fn success(&self, msg: &str) {
        tracing::info!(target: SUCCESS_TARGET, "{msg}");
    }

    /// Log a debug message (console only with `--verbose`; always written to
    /// the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record the outcome of one target for the summary.
    pub fn record(&self, name: &str, status: TargetStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(TargetEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// All recorded outcomes, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<TargetEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|e| e.status == TargetStatus::Failed)
                .count()
        })
    }

    /// Print one line per recorded target followed by the totals.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        let (mut ok, mut skipped, mut failed) = (0u32, 0u32, 0u32);
        for entry in &entries {
            match entry.status {
                TargetStatus::Ok => ok += 1,
                TargetStatus::Skipped => skipped += 1,
                TargetStatus::Failed => failed += 1,
            }
            let (icon, color) = entry.status.style();
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", entry.name));
        }

        self.info(&format!(
            "{} targets: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{skipped} skipped\x1b[0m, \x1b[31m{failed} failed\x1b[0m",
            entries.len()
        ));
        if failed > 0
            && let Some(path) = &self.log_file
        {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}
