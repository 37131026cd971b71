//! Per-target outcome records collected for the run summary.

/// Outcome of one target in a multi-target command.
#[derive(Debug, Clone)]
pub struct TargetEntry {
    /// `group/variant/name` of the target.
    pub name: String,
    /// Final status of the target.
    pub status: TargetStatus,
    /// Optional detail message (e.g. skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The operation was applied.
    Ok,
    /// Nothing to do (e.g. uninstalling a target that is not installed).
    Skipped,
    /// The operation failed; the command carried on with the next target.
    Failed,
}

impl TargetStatus {
    /// Icon and ANSI colour used in the summary.
    #[must_use]
    pub const fn style(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Skipped => ("○", "\x1b[2m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}
