//! Instruction and program completion status.

use std::fmt;

/// Lifecycle of one lowered instruction, or of a whole program run.
///
/// ```text
///   NotStarted ──→ Running ──→ Done | Error | Timeout | Interrupted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrStatus {
    NotStarted,
    Running,
    Done,
    Error,
    Timeout,
    Interrupted,
}

impl InstrStatus {
    pub fn is_done(self) -> bool {
        self == InstrStatus::Done
    }

    /// Whether no further transition is possible.
    pub fn is_final(self) -> bool {
        !matches!(self, InstrStatus::NotStarted | InstrStatus::Running)
    }
}

impl fmt::Display for InstrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstrStatus::NotStarted => "NOT_STARTED",
            InstrStatus::Running => "RUNNING",
            InstrStatus::Done => "DONE",
            InstrStatus::Error => "ERROR",
            InstrStatus::Timeout => "TIMEOUT",
            InstrStatus::Interrupted => "INTERRUPTED",
        };
        f.write_str(s)
    }
}
