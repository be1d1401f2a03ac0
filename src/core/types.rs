/*!
 * Core Types
 * Common types used across the scheduler
 */

use serde::Serialize;
use std::fmt;

/// Task identifier (the OS pid for real child processes)
pub type TaskId = u32;

/// How a task ended once it has been reaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExitStatus {
    /// Exited normally with this status code
    Code(i32),
    /// Killed by this signal number
    Signaled(i32),
}

impl ExitStatus {
    /// True only for a normal exit with code 0
    #[inline]
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, ExitStatus::Code(0))
    }

    #[inline]
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Code(code) => Some(*code),
            ExitStatus::Signaled(_) => None,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Code(code) => write!(f, "exit code {}", code),
            ExitStatus::Signaled(signal) => write!(f, "killed by signal {}", signal),
        }
    }
}
