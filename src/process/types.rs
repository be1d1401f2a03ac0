/*!
 * Process Types
 * Commands and reap results shared by the launcher and the scheduler
 */

use crate::core::ExitStatus;
use std::fmt;

/// One command line: a non-empty argument vector, program first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
}

impl Command {
    /// Returns `None` for an empty argument vector
    #[must_use]
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    #[inline]
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    #[inline]
    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Result of a non-blocking reap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapStatus {
    /// The task has terminated and its status was collected (exactly once)
    Exited(ExitStatus),
    /// The task is alive (running or stopped)
    StillRunning,
}
