/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * Fatal classes (configuration, input, launch, signal setup) abort the run.
 * `ControlError` is recovered per task inside the scheduler and never escapes it.
 */

use super::types::TaskId;
use miette::Diagnostic;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Where a quantum value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantumOrigin {
    /// `-q` / `--quantum` on the command line
    Override,
    /// The `USPS_QUANTUM_MSEC` environment variable
    Environment,
}

impl fmt::Display for QuantumOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantumOrigin::Override => write!(f, "command line"),
            QuantumOrigin::Environment => write!(f, "environment"),
        }
    }
}

/// Configuration errors, reported before any process is launched
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("No time quantum given")]
    #[diagnostic(
        code(config::missing_quantum),
        help("Pass -q <msec> or set USPS_QUANTUM_MSEC to a positive number of milliseconds.")
    )]
    MissingQuantum,

    #[error("Invalid quantum {value:?} from {origin}: {reason}")]
    #[diagnostic(
        code(config::invalid_quantum),
        help("The quantum must be a positive whole number of milliseconds.")
    )]
    InvalidQuantum {
        value: String,
        origin: QuantumOrigin,
        reason: String,
    },

    #[error("Unknown option: {0}")]
    #[diagnostic(code(config::unknown_option), help("Usage: usps [-q <msec>] [--summary] [FILE]"))]
    UnknownOption(String),

    #[error("Option {0} requires a value")]
    #[diagnostic(code(config::missing_value), help("Usage: usps [-q <msec>] [--summary] [FILE]"))]
    MissingValue(String),

    #[error("Unexpected extra argument: {0}")]
    #[diagnostic(
        code(config::unexpected_argument),
        help("Only one command file may be given; omit it to read from stdin.")
    )]
    UnexpectedArgument(String),
}

/// Command input errors
#[derive(Error, Debug, Diagnostic)]
pub enum InputError {
    #[error("Cannot open command file {}: {cause}", path.display())]
    #[diagnostic(
        code(input::open_failed),
        help("Check that the file exists and is readable.")
    )]
    Open {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("Failed to read commands: {0}")]
    #[diagnostic(code(input::read_failed))]
    Read(#[source] io::Error),
}

/// Process creation errors (fatal for the whole run)
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LaunchError {
    #[error("Argument {0:?} contains a NUL byte")]
    #[diagnostic(
        code(launch::nul_byte),
        help("Command lines are passed to exec verbatim and cannot contain NUL bytes.")
    )]
    NulByte(String),

    #[error("Failed to create process for '{command}': {errno}")]
    #[diagnostic(
        code(launch::fork_failed),
        help("The system may be out of process slots or memory.")
    )]
    Fork { command: String, errno: Errno },

    #[error("Process {pid} for '{command}' never reached the suspended state: {detail}")]
    #[diagnostic(code(launch::not_suspended))]
    NotSuspended {
        pid: TaskId,
        command: String,
        detail: String,
    },
}

/// Control operation that failed on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOp {
    Resume,
    Pause,
    Reap,
    Terminate,
}

impl fmt::Display for ControlOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlOp::Resume => write!(f, "resume"),
            ControlOp::Pause => write!(f, "pause"),
            ControlOp::Reap => write!(f, "reap"),
            ControlOp::Terminate => write!(f, "terminate"),
        }
    }
}

/// Resume/pause/reap failures on a task the scheduler believed alive
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ControlError {
    #[error("Failed to {op} task {id}: {errno}")]
    #[diagnostic(code(control::os_failure))]
    Os { id: TaskId, op: ControlOp, errno: Errno },

    #[error("Task {0} has already been reaped")]
    #[diagnostic(code(control::already_reaped))]
    AlreadyReaped(TaskId),
}

impl ControlError {
    #[inline]
    #[must_use]
    pub fn os(id: TaskId, op: ControlOp, errno: Errno) -> Self {
        ControlError::Os { id, op, errno }
    }
}

/// Signal coordination setup errors
#[derive(Error, Debug, Diagnostic)]
pub enum SignalError {
    #[error("Failed to build the signal runtime: {0}")]
    #[diagnostic(code(signal::runtime))]
    Runtime(#[source] io::Error),

    #[error("Failed to listen for {signal}: {cause}")]
    #[diagnostic(
        code(signal::register_failed),
        help("Without child-exit notifications the quantum timer cannot be armed safely.")
    )]
    Register {
        signal: Signal,
        #[source]
        cause: io::Error,
    },

    #[error("Failed to spawn the signal watcher thread: {0}")]
    #[diagnostic(code(signal::thread))]
    Thread(#[source] io::Error),
}

/// Errors that end a scheduling run early
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchedulerError {
    #[error("Scheduling interrupted by {0}")]
    #[diagnostic(
        code(scheduler::interrupted),
        help("All remaining processes were terminated.")
    )]
    Interrupted(Signal),
}

/// Unified error type for a whole run
#[derive(Error, Debug, Diagnostic)]
pub enum UspsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Common result type for fallible operations of a run
pub type UspsResult<T> = Result<T, UspsError>;
