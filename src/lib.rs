/*!
 * User-Space Process Scheduler
 *
 * Preemptive round-robin scheduling of real OS processes: each command is
 * launched suspended, then granted a fixed quantum in turn until every
 * process has exited.
 */

pub mod config;
pub mod core;
pub mod input;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod session;
pub mod signals;

// Re-exports
pub use config::{CliArgs, InputPath, SchedulerConfig};
pub use crate::core::{ExitStatus, TaskId, UspsError, UspsResult};
pub use monitoring::init_tracing;
pub use process::{ChildProcess, Command, ProcessLauncher, ReapStatus, Task};
pub use scheduler::{Observer, PcbSnapshot, RunSummary, Scheduler};
pub use signals::{ChildWatcher, SignalCoordinator};
