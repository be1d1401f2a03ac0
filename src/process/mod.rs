/*!
 * Process Module
 * Commands, the task capability, and OS-level process launching and control
 */

pub mod child;
pub mod launcher;
pub mod task;
pub mod types;

pub use child::ChildProcess;
pub use launcher::ProcessLauncher;
pub use task::Task;
pub use types::{Command, ReapStatus};
