/*!
 * Task Capability
 *
 * The schedulable unit as seen by the scheduler: something that can be
 * resumed, paused and reaped without blocking. Real OS processes implement
 * it through signals and `waitpid`; tests use scripted in-memory tasks.
 * Any implementation must keep at most one task executing at a time when
 * driven by the scheduler, which only resumes a task after pausing or
 * reaping the previous one.
 */

use super::types::ReapStatus;
use crate::core::{ControlError, TaskId};

pub trait Task {
    /// Stable identifier (the OS pid for child processes)
    fn id(&self) -> TaskId;

    /// Let the task execute
    fn resume(&mut self) -> Result<(), ControlError>;

    /// Stop the task from executing until the next `resume`
    fn pause(&mut self) -> Result<(), ControlError>;

    /// Collect the exit status if the task has terminated, without blocking.
    ///
    /// Returns `Exited` at most once per task; afterwards the task is released
    /// and further control operations fail with `ControlError::AlreadyReaped`.
    fn try_reap(&mut self) -> Result<ReapStatus, ControlError>;

    /// Forcibly end the task and release it. Succeeds if already reaped.
    fn terminate(&mut self) -> Result<(), ControlError>;
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn id(&self) -> TaskId {
        (**self).id()
    }

    fn resume(&mut self) -> Result<(), ControlError> {
        (**self).resume()
    }

    fn pause(&mut self) -> Result<(), ControlError> {
        (**self).pause()
    }

    fn try_reap(&mut self) -> Result<ReapStatus, ControlError> {
        (**self).try_reap()
    }

    fn terminate(&mut self) -> Result<(), ControlError> {
        (**self).terminate()
    }
}
