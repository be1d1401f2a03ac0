/*!
 * Child Process
 *
 * A launched OS process controlled with SIGCONT/SIGSTOP and reaped with
 * `waitpid` on its own pid only, so exit statuses of unrelated children are
 * never consumed. Dropping an unreaped child kills and reaps it.
 */

use super::task::Task;
use super::types::ReapStatus;
use crate::core::{ControlError, ControlOp, ExitStatus, TaskId};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, warn};

/// Handle to one child process, exclusively owned by its PCB
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
    reaped: bool,
}

impl ChildProcess {
    /// Wrap a freshly forked child. The caller must call `await_stop` next.
    pub(super) fn forked(pid: Pid) -> Self {
        Self { pid, reaped: false }
    }

    #[inline]
    #[must_use]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    #[must_use]
    pub fn is_reaped(&self) -> bool {
        self.reaped
    }

    /// Block until the child reports itself stopped (it raises SIGSTOP before exec).
    ///
    /// Returns a description of what happened instead if the child terminated first.
    pub(super) fn await_stop(&mut self) -> Result<(), String> {
        loop {
            match waitpid(self.pid, Some(WaitPidFlag::WUNTRACED)) {
                Ok(WaitStatus::Stopped(_, _)) => return Ok(()),
                Ok(WaitStatus::Exited(_, code)) => {
                    self.reaped = true;
                    return Err(format!("exited with code {} before stopping", code));
                }
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    self.reaped = true;
                    return Err(format!("killed by {} before stopping", signal));
                }
                Ok(_) | Err(Errno::EINTR) => continue,
                Err(errno) => return Err(format!("waitpid failed: {}", errno)),
            }
        }
    }

    fn send(&self, op: ControlOp, signal: Signal) -> Result<(), ControlError> {
        if self.reaped {
            return Err(ControlError::AlreadyReaped(self.id()));
        }
        kill(self.pid, signal).map_err(|errno| ControlError::os(self.id(), op, errno))
    }

    fn record_exit(&mut self, status: WaitStatus) -> Option<ExitStatus> {
        let exit = match status {
            WaitStatus::Exited(_, code) => ExitStatus::Code(code),
            WaitStatus::Signaled(_, signal, _) => ExitStatus::Signaled(signal as i32),
            _ => return None,
        };
        self.reaped = true;
        Some(exit)
    }
}

impl Task for ChildProcess {
    fn id(&self) -> TaskId {
        self.pid.as_raw() as TaskId
    }

    fn resume(&mut self) -> Result<(), ControlError> {
        self.send(ControlOp::Resume, Signal::SIGCONT)
    }

    fn pause(&mut self) -> Result<(), ControlError> {
        self.send(ControlOp::Pause, Signal::SIGSTOP)
    }

    fn try_reap(&mut self) -> Result<ReapStatus, ControlError> {
        if self.reaped {
            return Err(ControlError::AlreadyReaped(self.id()));
        }
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(status) => Ok(match self.record_exit(status) {
                Some(exit) => ReapStatus::Exited(exit),
                None => ReapStatus::StillRunning,
            }),
            Err(errno) => Err(ControlError::os(self.id(), ControlOp::Reap, errno)),
        }
    }

    fn terminate(&mut self) -> Result<(), ControlError> {
        if self.reaped {
            return Ok(());
        }
        // SIGKILL also ends stopped processes; ESRCH means it is already a zombie or gone
        match kill(self.pid, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(errno) => return Err(ControlError::os(self.id(), ControlOp::Terminate, errno)),
        }
        loop {
            match waitpid(self.pid, None) {
                Ok(status) => {
                    if let Some(exit) = self.record_exit(status) {
                        debug!(pid = self.id(), %exit, "Terminated child process");
                        return Ok(());
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(errno) => {
                    // nothing left to reap
                    self.reaped = true;
                    return Err(ControlError::os(self.id(), ControlOp::Reap, errno));
                }
            }
        }
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        warn!(pid = self.id(), "Child process dropped while alive, terminating");
        if let Err(e) = self.terminate() {
            warn!(pid = self.id(), error = %e, "Failed to terminate dropped child");
        }
    }
}
