/*!
 * Process Launcher
 *
 * Creates one OS process per command, born suspended: the forked child
 * stops itself before exec, and the launcher does not return until it has
 * observed that stop. The target program therefore never runs a single
 * instruction before the scheduler first resumes it.
 */

use super::child::ChildProcess;
use super::task::Task;
use super::types::Command;
use crate::core::limits::EXEC_FAILURE_EXIT_CODE;
use crate::core::LaunchError;
use nix::libc;
use nix::sys::signal::{raise, Signal};
use nix::unistd::{fork, ForkResult};
use std::ffi::CString;
use std::os::raw::c_char;
use tracing::info;

/// Everything the child needs after fork, allocated before fork
struct ExecImage {
    // owns the strings `argv_ptrs` points into
    _argv: Vec<CString>,
    argv_ptrs: Vec<*const c_char>,
    failure_message: Vec<u8>,
}

impl ExecImage {
    fn prepare(command: &Command) -> Result<Self, LaunchError> {
        let argv = command
            .argv()
            .iter()
            .map(|arg| CString::new(arg.as_bytes()).map_err(|_| LaunchError::NulByte(arg.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());

        let failure_message =
            format!("usps: failed to execute '{}'\n", command.program()).into_bytes();

        Ok(Self {
            _argv: argv,
            argv_ptrs,
            failure_message,
        })
    }

    /// Runs in the forked child: stop, then become the target program once continued
    fn exec_when_resumed(&self) -> ! {
        let _ = raise(Signal::SIGSTOP);

        // SAFETY: `argv_ptrs` is a NULL-terminated array of pointers into `_argv`,
        // and `failure_message` is a plain byte buffer; both were built before fork.
        // execvp, write and _exit are async-signal-safe.
        unsafe {
            libc::execvp(self.argv_ptrs[0], self.argv_ptrs.as_ptr());
            libc::write(
                libc::STDERR_FILENO,
                self.failure_message.as_ptr().cast(),
                self.failure_message.len(),
            );
            libc::_exit(EXEC_FAILURE_EXIT_CODE)
        }
    }
}

/// Launches commands as suspended child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Fork a child for `command` and return it already stopped
    ///
    /// A program that cannot be executed is not a launch failure: the child
    /// exits with status 127 once resumed.
    pub fn launch_suspended(&self, command: &Command) -> Result<ChildProcess, LaunchError> {
        let image = ExecImage::prepare(command)?;

        // SAFETY: between fork and exec the child touches only memory prepared
        // above and calls only async-signal-safe functions.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => image.exec_when_resumed(),
            Ok(ForkResult::Parent { child }) => {
                let mut process = ChildProcess::forked(child);
                if let Err(detail) = process.await_stop() {
                    return Err(LaunchError::NotSuspended {
                        pid: process.id(),
                        command: command.to_string(),
                        detail,
                    });
                }
                info!(pid = process.id(), command = %command, "Launched suspended process");
                Ok(process)
            }
            Err(errno) => Err(LaunchError::Fork {
                command: command.to_string(),
                errno,
            }),
        }
    }
}
