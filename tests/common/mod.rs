/*!
 * Scripted Tasks
 * In-memory `Task` implementations with deterministic behavior for scheduler tests
 */

#![allow(dead_code)]

use nix::errno::Errno;
use nix::sys::signal::Signal;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use usps::core::{ControlError, ControlOp, ExitStatus, TaskId};
use usps::process::{ReapStatus, Task};
use usps::signals::EventNotifier;

/// How a scripted task ends its final quantum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Exits right after the final resume and reports it
    Early,
    /// Exits silently; only the expiry-time reap sees it
    AtExpiry,
}

#[derive(Debug, Default)]
struct RecorderState {
    dispatch_order: Vec<TaskId>,
    running: HashSet<TaskId>,
    max_running: usize,
    terminated: Vec<TaskId>,
    resumed_after_exit: Vec<TaskId>,
}

/// Shared log of what the scheduler did to scripted tasks
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    state: Arc<Mutex<RecorderState>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn started(&self, id: TaskId) {
        let mut state = self.state.lock();
        state.dispatch_order.push(id);
        state.running.insert(id);
        state.max_running = state.max_running.max(state.running.len());
    }

    fn stopped(&self, id: TaskId) {
        self.state.lock().running.remove(&id);
    }

    fn terminated(&self, id: TaskId) {
        let mut state = self.state.lock();
        state.running.remove(&id);
        state.terminated.push(id);
    }

    fn resumed_after_exit(&self, id: TaskId) {
        self.state.lock().resumed_after_exit.push(id);
    }

    /// Tasks that were resumed although they had already exited
    pub fn resumed_after_exit_ids(&self) -> Vec<TaskId> {
        self.state.lock().resumed_after_exit.clone()
    }

    pub fn dispatch_order(&self) -> Vec<TaskId> {
        self.state.lock().dispatch_order.clone()
    }

    pub fn max_running(&self) -> usize {
        self.state.lock().max_running
    }

    pub fn running_now(&self) -> usize {
        self.state.lock().running.len()
    }

    pub fn terminated_ids(&self) -> Vec<TaskId> {
        let mut ids = self.state.lock().terminated.clone();
        ids.sort_unstable();
        ids
    }
}

/// Task that needs a fixed number of quanta before it exits
pub struct ScriptedTask {
    id: TaskId,
    quanta_needed: u32,
    resumes: u32,
    exit_code: i32,
    ending: Ending,
    exited: bool,
    reaped: bool,
    notifier: EventNotifier,
    recorder: Recorder,
    fail_resume_on: Option<u32>,
    fail_pause: bool,
    spurious_wake: bool,
    interrupt_on: Option<u32>,
    exit_on_pause: bool,
}

impl ScriptedTask {
    pub fn new(id: TaskId, quanta_needed: u32, notifier: EventNotifier, recorder: Recorder) -> Self {
        assert!(quanta_needed > 0);
        Self {
            id,
            quanta_needed,
            resumes: 0,
            exit_code: 0,
            ending: Ending::Early,
            exited: false,
            reaped: false,
            notifier,
            recorder,
            fail_resume_on: None,
            fail_pause: false,
            spurious_wake: false,
            interrupt_on: None,
            exit_on_pause: false,
        }
    }

    pub fn ending(mut self, ending: Ending) -> Self {
        self.ending = ending;
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Fail the n-th resume (1-based)
    pub fn fail_resume_on(mut self, n: u32) -> Self {
        self.fail_resume_on = Some(n);
        self
    }

    pub fn fail_pause(mut self) -> Self {
        self.fail_pause = true;
        self
    }

    /// Report a child state change on every non-final resume without exiting
    pub fn spurious_wake(mut self) -> Self {
        self.spurious_wake = true;
        self
    }

    /// Deliver SIGINT to the coordinator on the n-th resume (1-based)
    pub fn interrupt_on(mut self, n: u32) -> Self {
        self.interrupt_on = Some(n);
        self
    }

    /// Exit while the first pause is being delivered, as a process that
    /// dies just before SIGSTOP reaches it
    pub fn exit_on_pause(mut self) -> Self {
        self.exit_on_pause = true;
        self
    }

    fn ensure_live(&self) -> Result<(), ControlError> {
        if self.reaped {
            Err(ControlError::AlreadyReaped(self.id))
        } else {
            Ok(())
        }
    }
}

impl Task for ScriptedTask {
    fn id(&self) -> TaskId {
        self.id
    }

    fn resume(&mut self) -> Result<(), ControlError> {
        self.ensure_live()?;
        if self.exited {
            self.recorder.resumed_after_exit(self.id);
            return Ok(());
        }
        self.resumes += 1;
        if self.fail_resume_on == Some(self.resumes) {
            return Err(ControlError::os(self.id, ControlOp::Resume, Errno::ESRCH));
        }
        self.recorder.started(self.id);

        if self.interrupt_on == Some(self.resumes) {
            self.notifier.interrupted(Signal::SIGINT);
        }

        if self.resumes >= self.quanta_needed {
            self.exited = true;
            self.recorder.stopped(self.id);
            if self.ending == Ending::Early {
                self.notifier.child_changed();
            }
        } else if self.spurious_wake {
            self.notifier.child_changed();
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), ControlError> {
        self.ensure_live()?;
        if self.fail_pause {
            return Err(ControlError::os(self.id, ControlOp::Pause, Errno::EPERM));
        }
        self.recorder.stopped(self.id);
        if self.exit_on_pause {
            self.exited = true;
        }
        Ok(())
    }

    fn try_reap(&mut self) -> Result<ReapStatus, ControlError> {
        self.ensure_live()?;
        if self.exited {
            self.reaped = true;
            Ok(ReapStatus::Exited(ExitStatus::Code(self.exit_code)))
        } else {
            Ok(ReapStatus::StillRunning)
        }
    }

    fn terminate(&mut self) -> Result<(), ControlError> {
        if !self.reaped {
            self.reaped = true;
            self.recorder.terminated(self.id);
        }
        Ok(())
    }
}

/// Dispatch order plain round robin produces for tasks needing `quanta` each
pub fn round_robin_order(quanta: &[(TaskId, u32)]) -> (Vec<TaskId>, Vec<TaskId>) {
    let mut queue: std::collections::VecDeque<(TaskId, u32)> = quanta.iter().copied().collect();
    let mut dispatches = Vec::new();
    let mut completions = Vec::new();
    while let Some((id, remaining)) = queue.pop_front() {
        dispatches.push(id);
        if remaining > 1 {
            queue.push_back((id, remaining - 1));
        } else {
            completions.push(id);
        }
    }
    (dispatches, completions)
}
