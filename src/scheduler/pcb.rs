/*!
 * Process Control Block
 * Scheduler bookkeeping for one task and its lifecycle transitions
 */

use crate::core::{ExitStatus, TaskId};
use crate::process::Task;
use serde::Serialize;
use std::time::Duration;

/// Lifecycle state of a PCB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PcbState {
    Ready,
    Running,
    Finished,
}

/// How a finished PCB ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Completion {
    /// The task terminated and was reaped
    Exited { status: ExitStatus },
    /// A control operation failed; the task was released without a status
    Lost { reason: String },
}

/// Read-only view of a PCB handed to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PcbSnapshot {
    pub id: TaskId,
    pub command: String,
    pub state: PcbState,
    #[serde(rename = "cumulative_run_time_ms", serialize_with = "super::stats::as_millis")]
    pub cumulative_run_time: Duration,
    pub dispatches: u32,
}

/// Process control block, owning its task handle
pub struct Pcb<T> {
    task: T,
    command: String,
    state: PcbState,
    cumulative_run_time: Duration,
    dispatches: u32,
}

impl<T: Task> Pcb<T> {
    /// New PCB in the `Ready` state
    pub fn new(task: T, command: impl Into<String>) -> Self {
        Self {
            task,
            command: command.into(),
            state: PcbState::Ready,
            cumulative_run_time: Duration::ZERO,
            dispatches: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.task.id()
    }

    #[inline]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[inline]
    pub fn state(&self) -> PcbState {
        self.state
    }

    #[inline]
    pub fn cumulative_run_time(&self) -> Duration {
        self.cumulative_run_time
    }

    #[inline]
    pub fn dispatches(&self) -> u32 {
        self.dispatches
    }

    #[inline]
    pub fn task_mut(&mut self) -> &mut T {
        &mut self.task
    }

    /// READY -> RUNNING
    pub(super) fn mark_running(&mut self) {
        debug_assert_eq!(self.state, PcbState::Ready);
        self.state = PcbState::Running;
        self.dispatches += 1;
    }

    /// RUNNING -> READY after a full quantum
    pub(super) fn mark_preempted(&mut self, quantum: Duration) {
        debug_assert_eq!(self.state, PcbState::Running);
        self.state = PcbState::Ready;
        self.cumulative_run_time += quantum;
    }

    /// RUNNING or READY -> FINISHED, releasing the task
    pub(super) fn finish(self, completion: Completion) -> FinishedPcb {
        debug_assert_ne!(self.state, PcbState::Finished);
        FinishedPcb {
            id: self.id(),
            command: self.command,
            completion,
            cumulative_run_time: self.cumulative_run_time,
            dispatches: self.dispatches,
        }
    }

    pub fn snapshot(&self) -> PcbSnapshot {
        PcbSnapshot {
            id: self.id(),
            command: self.command.clone(),
            state: self.state,
            cumulative_run_time: self.cumulative_run_time,
            dispatches: self.dispatches,
        }
    }
}

/// Record left behind once a PCB is finished and its task released
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishedPcb {
    pub id: TaskId,
    pub command: String,
    pub completion: Completion,
    #[serde(rename = "cumulative_run_time_ms", serialize_with = "super::stats::as_millis")]
    pub cumulative_run_time: Duration,
    pub dispatches: u32,
}

impl FinishedPcb {
    /// Exit status, if the task was reaped normally
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match &self.completion {
            Completion::Exited { status } => Some(*status),
            Completion::Lost { .. } => None,
        }
    }
}
