/*!
 * Scheduler Dispatch Loop
 *
 * DISPATCHING -> RUNNING_QUANTUM -> REAPING -> DISPATCHING ... -> DONE
 */

use super::pcb::{Completion, FinishedPcb, Pcb, PcbSnapshot, PcbState};
use super::stats::RunSummary;
use super::Scheduler;
use crate::core::{ControlError, ExitStatus, SchedulerError};
use crate::process::{ReapStatus, Task};
use crate::signals::Wakeup;
use nix::sys::signal::Signal;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

enum Phase<T> {
    Dispatching,
    RunningQuantum {
        pcb: Pcb<T>,
        deadline: Instant,
    },
    Reaping {
        pcb: Pcb<T>,
        /// Exit already collected while the quantum was running
        observed: Option<Result<ExitStatus, ControlError>>,
    },
    Done,
}

impl<T: Task> Scheduler<T> {
    /// Run until the ready queue is empty
    ///
    /// Control failures on individual tasks are absorbed (the PCB is finalized
    /// as lost). Only an interrupt ends the run early, after terminating every
    /// remaining task.
    pub fn run(&mut self) -> Result<RunSummary, SchedulerError> {
        let started = Instant::now();
        let quantum = self.config.quantum();
        info!(
            tasks = self.ready.len(),
            quantum_ms = quantum.as_millis() as u64,
            "Scheduling started"
        );

        let mut phase = Phase::Dispatching;
        loop {
            phase = match phase {
                Phase::Dispatching => self.dispatch()?,
                Phase::RunningQuantum { pcb, deadline } => self.run_quantum(pcb, deadline)?,
                Phase::Reaping { pcb, observed } => self.reap(pcb, observed),
                Phase::Done => break,
            };
        }

        let summary = RunSummary {
            quantum,
            elapsed: started.elapsed(),
            stats: self.stats,
            finished: std::mem::take(&mut self.finished),
        };
        info!(
            completed = summary.stats.completed,
            lost = summary.stats.lost,
            quanta = summary.stats.quanta_granted,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Scheduling finished"
        );
        Ok(summary)
    }

    fn dispatch(&mut self) -> Result<Phase<T>, SchedulerError> {
        // notifications raised before the resume cannot describe the next task's exit
        if let Some(signal) = self.coordinator.drain() {
            return Err(self.interrupt(None, signal));
        }

        let Some(mut pcb) = self.ready.dequeue() else {
            return Ok(Phase::Done);
        };

        if let Err(err) = pcb.task_mut().resume() {
            self.lose(pcb, err);
            return Ok(Phase::Dispatching);
        }

        pcb.mark_running();
        self.stats.record_dispatch();
        let deadline = Instant::now() + self.config.quantum();
        debug!(
            pid = pcb.id(),
            dispatch = pcb.dispatches(),
            waiting = self.ready.len(),
            "Dispatched"
        );
        Ok(Phase::RunningQuantum { pcb, deadline })
    }

    fn run_quantum(
        &mut self,
        mut pcb: Pcb<T>,
        deadline: Instant,
    ) -> Result<Phase<T>, SchedulerError> {
        loop {
            match self.coordinator.wait_until(deadline) {
                Wakeup::QuantumExpired => {
                    return Ok(Phase::Reaping {
                        pcb,
                        observed: None,
                    })
                }
                Wakeup::ChildChanged => match pcb.task_mut().try_reap() {
                    Ok(ReapStatus::StillRunning) => {
                        trace!(pid = pcb.id(), "State change of another task, still waiting");
                    }
                    Ok(ReapStatus::Exited(status)) => {
                        return Ok(Phase::Reaping {
                            pcb,
                            observed: Some(Ok(status)),
                        })
                    }
                    Err(err) => {
                        return Ok(Phase::Reaping {
                            pcb,
                            observed: Some(Err(err)),
                        })
                    }
                },
                Wakeup::Interrupted(signal) => return Err(self.interrupt(Some(pcb), signal)),
            }
        }
    }

    fn reap(
        &mut self,
        mut pcb: Pcb<T>,
        observed: Option<Result<ExitStatus, ControlError>>,
    ) -> Phase<T> {
        // an exit that lands together with the expiry still counts as an exit
        let status = match observed {
            Some(result) => result.map(ReapStatus::Exited),
            None => pcb.task_mut().try_reap(),
        };

        match status {
            Ok(ReapStatus::Exited(status)) => self.complete(pcb, status),
            Ok(ReapStatus::StillRunning) => self.preempt(pcb),
            Err(err) => self.lose(pcb, err),
        }
        Phase::Dispatching
    }

    fn preempt(&mut self, mut pcb: Pcb<T>) {
        if let Err(err) = pcb.task_mut().pause() {
            // the task may have exited between the reap attempt and the pause
            match pcb.task_mut().try_reap() {
                Ok(ReapStatus::Exited(status)) => self.complete(pcb, status),
                _ => self.lose(pcb, err),
            }
            return;
        }

        // a stopped task cannot exit, so this check closes the reap/pause window
        match pcb.task_mut().try_reap() {
            Ok(ReapStatus::StillRunning) => {}
            Ok(ReapStatus::Exited(status)) => return self.complete(pcb, status),
            Err(err) => return self.lose(pcb, err),
        }

        pcb.mark_preempted(self.config.quantum());
        self.stats.record_preemption();
        debug!(
            pid = pcb.id(),
            run_time_ms = pcb.cumulative_run_time().as_millis() as u64,
            "Preempted"
        );

        let snapshot = pcb.snapshot();
        self.ready.enqueue(pcb);
        self.end_cycle(&snapshot);
    }

    fn complete(&mut self, pcb: Pcb<T>, status: ExitStatus) {
        info!(pid = pcb.id(), command = pcb.command(), %status, "Task finished");
        self.stats.record_completion();
        self.retire(pcb.finish(Completion::Exited { status }));
    }

    fn lose(&mut self, mut pcb: Pcb<T>, err: ControlError) {
        warn!(pid = pcb.id(), command = pcb.command(), error = %err, "Task lost after control failure");
        if let Err(e) = pcb.task_mut().terminate() {
            debug!(pid = pcb.id(), error = %e, "Release of lost task failed");
        }
        self.stats.record_lost();
        self.retire(pcb.finish(Completion::Lost {
            reason: err.to_string(),
        }));
    }

    fn retire(&mut self, finished: FinishedPcb) {
        let snapshot = PcbSnapshot {
            id: finished.id,
            command: finished.command.clone(),
            state: PcbState::Finished,
            cumulative_run_time: finished.cumulative_run_time,
            dispatches: finished.dispatches,
        };
        self.finished.push(finished);
        self.end_cycle(&snapshot);
    }

    fn end_cycle(&mut self, dispatched: &PcbSnapshot) {
        if let Some(observer) = self.observer.as_mut() {
            let ready: Vec<PcbSnapshot> = self.ready.iter().map(Pcb::snapshot).collect();
            observer.on_cycle(dispatched, &ready);
        }
    }

    fn interrupt(&mut self, running: Option<Pcb<T>>, signal: Signal) -> SchedulerError {
        warn!(%signal, "Interrupted, terminating remaining tasks");
        if let Some(mut pcb) = running {
            if let Err(e) = pcb.task_mut().terminate() {
                warn!(pid = pcb.id(), error = %e, "Failed to terminate running task");
            }
        }
        self.abort();
        SchedulerError::Interrupted(signal)
    }
}
