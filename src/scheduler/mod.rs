/*!
 * Round-Robin Scheduler
 *
 * Owns every live PCB and the ready queue. A single thread of control
 * dispatches the front PCB for one quantum, waits for quantum expiry or the
 * task's exit, then either finalizes the PCB or pauses it and appends it to
 * the back of the queue. Only the scheduler mutates PCBs; event sources only
 * deposit into the coordinator.
 */

use crate::config::SchedulerConfig;
use crate::core::TaskId;
use crate::process::Task;
use crate::signals::{EventNotifier, SignalCoordinator};
use nix::sys::signal::Signal;
use tracing::{info, warn};

mod observer;
mod operations;
mod pcb;
mod queue;
mod stats;

pub use observer::Observer;
pub use pcb::{Completion, FinishedPcb, Pcb, PcbSnapshot, PcbState};
pub use queue::ReadyQueue;
pub use stats::{RunStats, RunSummary};

pub struct Scheduler<T: Task> {
    config: SchedulerConfig,
    ready: ReadyQueue<T>,
    coordinator: SignalCoordinator,
    observer: Option<Box<dyn Observer>>,
    stats: RunStats,
    finished: Vec<FinishedPcb>,
}

impl<T: Task> Scheduler<T> {
    pub fn new(config: SchedulerConfig, coordinator: SignalCoordinator) -> Self {
        info!(
            quantum_ms = config.quantum().as_millis() as u64,
            "Round-robin scheduler initialized"
        );
        Self {
            config,
            ready: ReadyQueue::new(),
            coordinator,
            observer: None,
            stats: RunStats::default(),
            finished: Vec::new(),
        }
    }

    /// Install a reporting observer
    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    #[inline]
    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Event handle for sources that report child state changes
    pub fn notifier(&self) -> EventNotifier {
        self.coordinator.notifier()
    }

    /// Create a READY PCB for a suspended task and queue it
    pub fn admit(&mut self, task: T, command: impl Into<String>) -> TaskId {
        let pcb = Pcb::new(task, command);
        let id = pcb.id();
        self.ready.enqueue(pcb);
        id
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Number of PCBs waiting in the ready queue
    #[inline]
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Snapshots of the ready queue, front to back
    pub fn snapshots(&self) -> Vec<PcbSnapshot> {
        self.ready.iter().map(Pcb::snapshot).collect()
    }

    /// Interrupt received while no quantum was running, if any
    ///
    /// Discards buffered child notifications along the way.
    pub fn pending_interrupt(&self) -> Option<Signal> {
        self.coordinator.drain()
    }

    /// Terminate and release every queued task; returns how many were terminated
    pub fn abort(&mut self) -> usize {
        let mut terminated = 0;
        for mut pcb in self.ready.drain() {
            match pcb.task_mut().terminate() {
                Ok(()) => terminated += 1,
                Err(e) => warn!(pid = pcb.id(), error = %e, "Failed to terminate task during abort"),
            }
        }
        if terminated > 0 {
            info!(terminated, "Run aborted, queued tasks terminated");
        }
        terminated
    }
}
