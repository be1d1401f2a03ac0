/*!
 * Scheduler Statistics
 * Counters kept during a run and the summary produced at the end
 */

use super::pcb::FinishedPcb;
use crate::core::TaskId;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Serialize a duration as whole milliseconds
pub(crate) fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Dispatches (quanta granted, whether used fully or not)
    pub quanta_granted: u64,
    /// Tasks paused and re-queued after a full quantum
    pub preemptions: u64,
    /// Tasks reaped with an exit status
    pub completed: u64,
    /// Tasks finalized after a control failure
    pub lost: u64,
}

impl RunStats {
    #[inline]
    pub(super) fn record_dispatch(&mut self) {
        self.quanta_granted += 1;
    }

    #[inline]
    pub(super) fn record_preemption(&mut self) {
        self.preemptions += 1;
    }

    #[inline]
    pub(super) fn record_completion(&mut self) {
        self.completed += 1;
    }

    #[inline]
    pub(super) fn record_lost(&mut self) {
        self.lost += 1;
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(rename = "quantum_ms", serialize_with = "as_millis")]
    pub quantum: Duration,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub stats: RunStats,
    /// Finished PCBs in completion order
    pub finished: Vec<FinishedPcb>,
}

impl RunSummary {
    /// Task ids in the order they finished
    pub fn completion_order(&self) -> Vec<TaskId> {
        self.finished.iter().map(|pcb| pcb.id).collect()
    }

    /// True when every task exited with status 0
    pub fn all_succeeded(&self) -> bool {
        self.finished
            .iter()
            .all(|pcb| pcb.exit_status().map_or(false, |status| status.success()))
    }
}
