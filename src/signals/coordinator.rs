/*!
 * Signal Coordinator
 *
 * Turns asynchronous events into something the single-threaded scheduler
 * can wait on. Every source deposits into one channel; the scheduler blocks
 * on that channel with a deadline, so an event raised at any moment is
 * either received by the current wait or buffered for the next one.
 * The quantum timer is the deadline itself: expiry is the wait timing out.
 */

use super::types::{Event, Wakeup};
use flume::{Receiver, RecvTimeoutError, Sender};
use nix::sys::signal::Signal;
use std::time::Instant;
use tracing::trace;

/// Receiving side, owned by the scheduler
pub struct SignalCoordinator {
    // kept so the channel never disconnects while the coordinator lives
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl SignalCoordinator {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    /// Sending handle for an event source
    pub fn notifier(&self) -> EventNotifier {
        EventNotifier {
            tx: self.tx.clone(),
        }
    }

    /// Block until an event arrives or `deadline` passes, consuming the event
    pub fn wait_until(&self, deadline: Instant) -> Wakeup {
        match self.rx.recv_deadline(deadline) {
            Ok(event) => event.into(),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                Wakeup::QuantumExpired
            }
        }
    }

    /// Discard buffered child notifications
    ///
    /// Interrupts are not discarded: the first one found is returned.
    pub fn drain(&self) -> Option<Signal> {
        let mut stale = 0usize;
        let mut interrupt = None;
        for event in self.rx.try_iter() {
            match event {
                Event::ChildChanged => stale += 1,
                Event::Interrupted(signal) => {
                    interrupt.get_or_insert(signal);
                }
            }
        }
        if stale > 0 {
            trace!(stale, "Discarded stale child notifications");
        }
        interrupt
    }

    /// Number of buffered events
    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for SignalCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable sending handle; deposits events and never touches scheduler state
#[derive(Clone)]
pub struct EventNotifier {
    tx: Sender<Event>,
}

impl EventNotifier {
    /// Returns false once the coordinator is gone
    pub fn child_changed(&self) -> bool {
        self.tx.send(Event::ChildChanged).is_ok()
    }

    /// Returns false once the coordinator is gone
    pub fn interrupted(&self, signal: Signal) -> bool {
        self.tx.send(Event::Interrupted(signal)).is_ok()
    }
}
