/*!
 * Signal Event Types
 */

use nix::sys::signal::Signal;

/// Asynchronous event deposited into the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Some child process changed state (exited, was killed, stopped or continued)
    ChildChanged,
    /// The scheduler itself was asked to stop
    Interrupted(Signal),
}

/// Why a deadline wait returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// The deadline passed with no event
    QuantumExpired,
    ChildChanged,
    Interrupted(Signal),
}

impl From<Event> for Wakeup {
    fn from(event: Event) -> Self {
        match event {
            Event::ChildChanged => Wakeup::ChildChanged,
            Event::Interrupted(signal) => Wakeup::Interrupted(signal),
        }
    }
}
