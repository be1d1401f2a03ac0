/*!
 * Signals Module
 * Quantum-expiry and child-exit coordination for the scheduler
 */

pub mod coordinator;
pub mod types;
pub mod watcher;

pub use coordinator::{EventNotifier, SignalCoordinator};
pub use types::{Event, Wakeup};
pub use watcher::ChildWatcher;
