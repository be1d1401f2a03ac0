/*!
 * Dispatch Observer
 *
 * Optional, non-authoritative reporting hook. Called after every dispatch
 * cycle with snapshots only; it cannot change scheduling.
 */

use super::pcb::PcbSnapshot;

pub trait Observer {
    /// `dispatched` is the PCB that just held the CPU, in its post-cycle state;
    /// `ready` is the ready queue front to back.
    fn on_cycle(&mut self, dispatched: &PcbSnapshot, ready: &[PcbSnapshot]);
}

impl<F> Observer for F
where
    F: FnMut(&PcbSnapshot, &[PcbSnapshot]),
{
    fn on_cycle(&mut self, dispatched: &PcbSnapshot, ready: &[PcbSnapshot]) {
        self(dispatched, ready)
    }
}
