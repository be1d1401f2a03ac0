/*!
 * Ready Queue
 * FIFO of PCBs eligible to run; insertion order is what makes dispatch round robin
 */

use super::pcb::{Pcb, PcbState};
use crate::process::Task;
use std::collections::VecDeque;

pub struct ReadyQueue<T> {
    queue: VecDeque<Pcb<T>>,
}

impl<T: Task> ReadyQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Append to the back; only `Ready` PCBs may be queued
    pub fn enqueue(&mut self, pcb: Pcb<T>) {
        debug_assert_eq!(pcb.state(), PcbState::Ready);
        debug_assert!(
            self.queue.iter().all(|queued| queued.id() != pcb.id()),
            "task {} queued twice",
            pcb.id()
        );
        self.queue.push_back(pcb);
    }

    /// Remove and return the front
    pub fn dequeue(&mut self) -> Option<Pcb<T>> {
        self.queue.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pcb<T>> {
        self.queue.iter()
    }

    /// Remove every PCB, front first
    pub fn drain(&mut self) -> impl Iterator<Item = Pcb<T>> + '_ {
        self.queue.drain(..)
    }
}

impl<T: Task> Default for ReadyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
