//! Single-CPU round-robin scheduler
//!
//! ## Design
//!
//! - **One running slot**: at most one process occupies the CPU.
//! - **FIFO ready queue**: processes are enqueued at the back and
//!   dispatched from the front. No priorities.
//! - **Preemption only by timer interrupt**: the driver decides when a
//!   time slice is over.
//!
//! There are two ways a process reaches the CPU, and they are kept apart on
//! purpose:
//!
//! - [`Scheduler::admit`] (new processes, completed disk reads) puts the
//!   process straight on an idle CPU, or at the back of the queue otherwise.
//! - [`Scheduler::vacate`] and friends (exit, wait, disk read, timer) empty
//!   the running slot and pop the queue head into it.
//!
//! Which of the two runs decides ordering when several processes become
//! runnable in the same step.
//!
//! A process that waits for a child still takes a queue slot, tagged
//! [`QueueTag::Waiting`]. When that entry reaches the front it is dispatched
//! like any other.

use core_types::ProcessId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Why an entry sits in the ready queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueTag {
    /// Runnable
    Ready,
    /// Waiting for a child but still holding its turn
    Waiting,
}

/// One ready-queue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyEntry {
    pub process_id: ProcessId,
    pub tag: QueueTag,
}

/// Where an admitted process ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Placed directly on the idle CPU
    Dispatched,
    /// Appended to the ready queue
    Queued,
}

/// Result of a timer interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Process moved off the CPU, if one was running
    pub preempted: Option<ProcessId>,
    /// Process now on the CPU
    pub dispatched: Option<ProcessId>,
}

/// Run queue for processes
///
/// This is a simple FIFO queue using VecDeque for deterministic ordering.
/// Entries are enqueued at the back and dequeued from the front.
#[derive(Debug)]
struct RunQueue {
    queue: VecDeque<ReadyEntry>,
}

impl RunQueue {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    fn enqueue(&mut self, process_id: ProcessId, tag: QueueTag) {
        self.queue.push_back(ReadyEntry { process_id, tag });
    }

    fn dequeue(&mut self) -> Option<ReadyEntry> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn remove(&mut self, process_id: ProcessId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.process_id != process_id);
        before - self.queue.len()
    }

    fn remove_tagged(&mut self, process_id: ProcessId, tag: QueueTag) -> bool {
        let before = self.queue.len();
        self.queue
            .retain(|entry| !(entry.process_id == process_id && entry.tag == tag));
        before != self.queue.len()
    }
}

/// Round-robin scheduler
///
/// Tracks only queue membership and the running slot; process states live
/// in the process table and are updated by the kernel.
#[derive(Debug)]
pub struct Scheduler {
    run_queue: RunQueue,
    running: Option<ProcessId>,
}

impl Scheduler {
    /// Creates an idle scheduler with an empty queue
    pub fn new() -> Self {
        Self {
            run_queue: RunQueue::new(),
            running: None,
        }
    }

    /// Returns the process on the CPU
    pub fn running(&self) -> Option<ProcessId> {
        self.running
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    /// Appends a runnable process to the back of the queue
    pub fn enqueue(&mut self, process_id: ProcessId) {
        self.run_queue.enqueue(process_id, QueueTag::Ready);
    }

    /// Runs `process_id` now if the CPU is idle, queues it otherwise
    pub fn admit(&mut self, process_id: ProcessId) -> Admission {
        if self.running.is_none() {
            self.running = Some(process_id);
            Admission::Dispatched
        } else {
            self.enqueue(process_id);
            Admission::Queued
        }
    }

    /// Empties the running slot and dispatches the queue head
    ///
    /// Returns the new running process, or `None` if the CPU went idle.
    pub fn vacate(&mut self) -> Option<ProcessId> {
        self.running = self.run_queue.dequeue().map(|entry| entry.process_id);
        self.running
    }

    /// Empties the running slot after `exiting` terminated
    ///
    /// The head is always consumed. If it names the exiting process the
    /// entry is stale and the CPU goes idle instead of running it.
    pub fn vacate_after_exit(&mut self, exiting: ProcessId) -> Option<ProcessId> {
        self.running = match self.run_queue.dequeue() {
            Some(entry) if entry.process_id != exiting => Some(entry.process_id),
            _ => None,
        };
        self.running
    }

    /// Parks the running process at the back as waiting, then dispatches
    ///
    /// If the queue was otherwise empty the waiter is dispatched right back.
    pub fn yield_waiting(&mut self) -> Option<ProcessId> {
        if let Some(waiter) = self.running.take() {
            self.run_queue.enqueue(waiter, QueueTag::Waiting);
        }
        self.vacate()
    }

    /// Handles a timer interrupt
    ///
    /// The running process goes to the back of the queue and the head takes
    /// the CPU. A lone process is dispatched straight back. On an idle CPU
    /// the head is dispatched without anything being preempted.
    pub fn rotate(&mut self) -> Rotation {
        let preempted = self.running.take();
        if let Some(process_id) = preempted {
            self.run_queue.enqueue(process_id, QueueTag::Ready);
        }
        let dispatched = self.vacate();
        Rotation {
            preempted,
            dispatched,
        }
    }

    /// Drops every queue entry of a process and clears the running slot if
    /// it holds it
    pub fn remove(&mut self, process_id: ProcessId) {
        self.run_queue.remove(process_id);
        if self.running == Some(process_id) {
            self.running = None;
        }
    }

    /// Moves a waiting process to the back of the queue as ready
    ///
    /// Its `Waiting` entry, if still queued, is dropped so the process never
    /// holds two slots.
    pub fn resume_waiter(&mut self, process_id: ProcessId) {
        self.run_queue.remove_tagged(process_id, QueueTag::Waiting);
        self.enqueue(process_id);
    }

    /// Queued process identifiers from head to tail
    pub fn ready_queue(&self) -> Vec<ProcessId> {
        self.run_queue
            .queue
            .iter()
            .map(|entry| entry.process_id)
            .collect()
    }

    /// Queue entries with their tags, from head to tail
    pub fn entries(&self) -> impl Iterator<Item = &ReadyEntry> {
        self.run_queue.queue.iter()
    }

    pub fn is_queued(&self, process_id: ProcessId) -> bool {
        self.entries().any(|entry| entry.process_id == process_id)
    }

    /// Returns the number of queued entries
    pub fn queued_count(&self) -> usize {
        self.run_queue.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> ProcessId {
        ProcessId::new(raw)
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = Scheduler::new();
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.queued_count(), 0);
        assert!(scheduler.ready_queue().is_empty());
    }

    #[test]
    fn test_admit_dispatches_on_idle_cpu() {
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.admit(pid(1)), Admission::Dispatched);
        assert_eq!(scheduler.running(), Some(pid(1)));

        assert_eq!(scheduler.admit(pid(2)), Admission::Queued);
        assert_eq!(scheduler.admit(pid(3)), Admission::Queued);
        assert_eq!(scheduler.running(), Some(pid(1)));
        assert_eq!(scheduler.ready_queue(), vec![pid(2), pid(3)]);
    }

    #[test]
    fn test_vacate_pops_head_or_idles() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        scheduler.admit(pid(2));

        assert_eq!(scheduler.vacate(), Some(pid(2)));
        assert!(scheduler.ready_queue().is_empty());

        assert_eq!(scheduler.vacate(), None);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_round_robin_ordering() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        scheduler.admit(pid(2));
        scheduler.admit(pid(3));

        let mut order = Vec::new();
        for _ in 0..6 {
            let rotation = scheduler.rotate();
            order.push(rotation.dispatched.unwrap());
        }
        assert_eq!(
            order,
            vec![pid(2), pid(3), pid(1), pid(2), pid(3), pid(1)]
        );
    }

    #[test]
    fn test_rotate_single_process_redispatches_it() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));

        let rotation = scheduler.rotate();
        assert_eq!(rotation.preempted, Some(pid(1)));
        assert_eq!(rotation.dispatched, Some(pid(1)));
        assert!(scheduler.ready_queue().is_empty());
    }

    #[test]
    fn test_rotate_on_idle_cpu() {
        let mut scheduler = Scheduler::new();
        let rotation = scheduler.rotate();
        assert_eq!(rotation.preempted, None);
        assert_eq!(rotation.dispatched, None);

        scheduler.enqueue(pid(4));
        let rotation = scheduler.rotate();
        assert_eq!(rotation.preempted, None);
        assert_eq!(rotation.dispatched, Some(pid(4)));
    }

    #[test]
    fn test_vacate_after_exit_skips_stale_head() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        scheduler.enqueue(pid(1));
        scheduler.enqueue(pid(2));

        assert_eq!(scheduler.vacate_after_exit(pid(1)), None);
        assert_eq!(scheduler.ready_queue(), vec![pid(2)]);
    }

    #[test]
    fn test_yield_waiting_tags_entry() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        scheduler.admit(pid(2));

        assert_eq!(scheduler.yield_waiting(), Some(pid(2)));
        let entries: Vec<ReadyEntry> = scheduler.entries().copied().collect();
        assert_eq!(
            entries,
            vec![ReadyEntry {
                process_id: pid(1),
                tag: QueueTag::Waiting
            }]
        );
    }

    #[test]
    fn test_yield_waiting_alone_redispatches_waiter() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        assert_eq!(scheduler.yield_waiting(), Some(pid(1)));
        assert!(scheduler.ready_queue().is_empty());
    }

    #[test]
    fn test_resume_waiter_moves_to_back_once() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        scheduler.admit(pid(2));
        scheduler.yield_waiting(); // 2 runs, queue: [1(w)]
        scheduler.enqueue(pid(3)); // queue: [1(w), 3]

        scheduler.resume_waiter(pid(1));
        assert_eq!(scheduler.ready_queue(), vec![pid(3), pid(1)]);
        assert!(scheduler.entries().all(|e| e.tag == QueueTag::Ready));
    }

    #[test]
    fn test_remove_purges_queue_and_slot() {
        let mut scheduler = Scheduler::new();
        scheduler.admit(pid(1));
        scheduler.admit(pid(2));
        scheduler.admit(pid(3));

        scheduler.remove(pid(2));
        assert_eq!(scheduler.ready_queue(), vec![pid(3)]);
        assert!(!scheduler.is_queued(pid(2)));

        scheduler.remove(pid(1));
        assert!(scheduler.is_idle());
    }
}
