//! Kernel Audit Log
//!
//! Records every state transition of the simulated kernel, stamped with the
//! logical time at which it happened. Tests use it to prove that a
//! transition happened (or did not); drivers can export it as JSON.

use core_types::{DiskId, PageNumber, ProcessId};
use kernel_api::{Instant, MemoryFrame};
use serde::{Deserialize, Serialize};

/// A kernel state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelEvent {
    /// Root process registered
    ProcessCreated { process_id: ProcessId },
    /// Running process forked a child
    ProcessForked { parent: ProcessId, child: ProcessId },
    /// Process placed on the CPU
    Dispatched { process_id: ProcessId },
    /// Running process moved to the back of the ready queue
    Preempted { process_id: ProcessId },
    /// CPU left with nothing to run
    CpuIdled,
    /// Running process started waiting for a child
    WaitBlocked { process_id: ProcessId },
    /// Waiting parent collected a zombie child
    ZombieReaped { parent: ProcessId, child: ProcessId },
    /// Running process exited
    ProcessExited { process_id: ProcessId },
    /// Process record removed from the process table
    ProcessTerminated { process_id: ProcessId },
    /// Exited process kept until its parent waits
    BecameZombie { process_id: ProcessId, parent: ProcessId },
    /// Waiting parent made ready by a child's exit
    ParentResumed { parent: ProcessId, child: ProcessId },
    /// Every frame of a process released
    FramesReleased { process_id: ProcessId, count: usize },
    /// Read request queued on a disk
    DiskRequested {
        disk: DiskId,
        process_id: ProcessId,
        file_name: String,
    },
    /// Disk finished serving a process, which is runnable again
    DiskCompleted { disk: DiskId, process_id: ProcessId },
    /// Completion for a process that is gone or no longer blocked
    DiskCompletionIgnored { disk: DiskId, process_id: ProcessId },
    /// Access to a resident page
    PageHit {
        process_id: ProcessId,
        page_number: PageNumber,
    },
    /// Page loaded into RAM
    PageFault {
        process_id: ProcessId,
        page_number: PageNumber,
    },
    /// Least recently used frame removed to make room
    PageEvicted { frame: MemoryFrame },
}

/// A recorded event with its timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the event happened (logical time)
    pub timestamp: Instant,
    pub event: KernelEvent,
}

/// Audit log of kernel events
#[derive(Debug, Clone)]
pub struct KernelAuditLog {
    records: Vec<AuditRecord>,
}

impl KernelAuditLog {
    /// Creates a new empty audit log
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Records an event
    pub fn record(&mut self, timestamp: Instant, event: KernelEvent) {
        self.records.push(AuditRecord { timestamp, event });
    }

    /// Returns all recorded events with their timestamps
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Returns all recorded events in order
    pub fn events(&self) -> impl Iterator<Item = &KernelEvent> {
        self.records.iter().map(|r| &r.event)
    }

    /// Returns the number of recorded events
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clears all recorded events
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Returns events matching a predicate
    pub fn find_events<F>(&self, predicate: F) -> Vec<&KernelEvent>
    where
        F: Fn(&KernelEvent) -> bool,
    {
        self.events().filter(|e| predicate(e)).collect()
    }

    /// Checks if any event matches a predicate
    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&KernelEvent) -> bool,
    {
        self.events().any(predicate)
    }

    /// Counts events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&KernelEvent) -> bool,
    {
        self.events().filter(|e| predicate(e)).count()
    }

    /// Serializes the log as a JSON array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records)
    }
}

impl Default for KernelAuditLog {
    fn default() -> Self {
        Self::new()
    }
}
