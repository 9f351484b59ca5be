//! Process table
//!
//! Owns every process control block, keyed by [`ProcessId`]. Parent and
//! child links are identifiers rather than references, so removing a record
//! never invalidates another one: an orphan simply keeps the identifier of
//! a parent that no longer exists.

use core_types::{ProcessId, NO_PROCESS};
use kernel_api::{Instant, KernelError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Lifecycle state of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Queued for the CPU
    Ready,
    /// Occupying the CPU
    Running,
    /// Waiting for a child to terminate
    Waiting,
    /// Waiting for a disk read to complete
    Blocked,
    /// Exited, but the parent has not collected it yet
    Zombie,
}

/// Process control block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub process_id: ProcessId,
    pub state: ProcessState,
    /// [`NO_PROCESS`] for root processes
    pub parent: ProcessId,
    /// Live children in fork order
    pub children: Vec<ProcessId>,
    /// Exited children awaiting a wait, in exit order
    pub zombies: Vec<ProcessId>,
    pub created_at: Instant,
}

impl ProcessRecord {
    /// Creates a root process record
    pub fn root(process_id: ProcessId, created_at: Instant) -> Self {
        Self::child(process_id, NO_PROCESS, created_at)
    }

    /// Creates a ready record linked to `parent`
    pub fn child(process_id: ProcessId, parent: ProcessId, created_at: Instant) -> Self {
        Self {
            process_id,
            state: ProcessState::Ready,
            parent,
            children: Vec::new(),
            zombies: Vec::new(),
            created_at,
        }
    }

    pub fn has_parent(&self) -> bool {
        !self.parent.is_none()
    }

    pub fn is_zombie(&self) -> bool {
        self.state == ProcessState::Zombie
    }
}

/// Arena of process records
#[derive(Debug)]
pub struct ProcessTable {
    records: HashMap<ProcessId, ProcessRecord>,
    last_id: ProcessId,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            last_id: NO_PROCESS,
        }
    }

    /// Hands out the next identifier
    ///
    /// Identifiers increase monotonically and are never reused, even after
    /// the record they named is removed.
    pub fn allocate_id(&mut self) -> ProcessId {
        self.last_id = self.last_id.next();
        self.last_id
    }

    pub fn insert(&mut self, record: ProcessRecord) {
        self.records.insert(record.process_id, record);
    }

    pub fn get(&self, process_id: ProcessId) -> Option<&ProcessRecord> {
        self.records.get(&process_id)
    }

    pub fn get_mut(&mut self, process_id: ProcessId) -> Option<&mut ProcessRecord> {
        self.records.get_mut(&process_id)
    }

    /// Returns the record or an `UnknownProcess` error
    pub fn require(&self, process_id: ProcessId) -> Result<&ProcessRecord, KernelError> {
        self.get(process_id)
            .ok_or(KernelError::UnknownProcess(process_id))
    }

    pub fn remove(&mut self, process_id: ProcessId) -> Option<ProcessRecord> {
        self.records.remove(&process_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the state of a process, if it has a record
    pub fn state(&self, process_id: ProcessId) -> Option<ProcessState> {
        self.get(process_id).map(|r| r.state)
    }

    /// Sets the state of a process; unknown identifiers are ignored
    pub fn set_state(&mut self, process_id: ProcessId, state: ProcessState) {
        if let Some(record) = self.records.get_mut(&process_id) {
            record.state = state;
        }
    }

    /// Iterates over all records in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        let mut records: Vec<&ProcessRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.process_id);
        records.into_iter()
    }

    /// Collects `root` and all of its descendants, breadth-first
    ///
    /// Follows both live children and not-yet-reaped zombies. Each process
    /// is visited once even if the links were to form a cycle. Identifiers
    /// with no record are still reported so the caller can scrub them from
    /// other tables, but they are not expanded.
    pub fn subtree(&self, root: ProcessId) -> Vec<ProcessId> {
        let mut visited = HashSet::new();
        let mut pending = VecDeque::new();
        let mut order = Vec::new();

        visited.insert(root);
        pending.push_back(root);

        while let Some(process_id) = pending.pop_front() {
            order.push(process_id);
            let Some(record) = self.records.get(&process_id) else {
                continue;
            };
            for &child in record.children.iter().chain(record.zombies.iter()) {
                if visited.insert(child) {
                    pending.push_back(child);
                }
            }
        }

        order
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
