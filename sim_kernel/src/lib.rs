//! # Simulated Kernel
//!
//! This crate provides a discrete-event simulation of a single-CPU kernel's
//! core bookkeeping: process lifecycle, CPU dispatch, demand paging with
//! LRU eviction, and per-disk I/O queues.
//!
//! ## Purpose
//!
//! The simulated kernel is driven entirely from outside:
//! - Runs under `cargo test`
//! - Deterministic (logical time, no real concurrency)
//! - Fast (no real I/O, no real memory)
//! - Inspectable (all state is accessible)
//!
//! ## Structure
//!
//! [`SimulatedKernel`] is the only mutator. It owns four components and
//! keeps them consistent with each other in every operation:
//!
//! - [`process_table::ProcessTable`]: process control blocks and family links
//! - [`scheduler::Scheduler`]: the running slot and the ready queue
//! - [`frame_table::FrameTable`]: resident pages and LRU eviction
//! - [`disk_queue::DiskQueues`]: one FIFO of read requests per disk
//!
//! Memory frames are keyed by process, so terminating a process always
//! releases its frames in the same step. Disk requests are left in place;
//! a completion for a process that no longer exists is ignored.

pub mod audit;
pub mod clock;
pub mod config;
pub mod disk_queue;
pub mod frame_table;
pub mod process_table;
pub mod scheduler;
pub mod test_utils;

pub use audit::{AuditRecord, KernelAuditLog, KernelEvent};
pub use config::{ConfigError, KernelConfig};
pub use process_table::{ProcessRecord, ProcessState};
pub use scheduler::{QueueTag, ReadyEntry};

use clock::SimClock;
use core_types::{DiskId, FileReadRequest, PageNumber, ProcessId, NO_PROCESS};
use disk_queue::DiskQueues;
use frame_table::FrameTable;
use kernel_api::{
    Instant, KernelApi, KernelError, MemoryFrame, PageAccess, Syscall, SyscallOutcome,
    SyscallResponse,
};
use log::{debug, trace, warn};
use process_table::ProcessTable;
use scheduler::{Admission, Scheduler};

/// Page a freshly forked child starts with (base address 0)
const FORK_PAGE: PageNumber = PageNumber::new(0);

/// Simulated kernel state
///
/// Unlike a real kernel, this state is directly accessible for testing.
pub struct SimulatedKernel {
    /// Machine parameters, fixed at construction
    config: KernelConfig,
    /// Logical time
    clock: SimClock,
    /// Process control blocks
    processes: ProcessTable,
    /// Running slot and ready queue
    scheduler: Scheduler,
    /// Resident pages
    frames: FrameTable,
    /// Per-disk request queues
    disks: DiskQueues,
    /// Audit log of every transition (test-only)
    audit_log: KernelAuditLog,
}

impl SimulatedKernel {
    /// Creates a kernel with the default configuration
    pub fn new() -> Self {
        Self::build(KernelConfig::default())
    }

    /// Creates a kernel with a custom configuration
    pub fn with_config(config: KernelConfig) -> Result<Self, KernelError> {
        config
            .validate()
            .map_err(|err| KernelError::InvalidConfig(err.to_string()))?;
        Ok(Self::build(config))
    }

    fn build(config: KernelConfig) -> Self {
        Self {
            clock: SimClock::new(),
            processes: ProcessTable::new(),
            scheduler: Scheduler::new(),
            frames: FrameTable::new(config.page_size, config.ram_bytes),
            disks: DiskQueues::new(config.disk_count),
            audit_log: KernelAuditLog::new(),
            config,
        }
    }

    /// Returns the machine configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Returns the current logical time
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Returns a reference to the audit log
    pub fn audit_log(&self) -> &KernelAuditLog {
        &self.audit_log
    }

    /// Clears the audit log
    pub fn clear_audit_log(&mut self) {
        self.audit_log.clear();
    }

    /// Returns the record of a process, including zombies
    pub fn process(&self, process_id: ProcessId) -> Option<&ProcessRecord> {
        self.processes.get(process_id)
    }

    pub fn process_state(&self, process_id: ProcessId) -> Option<ProcessState> {
        self.processes.state(process_id)
    }

    /// Iterates over all records in identifier order
    pub fn processes(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.processes.iter()
    }

    /// Returns the number of records, zombies included
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Returns the live children of a process in fork order
    pub fn children(&self, process_id: ProcessId) -> Option<&[ProcessId]> {
        self.processes
            .get(process_id)
            .map(|record| record.children.as_slice())
    }

    /// Returns every process that has exited but not been reaped
    pub fn zombies(&self) -> Vec<ProcessId> {
        self.processes
            .iter()
            .filter(|record| record.is_zombie())
            .map(|record| record.process_id)
            .collect()
    }

    /// Returns the process on the CPU, or `None` when idle
    pub fn running_process(&self) -> Option<ProcessId> {
        self.scheduler.running()
    }

    /// Returns the ready queue with entry tags, head first
    pub fn ready_entries(&self) -> Vec<ReadyEntry> {
        self.scheduler.entries().copied().collect()
    }

    /// Returns the resident frames of one process
    pub fn frames_of(&self, process_id: ProcessId) -> Vec<MemoryFrame> {
        self.frames.frames_of(process_id).copied().collect()
    }

    /// Bytes of RAM occupied by resident frames
    pub fn resident_bytes(&self) -> u64 {
        self.frames.resident_bytes()
    }

    pub fn disk_count(&self) -> usize {
        self.disks.disk_count()
    }

    /// Counts queued disk requests issued by a process
    pub fn pending_disk_requests(&self, process_id: ProcessId) -> usize {
        self.disks.pending_for(process_id)
    }

    /// Delivers one syscall event
    pub fn apply(&mut self, syscall: &Syscall) -> Result<SyscallOutcome, KernelError> {
        kernel_api::apply(self, syscall)
    }

    /// Delivers a whole trace, reporting each step
    pub fn replay(&mut self, trace: &[Syscall]) -> Vec<SyscallResponse> {
        kernel_api::replay(self, trace)
    }

    /// Returns the running process, or the precondition error
    fn require_running(&self, operation: &'static str) -> Result<ProcessId, KernelError> {
        let process_id = self
            .scheduler
            .running()
            .ok_or(KernelError::CpuIdle { operation })?;
        self.processes.require(process_id)?;
        Ok(process_id)
    }

    fn record(&mut self, event: KernelEvent) {
        self.audit_log.record(self.clock.now(), event);
    }

    /// Marks whatever the scheduler put on the CPU as running
    fn settle_dispatch(&mut self, next: Option<ProcessId>) {
        match next {
            Some(process_id) => {
                self.processes.set_state(process_id, ProcessState::Running);
                debug!("sched: Dispatched (pid: {})", process_id.as_u32());
                self.record(KernelEvent::Dispatched { process_id });
            }
            None => {
                debug!("sched: CPU idle");
                self.record(KernelEvent::CpuIdled);
            }
        }
    }

    /// Touches a page for a process, loading and evicting as needed
    fn page_in(&mut self, process_id: ProcessId, page_number: PageNumber, now: Instant) -> PageAccess {
        let access = self.frames.access(process_id, page_number, now);
        match access {
            PageAccess::Hit => {
                trace!(
                    "mem: Hit (pid: {}, page: {})",
                    process_id.as_u32(),
                    page_number.as_u64()
                );
                self.record(KernelEvent::PageHit {
                    process_id,
                    page_number,
                });
            }
            PageAccess::Fault { evicted } => {
                if let Some(frame) = evicted {
                    debug!(
                        "mem: Evicted (pid: {}, page: {})",
                        frame.process_id.as_u32(),
                        frame.page_number.as_u64()
                    );
                    self.record(KernelEvent::PageEvicted { frame });
                }
                debug!(
                    "mem: Loaded (pid: {}, page: {})",
                    process_id.as_u32(),
                    page_number.as_u64()
                );
                self.record(KernelEvent::PageFault {
                    process_id,
                    page_number,
                });
            }
        }
        access
    }

    /// Tells the parent of an exited process about it
    ///
    /// A waiting parent is made ready and the child is gone for good. A
    /// parent doing anything else keeps the child as a zombie until it
    /// waits. Without a live parent the child is simply removed.
    fn notify_parent(&mut self, exiting: ProcessId, parent: ProcessId) {
        match self.processes.state(parent) {
            Some(ProcessState::Waiting) => {
                if let Some(record) = self.processes.get_mut(parent) {
                    record.children.retain(|&child| child != exiting);
                    record.state = ProcessState::Ready;
                }
                self.scheduler.resume_waiter(parent);
                self.processes.remove(exiting);
                self.record(KernelEvent::ParentResumed {
                    parent,
                    child: exiting,
                });
                self.record(KernelEvent::ProcessTerminated {
                    process_id: exiting,
                });
            }
            Some(_) => {
                if let Some(record) = self.processes.get_mut(parent) {
                    record.children.retain(|&child| child != exiting);
                    record.zombies.push(exiting);
                }
                if let Some(record) = self.processes.get_mut(exiting) {
                    record.state = ProcessState::Zombie;
                    record.children.clear();
                    record.zombies.clear();
                }
                debug!(
                    "proc: Zombie (pid: {}, parent: {})",
                    exiting.as_u32(),
                    parent.as_u32()
                );
                self.record(KernelEvent::BecameZombie {
                    process_id: exiting,
                    parent,
                });
            }
            None => {
                self.processes.remove(exiting);
                self.record(KernelEvent::ProcessTerminated {
                    process_id: exiting,
                });
            }
        }
    }
}

impl Default for SimulatedKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelApi for SimulatedKernel {
    fn create_process(&mut self) -> ProcessId {
        let now = self.clock.tick();
        let process_id = self.processes.allocate_id();
        self.processes.insert(ProcessRecord::root(process_id, now));
        debug!("proc: Created (pid: {})", process_id.as_u32());
        self.record(KernelEvent::ProcessCreated { process_id });

        if self.scheduler.admit(process_id) == Admission::Dispatched {
            self.settle_dispatch(Some(process_id));
        }
        process_id
    }

    fn fork(&mut self) -> Result<ProcessId, KernelError> {
        let parent = self.require_running("fork")?;
        let now = self.clock.tick();

        let child = self.processes.allocate_id();
        if let Some(record) = self.processes.get_mut(parent) {
            record.children.push(child);
        }
        self.processes
            .insert(ProcessRecord::child(child, parent, now));
        debug!(
            "proc: Forked (parent: {}, child: {})",
            parent.as_u32(),
            child.as_u32()
        );
        self.record(KernelEvent::ProcessForked { parent, child });

        // Never touched by the child yet, so it is the first eviction victim
        self.page_in(child, FORK_PAGE, Instant::default());
        self.scheduler.enqueue(child);
        Ok(child)
    }

    fn exit(&mut self) -> Result<(), KernelError> {
        let exiting = self.require_running("exit")?;
        let parent = self.processes.require(exiting)?.parent;
        self.clock.tick();
        debug!("proc: Exited (pid: {})", exiting.as_u32());
        self.record(KernelEvent::ProcessExited {
            process_id: exiting,
        });

        let doomed = self.processes.subtree(exiting);
        for &process_id in &doomed {
            let count = self.frames.release_process(process_id);
            if count > 0 {
                self.record(KernelEvent::FramesReleased { process_id, count });
            }
        }
        for &process_id in doomed.iter().skip(1) {
            self.scheduler.remove(process_id);
            if self.processes.remove(process_id).is_some() {
                debug!("proc: Terminated (pid: {})", process_id.as_u32());
                self.record(KernelEvent::ProcessTerminated { process_id });
            }
        }

        self.notify_parent(exiting, parent);

        let next = self.scheduler.vacate_after_exit(exiting);
        self.settle_dispatch(next);
        Ok(())
    }

    fn wait(&mut self) -> Result<(), KernelError> {
        let caller = self.require_running("wait")?;
        let zombie = self.processes.require(caller)?.zombies.first().copied();
        self.clock.tick();

        if let Some(child) = zombie {
            if let Some(record) = self.processes.get_mut(caller) {
                record.zombies.retain(|&z| z != child);
            }
            self.frames.release_process(child);
            self.processes.remove(child);
            debug!(
                "proc: Reaped (parent: {}, child: {})",
                caller.as_u32(),
                child.as_u32()
            );
            self.record(KernelEvent::ZombieReaped {
                parent: caller,
                child,
            });
            return Ok(());
        }

        self.processes.set_state(caller, ProcessState::Waiting);
        self.record(KernelEvent::WaitBlocked { process_id: caller });
        let next = self.scheduler.yield_waiting();
        self.settle_dispatch(next);
        Ok(())
    }

    fn timer_interrupt(&mut self) {
        if self.scheduler.is_idle() && self.scheduler.queued_count() == 0 {
            return;
        }
        self.clock.tick();

        let rotation = self.scheduler.rotate();
        if let Some(process_id) = rotation.preempted {
            self.processes.set_state(process_id, ProcessState::Ready);
            self.record(KernelEvent::Preempted { process_id });
        }
        self.settle_dispatch(rotation.dispatched);
    }

    fn request_disk_read(&mut self, disk: DiskId, file_name: &str) -> Result<(), KernelError> {
        let process_id = self.require_running("disk read")?;
        self.disks.queue(disk)?;
        self.clock.tick();

        self.disks
            .enqueue(disk, FileReadRequest::new(process_id, file_name))?;
        self.processes.set_state(process_id, ProcessState::Blocked);
        debug!(
            "disk: Requested (disk: {}, pid: {}, file: {})",
            disk.index(),
            process_id.as_u32(),
            file_name
        );
        self.record(KernelEvent::DiskRequested {
            disk,
            process_id,
            file_name: file_name.to_string(),
        });

        let next = self.scheduler.vacate();
        self.settle_dispatch(next);
        Ok(())
    }

    fn complete_disk_job(&mut self, disk: DiskId) -> Result<(), KernelError> {
        let process_id = self
            .disks
            .front(disk)?
            .map(|request| request.process_id)
            .ok_or(KernelError::DiskIdle { disk })?;
        self.clock.tick();

        if self.processes.state(process_id) != Some(ProcessState::Blocked) {
            warn!(
                "disk: Completion ignored (disk: {}, pid: {})",
                disk.index(),
                process_id.as_u32()
            );
            self.record(KernelEvent::DiskCompletionIgnored { disk, process_id });
            return Ok(());
        }

        self.record(KernelEvent::DiskCompleted { disk, process_id });
        match self.scheduler.admit(process_id) {
            Admission::Dispatched => self.settle_dispatch(Some(process_id)),
            Admission::Queued => self.processes.set_state(process_id, ProcessState::Ready),
        }
        Ok(())
    }

    fn access_memory(&mut self, address: u64) -> Result<PageAccess, KernelError> {
        let process_id = self.require_running("memory access")?;
        let now = self.clock.tick();
        let page_number = PageNumber::containing(address, self.config.page_size);
        Ok(self.page_in(process_id, page_number, now))
    }

    fn current_process(&self) -> ProcessId {
        self.scheduler.running().unwrap_or(NO_PROCESS)
    }

    fn ready_queue(&self) -> Vec<ProcessId> {
        self.scheduler.ready_queue()
    }

    fn memory(&self) -> Vec<MemoryFrame> {
        self.frames.frames().to_vec()
    }

    fn pop_disk_request(&mut self, disk: DiskId) -> Option<FileReadRequest> {
        self.disks.pop(disk)
    }

    fn disk_queue(&self, disk: DiskId) -> Result<Vec<FileReadRequest>, KernelError> {
        self.disks.snapshot(disk)
    }
}
