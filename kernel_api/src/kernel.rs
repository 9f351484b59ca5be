//! Kernel API trait

use crate::{KernelError, MemoryFrame, PageAccess};
use core_types::{DiskId, FileReadRequest, ProcessId};

/// The kernel API trait
///
/// This defines the interface between the simulation driver and a kernel.
/// Every method is one atomic step: the driver calls them strictly in
/// sequence and no call is ever interrupted by another.
///
/// # Design Principles
///
/// **Events in, state out**: mutating methods correspond to system calls and
/// interrupts; query methods return snapshots the driver can print.
///
/// **Validate, then mutate**: an `Err` means nothing changed.
///
/// # Example
///
/// ```
/// use kernel_api::{KernelApi, KernelError};
///
/// fn spawn_pair<K: KernelApi>(kernel: &mut K) -> Result<(), KernelError> {
///     kernel.create_process();
///     let child = kernel.fork()?;
///     println!("forked {}", child);
///     Ok(())
/// }
/// ```
pub trait KernelApi {
    /// Registers a new root process
    ///
    /// The process takes the CPU if it is idle, otherwise it joins the back
    /// of the ready queue.
    fn create_process(&mut self) -> ProcessId;

    /// The running process forks a child
    ///
    /// The child is queued as ready and owns page 0 of its address space.
    fn fork(&mut self) -> Result<ProcessId, KernelError>;

    /// The running process exits, terminating all of its descendants
    fn exit(&mut self) -> Result<(), KernelError>;

    /// The running process waits for any child to terminate
    ///
    /// Reaps a zombie child and keeps running if one exists; otherwise the
    /// caller yields the CPU.
    fn wait(&mut self) -> Result<(), KernelError>;

    /// The running process's time slice is over
    fn timer_interrupt(&mut self);

    /// The running process reads `file_name` from `disk` and yields the CPU
    fn request_disk_read(&mut self, disk: DiskId, file_name: &str) -> Result<(), KernelError>;

    /// The request at the front of `disk`'s queue has been served
    ///
    /// The request stays queued until [`KernelApi::pop_disk_request`]
    /// removes it.
    fn complete_disk_job(&mut self, disk: DiskId) -> Result<(), KernelError>;

    /// The running process touches a logical address
    fn access_memory(&mut self, address: u64) -> Result<PageAccess, KernelError>;

    /// Process on the CPU, or [`core_types::NO_PROCESS`] when idle
    fn current_process(&self) -> ProcessId;

    /// Ready queue from head to tail
    fn ready_queue(&self) -> Vec<ProcessId>;

    /// Every resident frame
    fn memory(&self) -> Vec<MemoryFrame>;

    /// Removes and returns the request being served by `disk`
    ///
    /// Permissive: an idle or unknown disk yields `None`.
    fn pop_disk_request(&mut self, disk: DiskId) -> Option<FileReadRequest>;

    /// Pending requests of `disk`, next-to-be-served first
    fn disk_queue(&self, disk: DiskId) -> Result<Vec<FileReadRequest>, KernelError>;
}
