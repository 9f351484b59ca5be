//! Per-disk I/O queues.
//!
//! Each disk serves read requests in FIFO order. The set of disks is fixed
//! when the kernel is built and never resized.

use core_types::{DiskId, FileReadRequest, ProcessId};
use kernel_api::KernelError;
use std::collections::VecDeque;

/// FIFO queue of read requests for one disk.
#[derive(Debug, Clone, Default)]
pub struct DiskQueue {
    requests: VecDeque<FileReadRequest>,
}

impl DiskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            requests: VecDeque::new(),
        }
    }

    /// Returns the number of pending requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns whether the disk is idle.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Appends a request. Queues are unbounded.
    pub fn push(&mut self, request: FileReadRequest) {
        self.requests.push_back(request);
    }

    /// Returns the request being served.
    pub fn front(&self) -> Option<&FileReadRequest> {
        self.requests.front()
    }

    /// Pops the request being served.
    pub fn pop(&mut self) -> Option<FileReadRequest> {
        self.requests.pop_front()
    }

    /// Iterates from the request being served to the last one queued.
    pub fn iter(&self) -> impl Iterator<Item = &FileReadRequest> {
        self.requests.iter()
    }
}

/// The fixed set of disks.
#[derive(Debug, Clone)]
pub struct DiskQueues {
    disks: Vec<DiskQueue>,
}

impl DiskQueues {
    /// Creates `disk_count` idle disks.
    pub fn new(disk_count: usize) -> Self {
        Self {
            disks: vec![DiskQueue::new(); disk_count],
        }
    }

    /// Returns the number of disks.
    pub fn disk_count(&self) -> usize {
        self.disks.len()
    }

    /// Returns the queue of a disk, or `InvalidDisk`.
    pub fn queue(&self, disk: DiskId) -> Result<&DiskQueue, KernelError> {
        self.disks.get(disk.index()).ok_or(KernelError::InvalidDisk {
            disk,
            disk_count: self.disks.len(),
        })
    }

    fn queue_mut(&mut self, disk: DiskId) -> Result<&mut DiskQueue, KernelError> {
        let disk_count = self.disks.len();
        self.disks
            .get_mut(disk.index())
            .ok_or(KernelError::InvalidDisk { disk, disk_count })
    }

    /// Queues a request on a disk.
    pub fn enqueue(&mut self, disk: DiskId, request: FileReadRequest) -> Result<(), KernelError> {
        self.queue_mut(disk)?.push(request);
        Ok(())
    }

    /// Returns the request being served by a disk.
    ///
    /// `Ok(None)` means the disk exists but is idle.
    pub fn front(&self, disk: DiskId) -> Result<Option<&FileReadRequest>, KernelError> {
        Ok(self.queue(disk)?.front())
    }

    /// Removes the request being served.
    ///
    /// Permissive: an idle or out-of-range disk yields `None`.
    pub fn pop(&mut self, disk: DiskId) -> Option<FileReadRequest> {
        self.disks.get_mut(disk.index()).and_then(DiskQueue::pop)
    }

    /// Copies a disk's pending requests, next-to-be-served first.
    pub fn snapshot(&self, disk: DiskId) -> Result<Vec<FileReadRequest>, KernelError> {
        Ok(self.queue(disk)?.iter().cloned().collect())
    }

    /// Counts requests issued by a process across all disks.
    pub fn pending_for(&self, process_id: ProcessId) -> usize {
        self.disks
            .iter()
            .flat_map(|queue| queue.iter())
            .filter(|request| request.process_id == process_id)
            .count()
    }

    /// Counts all pending requests.
    pub fn total_pending(&self) -> usize {
        self.disks.iter().map(DiskQueue::len).sum()
    }
}
