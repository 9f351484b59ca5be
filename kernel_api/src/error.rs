//! Kernel error types

use core_types::{DiskId, ProcessId};
use thiserror::Error;

/// Errors that can occur when driving the kernel
///
/// All of these are contract violations by the caller. None is transient,
/// so nothing is ever retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The operation needs a running process but the CPU is idle
    #[error("CPU is idle: {operation} requires a running process")]
    CpuIdle { operation: &'static str },

    /// Disk index outside the configured range
    #[error("Invalid disk: {disk} (configured disks: {disk_count})")]
    InvalidDisk { disk: DiskId, disk_count: usize },

    /// Completion signalled for a disk with nothing queued
    #[error("Disk has no pending request: {disk}")]
    DiskIdle { disk: DiskId },

    /// A process identifier has no record in the process table
    #[error("Unknown process: {0}")]
    UnknownProcess(ProcessId),

    /// Construction with an unusable configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl KernelError {
    /// Returns true for the "CPU idle" precondition violation
    pub fn is_cpu_idle(&self) -> bool {
        matches!(self, KernelError::CpuIdle { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_idle_message_names_operation() {
        let err = KernelError::CpuIdle { operation: "fork" };
        assert!(err.is_cpu_idle());
        assert_eq!(err.to_string(), "CPU is idle: fork requires a running process");
    }

    #[test]
    fn test_invalid_disk_message() {
        let err = KernelError::InvalidDisk {
            disk: DiskId::new(4),
            disk_count: 2,
        };
        assert!(!err.is_cpu_idle());
        assert_eq!(err.to_string(), "Invalid disk: Disk(4) (configured disks: 2)");
    }
}
