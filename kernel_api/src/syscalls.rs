//! Typed syscall events.
//!
//! A [`Syscall`] names one event the driver can deliver. [`apply`] routes it
//! to the matching [`KernelApi`] method, and [`replay`] runs a whole trace,
//! collecting one [`SyscallResponse`] per step so a failed step does not
//! hide the ones after it.

use crate::{KernelApi, KernelError, PageAccess};
use core_types::{DiskId, ProcessId};
use serde::{Deserialize, Serialize};

/// One event delivered by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Syscall {
    CreateProcess,
    Fork,
    Exit,
    Wait,
    TimerInterrupt,
    DiskRead { disk: DiskId, file_name: String },
    DiskCompleted { disk: DiskId },
    AccessMemory { address: u64 },
}

impl Syscall {
    /// Parses a JSON array of syscalls
    pub fn parse_trace(json: &str) -> Result<Vec<Syscall>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the operation name used in audit output and errors
    pub fn name(&self) -> &'static str {
        match self {
            Syscall::CreateProcess => "create_process",
            Syscall::Fork => "fork",
            Syscall::Exit => "exit",
            Syscall::Wait => "wait",
            Syscall::TimerInterrupt => "timer_interrupt",
            Syscall::DiskRead { .. } => "disk_read",
            Syscall::DiskCompleted { .. } => "disk_completed",
            Syscall::AccessMemory { .. } => "access_memory",
        }
    }
}

/// What a successful syscall produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyscallOutcome {
    Created(ProcessId),
    Forked(ProcessId),
    Exited,
    Waited,
    Preempted,
    DiskRequested,
    DiskCompleted,
    MemoryAccessed(PageAccess),
}

/// Result type used in syscall responses.
pub type SyscallResult<T> = Result<T, SyscallError>;

/// Serializable syscall error details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallError {
    pub kind: SyscallErrorKind,
    pub message: String,
}

/// Error kinds aligned with KernelError variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyscallErrorKind {
    CpuIdle,
    InvalidDisk,
    DiskIdle,
    UnknownProcess,
    InvalidConfig,
}

impl From<KernelError> for SyscallError {
    fn from(error: KernelError) -> Self {
        let kind = match &error {
            KernelError::CpuIdle { .. } => SyscallErrorKind::CpuIdle,
            KernelError::InvalidDisk { .. } => SyscallErrorKind::InvalidDisk,
            KernelError::DiskIdle { .. } => SyscallErrorKind::DiskIdle,
            KernelError::UnknownProcess(_) => SyscallErrorKind::UnknownProcess,
            KernelError::InvalidConfig(_) => SyscallErrorKind::InvalidConfig,
        };
        SyscallError {
            kind,
            message: error.to_string(),
        }
    }
}

/// One step of a replayed trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallResponse {
    /// Position of the syscall in the trace
    pub step: usize,
    pub syscall: Syscall,
    pub result: SyscallResult<SyscallOutcome>,
    /// Process on the CPU after the step
    pub running: ProcessId,
}

/// Delivers one syscall to a kernel
pub fn apply<K: KernelApi>(kernel: &mut K, syscall: &Syscall) -> Result<SyscallOutcome, KernelError> {
    match syscall {
        Syscall::CreateProcess => Ok(SyscallOutcome::Created(kernel.create_process())),
        Syscall::Fork => kernel.fork().map(SyscallOutcome::Forked),
        Syscall::Exit => kernel.exit().map(|_| SyscallOutcome::Exited),
        Syscall::Wait => kernel.wait().map(|_| SyscallOutcome::Waited),
        Syscall::TimerInterrupt => {
            kernel.timer_interrupt();
            Ok(SyscallOutcome::Preempted)
        }
        Syscall::DiskRead { disk, file_name } => kernel
            .request_disk_read(*disk, file_name)
            .map(|_| SyscallOutcome::DiskRequested),
        Syscall::DiskCompleted { disk } => kernel
            .complete_disk_job(*disk)
            .map(|_| SyscallOutcome::DiskCompleted),
        Syscall::AccessMemory { address } => kernel
            .access_memory(*address)
            .map(SyscallOutcome::MemoryAccessed),
    }
}

/// Delivers every syscall of a trace in order
///
/// Failed steps are reported in place; the trace keeps going because a
/// failed step leaves the kernel unchanged.
pub fn replay<K: KernelApi>(kernel: &mut K, trace: &[Syscall]) -> Vec<SyscallResponse> {
    trace
        .iter()
        .enumerate()
        .map(|(step, syscall)| {
            let result = apply(kernel, syscall).map_err(SyscallError::from);
            SyscallResponse {
                step,
                syscall: syscall.clone(),
                result,
                running: kernel.current_process(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace() {
        let json = r#"[
            {"op": "create_process"},
            {"op": "fork"},
            {"op": "disk_read", "disk": 1, "file_name": "a.txt"},
            {"op": "disk_completed", "disk": 1},
            {"op": "access_memory", "address": 4096},
            {"op": "timer_interrupt"}
        ]"#;

        let trace = Syscall::parse_trace(json).unwrap();
        assert_eq!(trace.len(), 6);
        assert_eq!(trace[0], Syscall::CreateProcess);
        assert_eq!(
            trace[2],
            Syscall::DiskRead {
                disk: DiskId::new(1),
                file_name: "a.txt".to_string()
            }
        );
        assert_eq!(trace[4], Syscall::AccessMemory { address: 4096 });
    }

    #[test]
    fn test_parse_trace_rejects_unknown_op() {
        let json = r#"[{"op": "reboot"}]"#;
        assert!(Syscall::parse_trace(json).is_err());
    }

    #[test]
    fn test_syscall_names() {
        assert_eq!(Syscall::Wait.name(), "wait");
        assert_eq!(Syscall::DiskCompleted { disk: DiskId::new(0) }.name(), "disk_completed");
    }

    #[test]
    fn test_error_conversion_keeps_kind_and_message() {
        let err: SyscallError = KernelError::CpuIdle { operation: "exit" }.into();
        assert_eq!(err.kind, SyscallErrorKind::CpuIdle);
        assert!(err.message.contains("exit"));

        let err: SyscallError = KernelError::DiskIdle { disk: DiskId::new(0) }.into();
        assert_eq!(err.kind, SyscallErrorKind::DiskIdle);
    }
}
