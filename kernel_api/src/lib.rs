//! # Kernel API
//!
//! This crate defines the interface between the simulation driver and the
//! simulated kernel.
//!
//! ## Philosophy
//!
//! The driver delivers events, the kernel keeps the books:
//! - Every system call or interrupt is one synchronous method call
//! - State is read back through query methods, never shared
//! - Precondition violations are explicit errors, never panics
//!
//! ## Design Goals
//!
//! 1. **Testability**: any implementation of [`KernelApi`] can be driven by
//!    the same scripted traces
//! 2. **Determinism**: time is logical ([`Instant`]), not wall-clock
//! 3. **Atomicity**: an operation either fully applies or returns an error
//!    without touching state
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A trace text parser or result printer (the driver owns those)
//! - A timing model for disks or memory

pub mod error;
pub mod frame;
pub mod kernel;
pub mod syscalls;
pub mod time;

pub use error::KernelError;
pub use frame::{MemoryFrame, PageAccess};
pub use kernel::KernelApi;
pub use syscalls::{
    apply, replay, Syscall, SyscallError, SyscallErrorKind, SyscallOutcome, SyscallResponse,
    SyscallResult,
};
pub use time::Instant;
