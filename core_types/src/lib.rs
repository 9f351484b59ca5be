//! # Core Types
//!
//! This crate defines the value types shared by every layer of the
//! process-lifecycle simulator.
//!
//! ## Philosophy
//!
//! - **Identifiers are handles, not references**: processes refer to each
//!   other by [`ProcessId`], so removing a record can never leave a dangling
//!   pointer behind.
//! - **Plain data**: everything here is `Copy` or cheaply `Clone`, and
//!   serializable so the driver can snapshot state.
//!
//! ## Key Types
//!
//! - [`ProcessId`]: Identifier of a simulated process ([`NO_PROCESS`] = idle CPU)
//! - [`DiskId`]: Index of a simulated disk
//! - [`PageNumber`]: Logical page of a process
//! - [`FileReadRequest`]: One pending disk read

pub mod disk;
pub mod ids;
pub mod memory;

pub use disk::FileReadRequest;
pub use ids::{DiskId, ProcessId, NO_PROCESS};
pub use memory::PageNumber;
