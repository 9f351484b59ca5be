//! Identifiers for simulated entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a simulated process
///
/// Identifiers are assigned in creation order starting at 1 and are never
/// reused. The value 0 is reserved for [`NO_PROCESS`].
///
/// The default identifier is [`NO_PROCESS`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProcessId(u32);

/// Sentinel reported when no process occupies the CPU
pub const NO_PROCESS: ProcessId = ProcessId(0);

impl ProcessId {
    /// Creates a process ID from its raw value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true for the idle sentinel
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Returns the identifier that follows this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Process(none)")
        } else {
            write!(f, "Process({})", self.0)
        }
    }
}

/// Index of a simulated disk
///
/// Disks are numbered from 0. Whether an index is in range depends on the
/// kernel configuration, so validation happens in the kernel, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiskId(usize);

impl DiskId {
    /// Creates a disk ID from its index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for DiskId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for DiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Disk({})", self.0)
    }
}
