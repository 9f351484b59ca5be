//! Disk request types

use crate::ProcessId;
use serde::{Deserialize, Serialize};

/// A pending file read on one disk
///
/// Owned by exactly one disk queue from the moment it is requested until
/// the driver pops it after completion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileReadRequest {
    /// Process that issued the read
    pub process_id: ProcessId,
    /// Name of the file being read
    pub file_name: String,
}

impl FileReadRequest {
    /// Creates a new read request
    pub fn new(process_id: ProcessId, file_name: impl Into<String>) -> Self {
        Self {
            process_id,
            file_name: file_name.into(),
        }
    }
}
