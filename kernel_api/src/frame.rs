//! Resident memory frames

use crate::Instant;
use core_types::{PageNumber, ProcessId};
use serde::{Deserialize, Serialize};

/// One resident page in simulated RAM
///
/// No two frames ever share the same `(process_id, page_number)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryFrame {
    /// Process owning the page
    pub process_id: ProcessId,
    /// Logical page held by this frame
    pub page_number: PageNumber,
    /// Last time the page was touched
    pub last_accessed: Instant,
}

impl MemoryFrame {
    /// Creates a frame loaded at `now`
    pub fn new(process_id: ProcessId, page_number: PageNumber, now: Instant) -> Self {
        Self {
            process_id,
            page_number,
            last_accessed: now,
        }
    }

    /// Returns true if this frame holds the given page of the given process
    pub fn holds(&self, process_id: ProcessId, page_number: PageNumber) -> bool {
        self.process_id == process_id && self.page_number == page_number
    }
}

/// Result of a memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageAccess {
    /// The page was resident; its timestamp was refreshed
    Hit,
    /// The page was loaded, possibly evicting the least recently used frame
    Fault { evicted: Option<MemoryFrame> },
}

impl PageAccess {
    /// Returns true if the access loaded a page
    pub fn is_fault(&self) -> bool {
        matches!(self, PageAccess::Fault { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_holds() {
        let frame = MemoryFrame::new(ProcessId::new(1), PageNumber::new(3), Instant::from_ticks(5));
        assert!(frame.holds(ProcessId::new(1), PageNumber::new(3)));
        assert!(!frame.holds(ProcessId::new(2), PageNumber::new(3)));
        assert!(!frame.holds(ProcessId::new(1), PageNumber::new(4)));
    }

    #[test]
    fn test_page_access_is_fault() {
        assert!(!PageAccess::Hit.is_fault());
        assert!(PageAccess::Fault { evicted: None }.is_fault());
    }
}
