//! Frame table for SimulatedKernel
//!
//! This module implements demand paging over a fixed amount of simulated
//! RAM. Frames are kept in load order; the least recently used frame
//! across *all* processes is evicted when RAM is full.

use core_types::{PageNumber, ProcessId};
use kernel_api::{Instant, MemoryFrame, PageAccess};

/// Resident frames of simulated RAM
#[derive(Debug)]
pub struct FrameTable {
    /// Resident frames in load order
    frames: Vec<MemoryFrame>,
    page_size: u64,
    capacity_bytes: u64,
}

impl FrameTable {
    /// Creates an empty frame table
    ///
    /// `page_size` must be non-zero; the kernel configuration validates it.
    pub fn new(page_size: u64, capacity_bytes: u64) -> Self {
        Self {
            frames: Vec::new(),
            page_size,
            capacity_bytes,
        }
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    /// Number of whole frames that fit in RAM
    pub fn frame_capacity(&self) -> u64 {
        self.capacity_bytes.checked_div(self.page_size).unwrap_or(0)
    }

    /// Bytes currently occupied by resident frames
    pub fn resident_bytes(&self) -> u64 {
        (self.frames.len() as u64).saturating_mul(self.page_size)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resident frames in load order
    pub fn frames(&self) -> &[MemoryFrame] {
        &self.frames
    }

    /// Resident frames of one process
    pub fn frames_of(&self, process_id: ProcessId) -> impl Iterator<Item = &MemoryFrame> {
        self.frames
            .iter()
            .filter(move |frame| frame.process_id == process_id)
    }

    pub fn is_resident(&self, process_id: ProcessId, page_number: PageNumber) -> bool {
        self.frames
            .iter()
            .any(|frame| frame.holds(process_id, page_number))
    }

    /// Touches a page, loading it on a miss
    pub fn access(
        &mut self,
        process_id: ProcessId,
        page_number: PageNumber,
        now: Instant,
    ) -> PageAccess {
        if self.touch(process_id, page_number, now) {
            PageAccess::Hit
        } else {
            let evicted = self.load(process_id, page_number, now);
            PageAccess::Fault { evicted }
        }
    }

    /// Refreshes the timestamp of a resident page
    ///
    /// Returns false if the page is not resident.
    pub fn touch(&mut self, process_id: ProcessId, page_number: PageNumber, now: Instant) -> bool {
        match self
            .frames
            .iter_mut()
            .find(|frame| frame.holds(process_id, page_number))
        {
            Some(frame) => {
                frame.last_accessed = now;
                true
            }
            None => false,
        }
    }

    /// Loads a page that is not resident
    ///
    /// If every whole frame of RAM is taken, the least recently used frame
    /// is evicted first and returned. A page that is already resident is
    /// only touched, so a (process, page) pair is never held twice.
    pub fn load(
        &mut self,
        process_id: ProcessId,
        page_number: PageNumber,
        now: Instant,
    ) -> Option<MemoryFrame> {
        if self.touch(process_id, page_number, now) {
            return None;
        }

        let evicted = if self.frames.len() as u64 >= self.frame_capacity() {
            self.least_recently_used()
                .map(|index| self.frames.remove(index))
        } else {
            None
        };

        self.frames
            .push(MemoryFrame::new(process_id, page_number, now));
        evicted
    }

    /// Releases every frame of a process
    ///
    /// Returns the number of frames released.
    pub fn release_process(&mut self, process_id: ProcessId) -> usize {
        let before = self.frames.len();
        self.frames.retain(|frame| frame.process_id != process_id);
        before - self.frames.len()
    }

    /// Index of the frame with the oldest access time
    ///
    /// Strictly-older comparison, so the first of several equally old
    /// frames (in load order) wins.
    fn least_recently_used(&self) -> Option<usize> {
        let mut oldest: Option<(usize, Instant)> = None;
        for (index, frame) in self.frames.iter().enumerate() {
            match oldest {
                Some((_, stamp)) if frame.last_accessed >= stamp => {}
                _ => oldest = Some((index, frame.last_accessed)),
            }
        }
        oldest.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> ProcessId {
        ProcessId::new(raw)
    }

    fn page(raw: u64) -> PageNumber {
        PageNumber::new(raw)
    }

    fn at(ticks: u64) -> Instant {
        Instant::from_ticks(ticks)
    }

    #[test]
    fn test_miss_then_hit() {
        let mut table = FrameTable::new(64, 256);

        assert_eq!(
            table.access(pid(1), page(0), at(1)),
            PageAccess::Fault { evicted: None }
        );
        assert_eq!(table.access(pid(1), page(0), at(2)), PageAccess::Hit);
        assert_eq!(table.len(), 1);
        assert_eq!(table.frames()[0].last_accessed, at(2));
    }

    #[test]
    fn test_same_page_different_processes_are_distinct() {
        let mut table = FrameTable::new(64, 256);
        table.access(pid(1), page(0), at(1));
        table.access(pid(2), page(0), at(2));

        assert_eq!(table.len(), 2);
        assert!(table.is_resident(pid(1), page(0)));
        assert!(table.is_resident(pid(2), page(0)));
        assert_eq!(table.resident_bytes(), 128);
    }

    #[test]
    fn test_lru_eviction_when_full() {
        // Two frames of RAM
        let mut table = FrameTable::new(64, 128);
        table.access(pid(1), page(0), at(1));
        table.access(pid(1), page(1), at(2));

        let access = table.access(pid(1), page(2), at(3));
        match access {
            PageAccess::Fault {
                evicted: Some(frame),
            } => {
                assert!(frame.holds(pid(1), page(0)));
                assert_eq!(frame.last_accessed, at(1));
            }
            other => panic!("expected eviction, got {:?}", other),
        }

        assert!(!table.is_resident(pid(1), page(0)));
        assert!(table.is_resident(pid(1), page(1)));
        assert!(table.is_resident(pid(1), page(2)));
        assert_eq!(table.resident_bytes(), 128);
    }

    #[test]
    fn test_hit_protects_page_from_eviction() {
        let mut table = FrameTable::new(64, 128);
        table.access(pid(1), page(0), at(1));
        table.access(pid(1), page(1), at(2));
        table.access(pid(1), page(0), at(3));

        table.access(pid(1), page(2), at(4));
        assert!(table.is_resident(pid(1), page(0)));
        assert!(!table.is_resident(pid(1), page(1)));
    }

    #[test]
    fn test_eviction_is_global_across_processes() {
        let mut table = FrameTable::new(64, 128);
        table.access(pid(2), page(7), at(1));
        table.access(pid(1), page(0), at(2));

        table.access(pid(1), page(1), at(3));
        assert!(!table.is_resident(pid(2), page(7)));
        assert_eq!(table.frames_of(pid(1)).count(), 2);
    }

    #[test]
    fn test_ties_evict_first_loaded() {
        let mut table = FrameTable::new(64, 128);
        table.load(pid(1), page(0), at(5));
        table.load(pid(2), page(0), at(5));

        let evicted = table.load(pid(3), page(0), at(6)).unwrap();
        assert!(evicted.holds(pid(1), page(0)));
    }

    #[test]
    fn test_load_of_resident_page_only_touches() {
        let mut table = FrameTable::new(64, 64);
        table.load(pid(1), page(0), at(1));
        assert_eq!(table.load(pid(1), page(0), at(2)), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.frames()[0].last_accessed, at(2));
    }

    #[test]
    fn test_partial_frame_capacity_rounds_down() {
        // 150 bytes hold two whole 64-byte frames
        let mut table = FrameTable::new(64, 150);
        assert_eq!(table.frame_capacity(), 2);
        table.access(pid(1), page(0), at(1));
        table.access(pid(1), page(1), at(2));
        assert_eq!(table.len(), 2);

        let access = table.access(pid(1), page(2), at(3));
        assert!(matches!(access, PageAccess::Fault { evicted: Some(_) }));
        assert_eq!(table.len(), 2);
        assert!(table.resident_bytes() <= table.capacity_bytes());
    }

    #[test]
    fn test_huge_pages_evict_without_overflow() {
        let mut table = FrameTable::new(1 << 63, u64::MAX);
        assert_eq!(table.frame_capacity(), 1);

        table.access(pid(1), page(0), at(1));
        let access = table.access(pid(1), page(1), at(2));
        assert_eq!(
            access,
            PageAccess::Fault {
                evicted: Some(MemoryFrame::new(pid(1), page(0), at(1)))
            }
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.resident_bytes(), 1 << 63);
    }

    #[test]
    fn test_release_process() {
        let mut table = FrameTable::new(64, 512);
        table.access(pid(1), page(0), at(1));
        table.access(pid(2), page(0), at(2));
        table.access(pid(1), page(1), at(3));

        assert_eq!(table.release_process(pid(1)), 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.release_process(pid(1)), 0);
        assert!(table.is_resident(pid(2), page(0)));
    }
}
