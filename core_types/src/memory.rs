//! Paging types
//!
//! Pages are uniform: every page (and therefore every frame) is exactly
//! `page_size` bytes. There are no partial pages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical page number within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageNumber(u64);

impl PageNumber {
    /// Creates a page number from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the page that contains `address`
    ///
    /// Integer division; `page_size` must be non-zero (the kernel
    /// configuration guarantees this).
    pub const fn containing(address: u64, page_size: u64) -> Self {
        Self(address / page_size)
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the first logical address of this page
    pub const fn base_address(&self, page_size: u64) -> u64 {
        self.0 * page_size
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}
