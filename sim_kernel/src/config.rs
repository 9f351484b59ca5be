//! Kernel configuration
//!
//! The configuration is fixed at construction. Nothing in the kernel can
//! resize RAM, change the page size or add disks afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Page size must be non-zero")]
    ZeroPageSize,

    #[error("RAM ({ram_bytes} bytes) cannot hold a single {page_size}-byte page")]
    RamSmallerThanPage { ram_bytes: u64, page_size: u64 },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulated machine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Number of disks, each with its own I/O queue
    pub disk_count: usize,
    /// Total RAM capacity in bytes
    pub ram_bytes: u64,
    /// Page (and frame) size in bytes
    pub page_size: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            disk_count: 2,
            ram_bytes: 4096,
            page_size: 64,
        }
    }
}

impl KernelConfig {
    /// Creates a configuration from the three machine parameters
    pub fn new(disk_count: usize, ram_bytes: u64, page_size: u64) -> Self {
        Self {
            disk_count,
            ram_bytes,
            page_size,
        }
    }

    /// Parses and validates a JSON configuration
    ///
    /// Missing fields fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Partial {
            disk_count: Option<usize>,
            ram_bytes: Option<u64>,
            page_size: Option<u64>,
        }

        let partial: Partial = serde_json::from_str(json)?;
        let defaults = Self::default();
        let config = Self {
            disk_count: partial.disk_count.unwrap_or(defaults.disk_count),
            ram_bytes: partial.ram_bytes.unwrap_or(defaults.ram_bytes),
            page_size: partial.page_size.unwrap_or(defaults.page_size),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_disk_count(mut self, disk_count: usize) -> Self {
        self.disk_count = disk_count;
        self
    }

    pub fn with_ram_bytes(mut self, ram_bytes: u64) -> Self {
        self.ram_bytes = ram_bytes;
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Checks that RAM can hold at least one page
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.ram_bytes < self.page_size {
            return Err(ConfigError::RamSmallerThanPage {
                ram_bytes: self.ram_bytes,
                page_size: self.page_size,
            });
        }
        Ok(())
    }

    /// Number of whole frames that fit in RAM
    pub fn frame_capacity(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.ram_bytes / self.page_size
        }
    }
}
