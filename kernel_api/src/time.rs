//! Time abstractions

use serde::{Deserialize, Serialize};

/// A point in logical time
///
/// The simulated kernel has no wall clock. Its clock advances one tick per
/// step, so instants are strictly ordered and reproducible across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Instant {
    /// Ticks since the kernel was constructed
    ticks: u64,
}

impl Instant {
    /// Creates an instant from a tick count
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Returns ticks since construction
    pub const fn as_ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the number of ticks since another instant
    pub fn ticks_since(&self, earlier: Instant) -> u64 {
        self.ticks.saturating_sub(earlier.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_ordering() {
        let i1 = Instant::from_ticks(1);
        let i2 = Instant::from_ticks(2);
        assert!(i1 < i2);
        assert_eq!(Instant::default(), Instant::from_ticks(0));
    }

    #[test]
    fn test_ticks_since() {
        let i1 = Instant::from_ticks(10);
        let i2 = Instant::from_ticks(25);
        assert_eq!(i2.ticks_since(i1), 15);
        assert_eq!(i1.ticks_since(i2), 0);
    }
}
