//! # Simulated Clock
//!
//! Deterministic logical clock for the simulated kernel.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! The kernel never reads wall-clock time. The clock only advances when the
//! kernel steps it, once per applied operation, so every timestamp it hands
//! out is strictly greater than the previous one. LRU ordering therefore
//! never sees two frames touched at the same instant.

use kernel_api::Instant;

/// Logical clock with controllable progression
///
/// # Examples
///
/// ```
/// use sim_kernel::clock::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now().as_ticks(), 0);
///
/// let first = clock.tick();
/// let second = clock.tick();
/// assert!(first < second);
/// assert_eq!(clock.now(), second);
/// ```
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Current tick count
    ticks: u64,
}

impl SimClock {
    /// Creates a new clock starting at tick 0
    pub fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Creates a clock starting at a specific tick count
    ///
    /// Useful for tests that need to start with a non-zero time.
    pub fn with_initial_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Advances the clock by one tick and returns the new instant
    ///
    /// Saturates at `u64::MAX` rather than wrapping, which keeps the clock
    /// monotonic.
    pub fn tick(&mut self) -> Instant {
        self.ticks = self.ticks.saturating_add(1);
        Instant::from_ticks(self.ticks)
    }

    /// Returns the current instant without advancing
    pub fn now(&self) -> Instant {
        Instant::from_ticks(self.ticks)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = SimClock::new();
        assert_eq!(clock.now(), Instant::from_ticks(0));
    }

    #[test]
    fn test_tick_is_strictly_monotonic() {
        let mut clock = SimClock::new();
        let mut previous = clock.now();
        for _ in 0..100 {
            let next = clock.tick();
            assert!(next > previous);
            previous = next;
        }
        assert_eq!(clock.now().as_ticks(), 100);
    }

    #[test]
    fn test_with_initial_ticks() {
        let mut clock = SimClock::with_initial_ticks(41);
        assert_eq!(clock.tick(), Instant::from_ticks(42));
    }

    #[test]
    fn test_tick_saturates() {
        let mut clock = SimClock::with_initial_ticks(u64::MAX);
        assert_eq!(clock.tick().as_ticks(), u64::MAX);
    }
}
