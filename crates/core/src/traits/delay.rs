//! Delay abstraction for blocking between ramp steps.
//!
//! This module provides the `Delay` trait that abstracts over the way a
//! platform waits (thread sleep, shutdown-aware wait, mock) so ramp timing can
//! be tested on host without sleeping.

use core::fmt;
use core::time::Duration;

/// The wait was cut short because the operator asked the program to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interrupted by operator")
    }
}

/// Blocking delay provider.
///
/// Implementations block the calling thread for `duration`, or return
/// `Err(Interrupted)` as soon as a termination request is seen.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use motor_ramp_core::traits::{Delay, MockDelay};
///
/// let mut delay = MockDelay::new();
/// delay.delay(Duration::from_millis(250)).unwrap();
/// delay.delay(Duration::from_millis(750)).unwrap();
/// assert_eq!(delay.calls(), 2);
/// assert_eq!(delay.total(), Duration::from_secs(1));
/// ```
pub trait Delay {
    /// Block for `duration`.
    ///
    /// # Errors
    ///
    /// Returns `Interrupted` if the wait was aborted by a shutdown request.
    fn delay(&mut self, duration: Duration) -> Result<(), Interrupted>;
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay(&mut self, duration: Duration) -> Result<(), Interrupted> {
        (**self).delay(duration)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock delay that records requested waits instead of sleeping.
///
/// Tracks call count, total, shortest and longest wait. Can be configured to
/// report an interruption on a given call to exercise shutdown paths.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    calls: usize,
    total: Duration,
    shortest: Option<Duration>,
    longest: Option<Duration>,
    interrupt_on: Option<usize>,
}

impl MockDelay {
    /// Creates a new `MockDelay` with no recorded waits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `MockDelay` whose `n`-th call (1-based) reports `Interrupted`.
    ///
    /// The interrupted call is counted but its duration is not added.
    pub fn interrupting_on(n: usize) -> Self {
        Self {
            interrupt_on: Some(n),
            ..Self::default()
        }
    }

    /// Number of `delay` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Sum of all completed waits, saturating at `Duration::MAX`.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Shortest completed wait, if any.
    pub fn shortest(&self) -> Option<Duration> {
        self.shortest
    }

    /// Longest completed wait, if any.
    pub fn longest(&self) -> Option<Duration> {
        self.longest
    }
}

impl Delay for MockDelay {
    fn delay(&mut self, duration: Duration) -> Result<(), Interrupted> {
        self.calls += 1;
        if self.interrupt_on == Some(self.calls) {
            return Err(Interrupted);
        }

        self.total = self.total.saturating_add(duration);
        self.shortest = Some(self.shortest.map_or(duration, |d| d.min(duration)));
        self.longest = Some(self.longest.map_or(duration, |d| d.max(duration)));
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
