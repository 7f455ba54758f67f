//! Millisecond time source and deadline bookkeeping.
//!
//! Embedded hosts expose a 32-bit millisecond counter that wraps roughly
//! every 49.7 days, so all arithmetic here is wrapping `u32`.

use std::time::{Duration, Instant};

/// Monotonic millisecond clock with an arbitrary epoch.
pub trait Clock {
    /// Current time in milliseconds. Must not decrease during one wait.
    fn now_ms(&self) -> u32;

    /// Block for `ms` milliseconds.
    ///
    /// The default polls [`Clock::now_ms`] until the deadline passes,
    /// yielding the thread between checks. Implementations that can block
    /// on a timer or scheduler should override this with a real sleep.
    fn sleep_ms(&self, ms: u32) {
        let deadline = Deadline::start(self.now_ms(), ms);
        while !deadline.expired(self.now_ms()) {
            std::thread::yield_now();
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn sleep_ms(&self, ms: u32) {
        (**self).sleep_ms(ms);
    }
}

/// [`Clock`] backed by [`Instant`], counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u32 {
        // Truncation is the wrap of a 32-bit millisecond counter.
        self.origin.elapsed().as_millis() as u32
    }

    fn sleep_ms(&self, ms: u32) {
        if ms == 0 {
            std::thread::yield_now();
        } else {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

/// A wait that started at `start` and lasts `timeout_ms`.
///
/// Expiry compares elapsed time rather than absolute instants, so a wait
/// that straddles the `u32` wrap still lasts exactly `timeout_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: u32,
    timeout_ms: u32,
}

impl Deadline {
    /// Begin a wait at `now`.
    #[must_use]
    pub const fn start(now: u32, timeout_ms: u32) -> Self {
        Self { start: now, timeout_ms }
    }

    /// Absolute time at which the wait ends (wrapping).
    #[must_use]
    pub const fn at(&self) -> u32 {
        self.start.wrapping_add(self.timeout_ms)
    }

    /// Milliseconds elapsed since the wait started.
    #[must_use]
    pub const fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.start)
    }

    /// Whether the wait is over.
    #[must_use]
    pub const fn expired(&self, now: u32) -> bool {
        self.elapsed(now) >= self.timeout_ms
    }

    /// Milliseconds left, zero once expired.
    #[must_use]
    pub const fn remaining(&self, now: u32) -> u32 {
        self.timeout_ms.saturating_sub(self.elapsed(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StepClock(Cell<u32>);

    impl Clock for StepClock {
        fn now_ms(&self) -> u32 {
            let now = self.0.get();
            self.0.set(now.wrapping_add(1));
            now
        }
    }

    #[test]
    fn test_deadline_nonzero_epoch() {
        let deadline = Deadline::start(5_000, 200);
        assert!(!deadline.expired(5_000));
        assert!(!deadline.expired(5_199));
        assert!(deadline.expired(5_200));
        assert_eq!(deadline.remaining(5_150), 50);
        assert_eq!(deadline.at(), 5_200);
    }

    #[test]
    fn test_deadline_across_wrap() {
        let deadline = Deadline::start(u32::MAX - 50, 200);
        assert_eq!(deadline.at(), 149);
        assert!(!deadline.expired(u32::MAX));
        assert!(!deadline.expired(100));
        assert!(deadline.expired(149));
    }

    #[test]
    fn test_zero_timeout_already_expired() {
        assert!(Deadline::start(42, 0).expired(42));
    }

    #[test]
    fn test_default_zero_sleep_returns_immediately() {
        let clock = StepClock(Cell::new(1_000));
        clock.sleep_ms(0);
        assert_eq!(clock.0.get(), 1_002);
    }

    #[test]
    fn test_default_sleep_polls_until_deadline() {
        let clock = StepClock(Cell::new(1_000));
        clock.sleep_ms(10);
        // One read to start, then reads at 1001..=1010.
        assert_eq!(clock.0.get(), 1_011);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let before = clock.now_ms();
        clock.sleep_ms(5);
        assert!(Deadline::start(before, 5).expired(clock.now_ms()));
    }
}
