#![forbid(unsafe_code)]

//! Host-driven monotonic clock.

use core::time::Duration;

/// Deterministic monotonic clock controlled by the host.
///
/// The controller never reads time on its own. The host pushes the current
/// monotonic time before dispatching events or firing timers, which keeps
/// every schedule reproducible in tests.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Time never moves backwards.
    pub fn set(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(DeterministicClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn advance_accumulates() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(40));
        clock.advance(Duration::from_millis(60));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn set_ignores_regressions() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_secs(5));
        clock.set(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::from_secs(5));
    }
}
