#![forbid(unsafe_code)]

//! Floating feedback trigger: delayed reveal and periodic pulse restart.

/// CSS animation applied while pulsing.
pub const PULSE_ANIMATION: &str = "gentle-pulse 3s ease-in-out infinite";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatingTrigger {
    revealed: bool,
    pulsing: bool,
    restarts: u32,
}

impl FloatingTrigger {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            revealed: false,
            pulsing: false,
            restarts: 0,
        }
    }

    /// Returns `false` if already revealed.
    pub fn reveal(&mut self) -> bool {
        !std::mem::replace(&mut self.revealed, true)
    }

    /// Stop the pulse so the next start replays it from the beginning.
    pub fn stop_pulse(&mut self) {
        self.pulsing = false;
    }

    pub fn start_pulse(&mut self) {
        if !self.pulsing {
            self.restarts += 1;
        }
        self.pulsing = true;
    }

    #[must_use]
    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    #[must_use]
    pub const fn is_pulsing(self) -> bool {
        self.pulsing
    }

    /// How many times the pulse was (re)started.
    #[must_use]
    pub const fn restarts(self) -> u32 {
        self.restarts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_once() {
        let mut trigger = FloatingTrigger::new();
        assert!(trigger.reveal());
        assert!(!trigger.reveal());
        assert!(trigger.is_revealed());
    }

    #[test]
    fn pulse_restart_counts() {
        let mut trigger = FloatingTrigger::new();
        trigger.stop_pulse();
        trigger.start_pulse();
        trigger.start_pulse();
        assert_eq!(trigger.restarts(), 1);
        trigger.stop_pulse();
        assert!(!trigger.is_pulsing());
        trigger.start_pulse();
        assert_eq!(trigger.restarts(), 2);
    }
}
