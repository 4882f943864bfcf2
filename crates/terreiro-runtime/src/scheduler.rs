#![forbid(unsafe_code)]

//! Keyed, cancelable timers on a host-driven clock.
//!
//! Every delayed effect on the page is a named task. Scheduling a key that
//! is already pending replaces it, so a stale timer can never fire after its
//! purpose was superseded (e.g. an auto-close left over from an earlier
//! submission). Nothing runs on its own: the owner calls
//! [`Scheduler::pop_due`] with the current time and handles what comes out.
//!
//! # Invariants
//!
//! 1. At most one pending entry per [`TimerKey`].
//! 2. Due entries pop in deadline order; ties pop in scheduling order.
//! 3. Repeating entries re-arm strictly after `now`, so one pop per period.

use std::fmt;
use std::time::Duration;

use terreiro_widgets::ToastId;

/// Purpose of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Show the floating trigger after the startup delay.
    FloatingReveal,
    /// Periodic pulse restart (interval).
    Pulse,
    /// Second half of a pulse restart.
    PulseRestart,
    /// Close the modal after a successful modal submission.
    AutoClose,
    /// Confirmation toast after the n-th outbound link opened.
    OutboundConfirm(u64),
    /// Return the copy button to its original face.
    CopyRestore,
    /// Start a toast's exit transition.
    ToastExit(ToastId),
    /// Remove a toast once its exit transition finished.
    ToastRemove(ToastId),
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloatingReveal => f.write_str("floating-reveal"),
            Self::Pulse => f.write_str("pulse"),
            Self::PulseRestart => f.write_str("pulse-restart"),
            Self::AutoClose => f.write_str("auto-close"),
            Self::OutboundConfirm(n) => write!(f, "outbound-confirm:{n}"),
            Self::CopyRestore => f.write_str("copy-restore"),
            Self::ToastExit(id) => write!(f, "toast-exit:{id}"),
            Self::ToastRemove(id) => write!(f, "toast-remove:{id}"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: TimerKey,
    deadline: Duration,
    seq: u64,
    every: Option<Duration>,
}

/// Pending timers.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `key` once, `delay` after `now`. Replaces any pending `key`.
    pub fn schedule_once(&mut self, key: TimerKey, now: Duration, delay: Duration) {
        self.insert(key, now.saturating_add(delay), None);
    }

    /// Fire `key` every `interval`, first at `now + interval`. Replaces any
    /// pending `key`. Zero intervals are bumped to one millisecond.
    pub fn schedule_every(&mut self, key: TimerKey, now: Duration, interval: Duration) {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(key, now.saturating_add(interval), Some(interval));
    }

    fn insert(&mut self, key: TimerKey, deadline: Duration, every: Option<Duration>) {
        let replaced = self.remove(key);
        self.next_seq += 1;
        tracing::trace!(timer = %key, deadline_ms = deadline.as_millis() as u64, replaced, "timer scheduled");
        self.entries.push(Entry {
            key,
            deadline,
            seq: self.next_seq,
            every,
        });
    }

    fn remove(&mut self, key: TimerKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    /// Cancel `key`. Returns `true` if it was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let removed = self.remove(key);
        if removed {
            tracing::trace!(timer = %key, "timer canceled");
        }
        removed
    }

    #[must_use]
    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Deadline of `key`, if pending.
    #[must_use]
    pub fn deadline(&self, key: TimerKey) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.deadline)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Pop the earliest task due at `now`. Repeating tasks are re-armed.
    pub fn pop_due(&mut self, now: Duration) -> Option<TimerKey> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;

        let key = self.entries[idx].key;
        match self.entries[idx].every {
            Some(interval) => {
                let entry = &mut self.entries[idx];
                let mut next = entry.deadline.saturating_add(interval);
                if next <= now {
                    next = now.saturating_add(interval);
                }
                entry.deadline = next;
                self.next_seq += 1;
                entry.seq = self.next_seq;
            }
            None => {
                self.entries.swap_remove(idx);
            }
        }
        tracing::trace!(timer = %key, now_ms = now.as_millis() as u64, "timer fired");
        Some(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn once_fires_at_deadline() {
        let mut s = Scheduler::new();
        s.schedule_once(TimerKey::AutoClose, ms(0), ms(2000));
        assert_eq!(s.pop_due(ms(1999)), None);
        assert_eq!(s.pop_due(ms(2000)), Some(TimerKey::AutoClose));
        assert!(s.is_empty());
    }

    #[test]
    fn rescheduling_replaces() {
        let mut s = Scheduler::new();
        s.schedule_once(TimerKey::CopyRestore, ms(0), ms(2000));
        s.schedule_once(TimerKey::CopyRestore, ms(1500), ms(2000));
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(ms(2000)), None);
        assert_eq!(s.deadline(TimerKey::CopyRestore), Some(ms(3500)));
        assert_eq!(s.pop_due(ms(3500)), Some(TimerKey::CopyRestore));
    }

    #[test]
    fn cancel_removes() {
        let mut s = Scheduler::new();
        s.schedule_once(TimerKey::AutoClose, ms(0), ms(10));
        assert!(s.cancel(TimerKey::AutoClose));
        assert!(!s.cancel(TimerKey::AutoClose));
        assert_eq!(s.pop_due(ms(100)), None);
    }

    #[test]
    fn due_order_is_deadline_then_seq() {
        let mut s = Scheduler::new();
        let a = TimerKey::ToastExit(ToastId(1));
        let b = TimerKey::ToastExit(ToastId(2));
        s.schedule_once(TimerKey::OutboundConfirm(1), ms(0), ms(50));
        s.schedule_once(a, ms(0), ms(10));
        s.schedule_once(b, ms(0), ms(10));
        assert_eq!(s.pop_due(ms(100)), Some(a));
        assert_eq!(s.pop_due(ms(100)), Some(b));
        assert_eq!(s.pop_due(ms(100)), Some(TimerKey::OutboundConfirm(1)));
    }

    #[test]
    fn every_rearms() {
        let mut s = Scheduler::new();
        s.schedule_every(TimerKey::Pulse, ms(0), ms(30));
        assert_eq!(s.pop_due(ms(30)), Some(TimerKey::Pulse));
        assert_eq!(s.pop_due(ms(30)), None);
        assert_eq!(s.next_deadline(), Some(ms(60)));
        assert_eq!(s.pop_due(ms(60)), Some(TimerKey::Pulse));
    }

    #[test]
    fn every_skips_missed_periods() {
        let mut s = Scheduler::new();
        s.schedule_every(TimerKey::Pulse, ms(0), ms(30));
        assert_eq!(s.pop_due(ms(1000)), Some(TimerKey::Pulse));
        assert_eq!(s.pop_due(ms(1000)), None);
        assert_eq!(s.deadline(TimerKey::Pulse), Some(ms(1030)));
    }

    #[test]
    fn zero_interval_is_bumped() {
        let mut s = Scheduler::new();
        s.schedule_every(TimerKey::Pulse, ms(0), Duration::ZERO);
        assert_eq!(s.deadline(TimerKey::Pulse), Some(ms(1)));
    }

    #[test]
    fn key_display() {
        assert_eq!(TimerKey::FloatingReveal.to_string(), "floating-reveal");
        assert_eq!(TimerKey::ToastRemove(ToastId(7)).to_string(), "toast-remove:7");
        assert_eq!(TimerKey::OutboundConfirm(2).to_string(), "outbound-confirm:2");
    }
}
