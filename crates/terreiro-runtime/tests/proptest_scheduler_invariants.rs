//! Property-based invariants for the keyed scheduler.
//!
//! Verifies:
//! 1. At most one pending entry per key; the last schedule wins.
//! 2. Due entries pop in deadline order, ties in scheduling order.
//! 3. A repeating entry pops once per `pop_due(now)` and re-arms within one
//!    interval after `now`.
//! 4. Canceled keys never pop.

use std::collections::HashMap;
use std::time::Duration;

use proptest::prelude::*;
use terreiro_runtime::{Scheduler, TimerKey};
use terreiro_widgets::ToastId;

const KEYS: [TimerKey; 8] = [
    TimerKey::FloatingReveal,
    TimerKey::PulseRestart,
    TimerKey::AutoClose,
    TimerKey::CopyRestore,
    TimerKey::OutboundConfirm(1),
    TimerKey::OutboundConfirm(2),
    TimerKey::ToastExit(ToastId(1)),
    TimerKey::ToastRemove(ToastId(1)),
];

fn ops() -> impl Strategy<Value = Vec<(usize, u64, u64)>> {
    // (key index, schedule time, delay), in schedule-time order.
    prop::collection::vec((0..KEYS.len(), 0u64..5_000, 0u64..5_000), 1..40).prop_map(|mut v| {
        v.sort_by_key(|(_, at, _)| *at);
        v
    })
}

proptest! {
    #[test]
    fn one_entry_per_key(ops in ops()) {
        let mut s = Scheduler::new();
        let mut expected: HashMap<TimerKey, Duration> = HashMap::new();
        for (k, at, delay) in ops {
            let key = KEYS[k];
            s.schedule_once(key, Duration::from_millis(at), Duration::from_millis(delay));
            expected.insert(key, Duration::from_millis(at + delay));
        }
        prop_assert_eq!(s.len(), expected.len());
        for (key, deadline) in expected {
            prop_assert_eq!(s.deadline(key), Some(deadline));
        }
    }

    #[test]
    fn pops_in_deadline_then_schedule_order(ops in ops()) {
        let mut s = Scheduler::new();
        let mut model: HashMap<TimerKey, (Duration, usize)> = HashMap::new();
        for (seq, (k, at, delay)) in ops.into_iter().enumerate() {
            let key = KEYS[k];
            s.schedule_once(key, Duration::from_millis(at), Duration::from_millis(delay));
            model.insert(key, (Duration::from_millis(at + delay), seq));
        }
        let mut expected: Vec<(Duration, usize, TimerKey)> =
            model.into_iter().map(|(key, (d, seq))| (d, seq, key)).collect();
        expected.sort_by_key(|(d, seq, _)| (*d, *seq));

        let far = Duration::from_secs(60);
        let mut popped = Vec::new();
        while let Some(key) = s.pop_due(far) {
            popped.push(key);
        }
        let expected: Vec<TimerKey> = expected.into_iter().map(|(_, _, key)| key).collect();
        prop_assert_eq!(popped, expected);
        prop_assert!(s.is_empty());
    }

    #[test]
    fn repeating_rearms_after_now(interval in 1u64..60_000, now in 0u64..600_000) {
        let mut s = Scheduler::new();
        let interval_d = Duration::from_millis(interval);
        s.schedule_every(TimerKey::Pulse, Duration::ZERO, interval_d);
        let now_d = Duration::from_millis(now);

        if now < interval {
            prop_assert_eq!(s.pop_due(now_d), None);
        } else {
            prop_assert_eq!(s.pop_due(now_d), Some(TimerKey::Pulse));
            prop_assert_eq!(s.pop_due(now_d), None);
            let next = s.deadline(TimerKey::Pulse).unwrap();
            prop_assert!(next > now_d);
            prop_assert!(next <= now_d + interval_d);
        }
        prop_assert_eq!(s.len(), 1);
    }

    #[test]
    fn canceled_keys_never_pop(ops in ops(), victim in 0..KEYS.len()) {
        let mut s = Scheduler::new();
        for (k, at, delay) in ops {
            s.schedule_once(KEYS[k], Duration::from_millis(at), Duration::from_millis(delay));
        }
        let key = KEYS[victim];
        let was_pending = s.is_scheduled(key);
        prop_assert_eq!(s.cancel(key), was_pending);
        while let Some(popped) = s.pop_due(Duration::from_secs(60)) {
            prop_assert_ne!(popped, key);
        }
    }
}
