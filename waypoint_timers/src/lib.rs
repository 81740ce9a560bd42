// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoint Timers: keyed, cancelable timers on a host-driven clock.
//!
//! ## Overview
//!
//! A [`TimerSet`] holds at most one live timer per key.
//! Scheduling under a key that already has a live timer replaces it, so a
//! continuation that has been superseded by a newer transition can never fire.
//!
//! The set does not own a clock. Callers pass the current time (in [`Millis`])
//! when scheduling and drain due timers with [`TimerSet::pop_due`] from their
//! frame or tick callback.
//!
//! ## Ordering
//!
//! Due timers are returned in deadline order. Equal deadlines are returned in
//! the order they were scheduled.
//! Periodic timers re-arm at `deadline + interval` (not at the drain time), so a
//! late drain catches up on every missed period and never drifts.
//!
//! ## Stale entries
//!
//! Every schedule call stamps the entry with a fresh sequence number, similar to
//! a generational key. Replaced or canceled entries stay in the queue until they
//! surface (or until the queue is compacted) and are skipped because their
//! sequence number no longer matches the live one.
//!
//! ## Minimal example
//!
//! ```
//! use waypoint_timers::TimerSet;
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
//! enum Key { Settle, Cycle }
//!
//! let mut timers = TimerSet::new();
//! timers.schedule(Key::Settle, 0, 300);
//! timers.schedule_every(Key::Cycle, 0, 100);
//!
//! // Rescheduling replaces the live timer.
//! timers.schedule(Key::Settle, 50, 300);
//!
//! let mut fired = Vec::new();
//! while let Some(f) = timers.pop_due(350) {
//!     fired.push((f.key, f.at));
//! }
//! assert_eq!(
//!     fired,
//!     vec![(Key::Cycle, 100), (Key::Cycle, 200), (Key::Cycle, 300), (Key::Settle, 350)]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::{BTreeMap, BinaryHeap};
use core::cmp::Ordering;

/// Milliseconds on the host clock.
pub type Millis = u64;

/// Whether a timer fires once or keeps re-arming.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Fire once, then forget the key.
    Once,
    /// Fire every `interval` milliseconds until canceled.
    Every(Millis),
}

/// A timer that came due.
///
/// Returned by [`TimerSet::pop_due`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Fired<K> {
    /// Key the timer was scheduled under.
    pub key: K,
    /// Deadline the timer was scheduled for (not the drain time).
    pub at: Millis,
    /// True if the timer re-armed itself after firing.
    pub periodic: bool,
}

#[derive(Copy, Clone, Debug)]
struct Live {
    seq: u64,
    deadline: Millis,
    repeat: Repeat,
}

#[derive(Copy, Clone, Debug)]
struct Pending<K> {
    deadline: Millis,
    seq: u64,
    key: K,
}

impl<K> PartialEq for Pending<K> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<K> Eq for Pending<K> {}

impl<K> PartialOrd for Pending<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Pending<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: earliest deadline first, then earliest schedule.
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A set of named timers with at most one live timer per key.
///
/// ## Usage
///
/// - [`TimerSet::schedule`] / [`TimerSet::schedule_every`] arm a key, replacing
///   any live timer under the same key.
/// - [`TimerSet::cancel`] / [`TimerSet::cancel_all`] invalidate timers.
/// - [`TimerSet::pop_due`] drains due timers one at a time, so the caller can
///   cancel or reschedule other keys between fires.
#[derive(Clone, Debug)]
pub struct TimerSet<K> {
    live: BTreeMap<K, Live>,
    queue: BinaryHeap<Pending<K>>,
    next_seq: u64,
}

impl<K: Copy + Ord> Default for TimerSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord> TimerSet<K> {
    /// Create an empty timer set.
    pub fn new() -> Self {
        Self {
            live: BTreeMap::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Arm a one-shot timer under `key`, due at `now + delay`.
    ///
    /// Returns true if a live timer under `key` was replaced.
    pub fn schedule(&mut self, key: K, now: Millis, delay: Millis) -> bool {
        self.arm(key, now.saturating_add(delay), Repeat::Once)
    }

    /// Arm a periodic timer under `key`, first due at `now + interval`.
    ///
    /// Returns false (and leaves any live timer under `key` untouched) when
    /// `interval` is zero, since such a timer would never let a drain finish.
    pub fn schedule_every(&mut self, key: K, now: Millis, interval: Millis) -> bool {
        if interval == 0 {
            return false;
        }
        self.arm(key, now.saturating_add(interval), Repeat::Every(interval));
        true
    }

    /// Cancel the live timer under `key`. Returns true if one was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        self.live.remove(&key).is_some()
    }

    /// Cancel every timer.
    pub fn cancel_all(&mut self) {
        self.live.clear();
        self.queue.clear();
    }

    /// True if a timer is pending under `key`.
    pub fn is_pending(&self, key: K) -> bool {
        self.live.contains_key(&key)
    }

    /// Deadline of the pending timer under `key`, if any.
    pub fn deadline(&self, key: K) -> Option<Millis> {
        self.live.get(&key).map(|l| l.deadline)
    }

    /// Repeat policy of the pending timer under `key`, if any.
    pub fn repeat(&self, key: K) -> Option<Repeat> {
        self.live.get(&key).map(|l| l.repeat)
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True if no timer is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Earliest deadline among live timers.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.live.values().map(|l| l.deadline).min()
    }

    /// Keys of all live timers, in key order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.live.keys().copied()
    }

    /// Pop the earliest timer due at or before `now`.
    ///
    /// One-shot timers are forgotten; periodic timers re-arm at
    /// `deadline + interval` before being returned.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired<K>> {
        loop {
            let top = self.queue.peek()?;
            if top.deadline > now {
                return None;
            }
            let pending = self.queue.pop()?;
            let Some(live) = self.live.get(&pending.key).copied() else {
                // Canceled.
                continue;
            };
            if live.seq != pending.seq {
                // Replaced by a later schedule.
                continue;
            }
            let periodic = match live.repeat {
                Repeat::Once => {
                    self.live.remove(&pending.key);
                    false
                }
                Repeat::Every(interval) => {
                    self.arm(
                        pending.key,
                        pending.deadline.saturating_add(interval),
                        live.repeat,
                    );
                    true
                }
            };
            return Some(Fired {
                key: pending.key,
                at: pending.deadline,
                periodic,
            });
        }
    }

    fn arm(&mut self, key: K, deadline: Millis, repeat: Repeat) -> bool {
        let seq = self.next_seq;
        self.next_seq += 1;
        let replaced = self
            .live
            .insert(
                key,
                Live {
                    seq,
                    deadline,
                    repeat,
                },
            )
            .is_some();
        self.queue.push(Pending { deadline, seq, key });
        self.compact_if_stale();
        replaced
    }

    fn compact_if_stale(&mut self) {
        if self.queue.len() <= 2 * self.live.len() + 32 {
            return;
        }
        let live = &self.live;
        self.queue
            .retain(|p| live.get(&p.key).is_some_and(|l| l.seq == p.seq));
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        self.queue.len()
    }
}
