// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointing-direction inference from target motion.
//!
//! A [`DirectionTracker`] keeps the target's recent vertical positions and points up while
//! the target travels up the screen, down while it travels down. Small motion is ignored
//! and flips are debounced. A manual override disables inference entirely.

use std::collections::VecDeque;

use waypoint_timers::Millis;

use crate::config::Direction;

/// Samples older than this are dropped.
pub const WINDOW: Millis = 200;
/// Displacement across the window must exceed this (in pixels) to flip.
pub const THRESHOLD: f64 = 30.0;
/// Minimum time between two inferred flips.
pub const DEBOUNCE: Millis = 300;

/// Velocity-windowed direction inference with a manual override.
#[derive(Clone, Debug, Default)]
pub struct DirectionTracker {
    samples: VecDeque<(f64, Millis)>,
    inferred: Direction,
    manual: Option<Direction>,
    last_flip: Option<Millis>,
}

impl DirectionTracker {
    /// A tracker with no history that points `Down`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective direction: the override if set, otherwise the inferred one.
    pub fn direction(&self) -> Direction {
        self.manual.unwrap_or(self.inferred)
    }

    /// The manual override, if any.
    pub fn manual(&self) -> Option<Direction> {
        self.manual
    }

    /// Record the target's top edge at `now`.
    ///
    /// Returns the new direction if inference flipped it.
    pub fn sample(&mut self, y: f64, now: Millis) -> Option<Direction> {
        self.samples.push_back((y, now));
        while let Some(&(_, t)) = self.samples.front() {
            if now.saturating_sub(t) > WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        if self.manual.is_some() || self.samples.len() < 2 {
            return None;
        }
        let (oldest, _) = self.samples.front().copied()?;
        let (newest, _) = self.samples.back().copied()?;
        let displacement = newest - oldest;
        if displacement.abs() <= THRESHOLD {
            return None;
        }
        if self
            .last_flip
            .is_some_and(|t| now.saturating_sub(t) < DEBOUNCE)
        {
            return None;
        }
        let next = if displacement < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };
        if next == self.inferred {
            return None;
        }
        self.inferred = next;
        self.last_flip = Some(now);
        Some(next)
    }

    /// Set or clear the override.
    ///
    /// Clearing drops the motion history and keeps pointing the way the override did, so
    /// inference restarts from rest. The flip debounce still counts from the last inferred
    /// flip. Returns the new effective direction if it changed.
    pub fn set_manual(&mut self, manual: Option<Direction>) -> Option<Direction> {
        let before = self.direction();
        match manual {
            Some(d) => self.manual = Some(d),
            None => {
                if let Some(previous) = self.manual.take() {
                    self.inferred = previous;
                }
                self.samples.clear();
            }
        }
        let after = self.direction();
        (after != before).then_some(after)
    }

    /// Drop the motion history without touching the current direction.
    pub fn clear_history(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_target_flips_up() {
        let mut t = DirectionTracker::new();
        assert_eq!(t.sample(500.0, 0), None);
        assert_eq!(t.sample(480.0, 50), None);
        assert_eq!(t.sample(460.0, 100), Some(Direction::Up));
        assert_eq!(t.direction(), Direction::Up);
    }

    #[test]
    fn small_motion_is_ignored() {
        let mut t = DirectionTracker::new();
        t.sample(100.0, 0);
        assert_eq!(t.sample(75.0, 100), None);
        assert_eq!(t.direction(), Direction::Down);
    }

    #[test]
    fn samples_outside_the_window_do_not_count() {
        let mut t = DirectionTracker::new();
        t.sample(500.0, 0);
        // The first sample is 250 ms old and gets evicted: one sample left.
        assert_eq!(t.sample(400.0, 250), None);
    }

    #[test]
    fn flips_are_debounced() {
        let mut t = DirectionTracker::new();
        t.sample(500.0, 0);
        assert_eq!(t.sample(450.0, 100), Some(Direction::Up));
        // Reverses hard, but within 300 ms of the last flip.
        t.sample(500.0, 200);
        assert_eq!(t.sample(560.0, 300), None);
        assert_eq!(t.direction(), Direction::Up);
        // Window now holds 300..=400, still moving down, and the debounce has elapsed.
        assert_eq!(t.sample(620.0, 400), Some(Direction::Down));
    }

    #[test]
    fn manual_override_wins() {
        let mut t = DirectionTracker::new();
        assert_eq!(t.set_manual(Some(Direction::Up)), Some(Direction::Up));
        t.sample(0.0, 0);
        assert_eq!(t.sample(200.0, 50), None);
        assert_eq!(t.direction(), Direction::Up);
        assert_eq!(t.set_manual(Some(Direction::Up)), None);
    }

    #[test]
    fn clearing_the_override_restarts_from_rest() {
        let mut t = DirectionTracker::new();
        t.sample(0.0, 0);
        t.sample(10.0, 50);
        t.set_manual(Some(Direction::Up));
        // No change in effective direction and no stale history.
        assert_eq!(t.set_manual(None), None);
        assert_eq!(t.direction(), Direction::Up);
        assert_eq!(t.sample(100.0, 60), None);
    }

    #[test]
    fn clearing_the_override_keeps_the_debounce() {
        let mut t = DirectionTracker::new();
        t.sample(500.0, 1_000);
        assert_eq!(t.sample(450.0, 1_050), Some(Direction::Up));
        assert_eq!(t.set_manual(None), None);
        t.sample(450.0, 1_100);
        // Moving down hard, but only 100 ms after the last flip.
        assert_eq!(t.sample(520.0, 1_150), None);
        assert_eq!(t.direction(), Direction::Up);
        t.sample(560.0, 1_300);
        assert_eq!(t.sample(600.0, 1_350), Some(Direction::Down));
    }
}
