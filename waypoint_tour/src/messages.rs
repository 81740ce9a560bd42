// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-step message list and its cycle state.

use crate::content::Content;

/// Why a cycle (or autoplay) is paused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PauseCause {
    /// Paused through the public API; only an explicit resume continues it.
    User,
    /// Paused by `hide()`; the next `show()` resumes it.
    Hidden,
}

/// Message cycling state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CycleState {
    /// Not cycling.
    #[default]
    Stopped,
    /// Advancing on the message interval.
    Running,
    /// Cycling was interrupted and can be resumed.
    Paused(PauseCause),
}

/// Messages of the current step and the index of the one shown.
///
/// Replaced wholesale on every step change or explicit content change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageCursor {
    messages: Vec<Content>,
    index: usize,
    cycle: CycleState,
}

impl MessageCursor {
    /// A stopped cursor at the first message.
    pub fn new(messages: Vec<Content>) -> Self {
        Self {
            messages,
            index: 0,
            cycle: CycleState::Stopped,
        }
    }

    /// All messages.
    pub fn messages(&self) -> &[Content] {
        &self.messages
    }

    /// Index of the message shown.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The message shown.
    pub fn current(&self) -> Option<&Content> {
        self.messages.get(self.index)
    }

    /// True on the last message.
    pub fn is_last(&self) -> bool {
        !self.messages.is_empty() && self.index + 1 == self.messages.len()
    }

    /// Cycle state.
    pub fn cycle(&self) -> CycleState {
        self.cycle
    }

    /// Step forward circularly. Returns `(from, to)`; `None` with one message or fewer.
    pub fn next(&mut self) -> Option<(usize, usize)> {
        let n = self.messages.len();
        if n <= 1 {
            return None;
        }
        let from = self.index;
        self.index = (from + 1) % n;
        Some((from, self.index))
    }

    /// Step back circularly. Returns `(from, to)`; `None` with one message or fewer.
    pub fn prev(&mut self) -> Option<(usize, usize)> {
        let n = self.messages.len();
        if n <= 1 {
            return None;
        }
        let from = self.index;
        self.index = (from + n - 1) % n;
        Some((from, self.index))
    }

    /// Jump to `index`. Returns the previous index; `None` if out of range or already there.
    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if index >= self.messages.len() || index == self.index {
            return None;
        }
        Some(core::mem::replace(&mut self.index, index))
    }

    /// Start cycling. Fails with one message or fewer, or when already running.
    pub fn start(&mut self) -> bool {
        if self.messages.len() <= 1 || self.cycle == CycleState::Running {
            return false;
        }
        self.cycle = CycleState::Running;
        true
    }

    /// Stop cycling. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if self.cycle == CycleState::Stopped {
            return false;
        }
        self.cycle = CycleState::Stopped;
        true
    }

    /// Pause a running cycle.
    pub fn pause(&mut self, cause: PauseCause) -> bool {
        if self.cycle != CycleState::Running {
            return false;
        }
        self.cycle = CycleState::Paused(cause);
        true
    }

    /// Resume a paused cycle. Returns why it had been paused.
    pub fn resume(&mut self) -> Option<PauseCause> {
        match self.cycle {
            CycleState::Paused(cause) if self.messages.len() > 1 => {
                self.cycle = CycleState::Running;
                Some(cause)
            }
            _ => None,
        }
    }

    /// Mark a fresh cursor as paused, inheriting a cycle that was running on its predecessor.
    pub fn mark_paused(&mut self, cause: PauseCause) {
        self.cycle = CycleState::Paused(cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(n: usize) -> MessageCursor {
        MessageCursor::new((0..n).map(|i| Content::text(format!("m{i}"))).collect())
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut c = cursor(3);
        assert_eq!(c.prev(), Some((0, 2)));
        assert_eq!(c.next(), Some((2, 0)));
        assert_eq!(c.next(), Some((0, 1)));
        assert_eq!(c.current(), Some(&Content::text("m1")));
    }

    #[test]
    fn single_message_does_not_move() {
        let mut c = cursor(1);
        assert_eq!(c.next(), None);
        assert_eq!(c.prev(), None);
        assert!(!c.start());
        assert!(c.is_last());
    }

    #[test]
    fn go_to_checks_bounds() {
        let mut c = cursor(3);
        assert_eq!(c.go_to(3), None);
        assert_eq!(c.go_to(0), None);
        assert_eq!(c.go_to(2), Some(0));
        assert!(c.is_last());
    }

    #[test]
    fn resume_only_from_paused() {
        let mut c = cursor(2);
        assert_eq!(c.resume(), None);
        assert!(c.start());
        assert!(!c.start());
        assert!(c.pause(PauseCause::Hidden));
        assert!(!c.pause(PauseCause::User));
        assert_eq!(c.resume(), Some(PauseCause::Hidden));
        assert_eq!(c.cycle(), CycleState::Running);
        assert!(c.stop());
        assert!(!c.stop());
    }

    #[test]
    fn empty_cursor_is_inert() {
        let mut c = MessageCursor::default();
        assert!(c.is_empty());
        assert!(!c.is_last());
        assert_eq!(c.current(), None);
        assert_eq!(c.go_to(0), None);
    }
}
