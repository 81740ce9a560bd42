// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Autoplay state and scheduling decisions.
//!
//! [`Autoplay`] holds no timer itself. The tour asks it for an [`AutoplayPlan`] and owns the
//! single autoplay timer, so there is never more than one pending advance.

use waypoint_timers::Millis;

use crate::config::TourConfig;
use crate::messages::PauseCause;

/// Delay between the last message of a step and the advance, when waiting for messages.
pub const MESSAGES_SETTLE: Millis = 300;

/// Autoplay mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AutoplayMode {
    /// Disabled.
    #[default]
    Stopped,
    /// Enabled and advancing.
    Running,
    /// Enabled but held.
    Paused(PauseCause),
}

/// What to do about the autoplay timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoplayPlan {
    /// No timer.
    Idle,
    /// No timer yet: the message cycle signals when the step's messages are done.
    AwaitMessages,
    /// Advance after this delay.
    After(Millis),
}

/// Autoplay state for one tour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Autoplay {
    mode: AutoplayMode,
    messages_complete: bool,
}

impl Autoplay {
    /// Current mode.
    pub fn mode(&self) -> AutoplayMode {
        self.mode
    }

    /// Enabled, paused or not.
    pub fn is_enabled(&self) -> bool {
        self.mode != AutoplayMode::Stopped
    }

    /// Enabled and not paused.
    pub fn is_running(&self) -> bool {
        self.mode == AutoplayMode::Running
    }

    /// True once the current step's messages have all been shown.
    pub fn messages_complete(&self) -> bool {
        self.messages_complete
    }

    /// Enable. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.mode == AutoplayMode::Running {
            return false;
        }
        self.mode = AutoplayMode::Running;
        true
    }

    /// Disable. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if self.mode == AutoplayMode::Stopped {
            return false;
        }
        self.mode = AutoplayMode::Stopped;
        true
    }

    /// Hold without disabling. Only from `Running`.
    pub fn pause(&mut self, cause: PauseCause) -> bool {
        if self.mode != AutoplayMode::Running {
            return false;
        }
        self.mode = AutoplayMode::Paused(cause);
        true
    }

    /// Continue after a pause. Returns why it had been paused.
    pub fn resume(&mut self) -> Option<PauseCause> {
        match self.mode {
            AutoplayMode::Paused(cause) => {
                self.mode = AutoplayMode::Running;
                Some(cause)
            }
            _ => None,
        }
    }

    /// A new step started: its messages are not complete yet.
    pub fn reset_step(&mut self) {
        self.messages_complete = false;
    }

    /// The current step's messages have all been shown.
    pub fn mark_messages_complete(&mut self) {
        self.messages_complete = true;
    }

    /// Decide how to schedule the next advance.
    ///
    /// `cycling` is true unless the message cycle is stopped. `message_count` is the current
    /// step's message count and `step_duration` its override. A step whose messages already
    /// completed advances after [`MESSAGES_SETTLE`] even though its cycle stopped itself.
    pub fn plan(
        &self,
        visible: bool,
        cycling: bool,
        message_count: usize,
        step_duration: Option<Millis>,
        config: &TourConfig,
    ) -> AutoplayPlan {
        if !self.is_running() || !visible {
            return AutoplayPlan::Idle;
        }
        if waits_for_messages(message_count, config) {
            if self.messages_complete {
                return AutoplayPlan::After(MESSAGES_SETTLE);
            }
            if cycling {
                return AutoplayPlan::AwaitMessages;
            }
        }
        AutoplayPlan::After(step_duration.unwrap_or(config.autoplay_interval))
    }
}

/// True when autoplay on a step with `message_count` messages must wait for its cycle.
pub(crate) fn waits_for_messages(message_count: usize, config: &TourConfig) -> bool {
    config.autoplay_wait_for_messages && config.message_interval > 0 && message_count > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycling() -> TourConfig {
        TourConfig {
            message_interval: 1_000,
            ..TourConfig::default()
        }
    }

    #[test]
    fn idle_unless_running_and_visible() {
        let mut a = Autoplay::default();
        let c = TourConfig::default();
        assert_eq!(a.plan(true, true, 1, None, &c), AutoplayPlan::Idle);
        a.start();
        assert_eq!(a.plan(false, true, 1, None, &c), AutoplayPlan::Idle);
        a.pause(PauseCause::User);
        assert_eq!(a.plan(true, true, 1, None, &c), AutoplayPlan::Idle);
    }

    #[test]
    fn step_duration_overrides_interval() {
        let mut a = Autoplay::default();
        a.start();
        let c = TourConfig::default();
        assert_eq!(a.plan(true, true, 1, None, &c), AutoplayPlan::After(3_000));
        assert_eq!(a.plan(true, true, 1, Some(500), &c), AutoplayPlan::After(500));
    }

    #[test]
    fn multi_message_steps_wait_for_the_cycle() {
        let mut a = Autoplay::default();
        a.start();
        let c = cycling();
        assert_eq!(a.plan(true, true, 3, Some(500), &c), AutoplayPlan::AwaitMessages);
        a.mark_messages_complete();
        assert_eq!(a.plan(true, true, 3, Some(500), &c), AutoplayPlan::After(MESSAGES_SETTLE));
        a.reset_step();
        assert!(!a.messages_complete());
        // A stopped cycle never completes, so it is not waited for.
        assert_eq!(a.plan(true, false, 3, Some(500), &c), AutoplayPlan::After(500));

        let no_wait = TourConfig {
            autoplay_wait_for_messages: false,
            ..cycling()
        };
        assert_eq!(a.plan(true, true, 3, None, &no_wait), AutoplayPlan::After(3_000));
    }

    #[test]
    fn resume_only_from_paused() {
        let mut a = Autoplay::default();
        assert_eq!(a.resume(), None);
        assert!(a.start());
        assert!(!a.start());
        assert!(a.pause(PauseCause::Hidden));
        assert!(a.is_enabled());
        assert_eq!(a.resume(), Some(PauseCause::Hidden));
        assert!(a.stop());
        assert!(!a.is_enabled());
    }
}
