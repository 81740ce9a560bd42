// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Setters for every setting.
//!
//! Each setter is a no-op when the value is unchanged: no event, no timer churn. Otherwise it
//! stores the value, emits the field's `<field>Change` event with the old and new values, and
//! applies the change to live state where that matters.

use kurbo::Vec2;
use waypoint_timers::Millis;

use super::Tour;
use crate::config::{Easing, InitialPosition, TourConfig};
use crate::content::Step;
use crate::event::{ConfigField, ConfigValue, EventPayload};
use crate::host::{Geometry, Renderer, Resolver};
use crate::state::{Mode, TimerKey};

impl<R: Resolver, D: Renderer, G: Geometry> Tour<R, D, G> {
    fn apply<T: PartialEq + Clone>(
        &mut self,
        field: ConfigField,
        slot: fn(&mut TourConfig) -> &mut T,
        value: T,
        wrap: fn(T) -> ConfigValue,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        let current = slot(&mut self.config);
        if *current == value {
            return false;
        }
        let from = core::mem::replace(current, value.clone());
        self.emit(EventPayload::ConfigChange {
            field,
            from: wrap(from),
            to: wrap(value),
        });
        true
    }

    /// Replace the steps and go to step 0.
    pub fn set_steps(&mut self, steps: Vec<Step<R::Element>>) {
        if self.destroyed || steps == self.steps {
            return;
        }
        let from = self.steps.len();
        let to = steps.len();
        self.steps = steps;
        self.emit(EventPayload::ConfigChange {
            field: ConfigField::Steps,
            from: ConfigValue::Count(from),
            to: ConfigValue::Count(to),
        });
        if self.steps.is_empty() {
            self.timers.cancel(TimerKey::Autoplay);
            self.step = 0;
            self.target = None;
            self.replace_messages(Vec::new(), true);
        } else {
            self.go_to_step(0);
        }
    }

    /// Offset handed to the geometry.
    pub fn set_offset(&mut self, offset: Vec2) {
        if self.apply(ConfigField::Offset, |c| &mut c.offset, offset, ConfigValue::Offset) {
            self.refresh_position();
        }
    }

    /// Movement duration. Takes effect on the next movement.
    pub fn set_animation_duration(&mut self, duration: Millis) {
        self.apply(
            ConfigField::AnimationDuration,
            |c| &mut c.animation_duration,
            duration,
            ConfigValue::Millis,
        );
    }

    /// Fade duration. Takes effect on the next fade.
    pub fn set_fade_duration(&mut self, duration: Millis) {
        self.apply(
            ConfigField::FadeDuration,
            |c| &mut c.fade_duration,
            duration,
            ConfigValue::Millis,
        );
    }

    /// Message interval. `0` stops a running cycle; otherwise a live cycle re-arms with it.
    pub fn set_message_interval(&mut self, interval: Millis) {
        if !self.apply(
            ConfigField::MessageInterval,
            |c| &mut c.message_interval,
            interval,
            ConfigValue::Millis,
        ) {
            return;
        }
        if interval == 0 {
            self.stop_message_cycle();
        } else if self.timers.is_pending(TimerKey::MessageCycle) {
            self.arm_cycle();
        }
    }

    /// Timing curve.
    pub fn set_easing(&mut self, easing: Easing) {
        self.apply(ConfigField::Easing, |c| &mut c.easing, easing, ConfigValue::Easing);
    }

    /// Enable or disable the tracking loop.
    pub fn set_tracking(&mut self, tracking: bool) {
        if self.apply(ConfigField::Tracking, |c| &mut c.tracking, tracking, ConfigValue::Flag) {
            self.sync_tracking();
        }
    }

    /// Tracking FPS cap (0 is uncapped).
    pub fn set_tracking_fps(&mut self, fps: u32) {
        if self.apply(ConfigField::TrackingFps, |c| &mut c.tracking_fps, fps, ConfigValue::Fps) {
            self.tracking.set_fps(fps);
        }
    }

    /// Initial position. A parked pointer moves to the new one on the next reset.
    pub fn set_initial_position(&mut self, position: InitialPosition) {
        self.apply(
            ConfigField::InitialPosition,
            |c| &mut c.initial_position,
            position,
            ConfigValue::InitialPosition,
        );
    }

    /// Autoplay interval. A pending autoplay timer re-arms with a fresh delay.
    pub fn set_autoplay_interval(&mut self, interval: Millis) {
        if self.apply(
            ConfigField::AutoplayInterval,
            |c| &mut c.autoplay_interval,
            interval,
            ConfigValue::Millis,
        ) && self.timers.is_pending(TimerKey::Autoplay)
        {
            self.schedule_autoplay();
        }
    }

    /// Enable or disable autoplay.
    pub fn set_autoplay(&mut self, autoplay: bool) {
        if !self.apply(ConfigField::Autoplay, |c| &mut c.autoplay, autoplay, ConfigValue::Flag) {
            return;
        }
        if autoplay {
            self.start_autoplay();
        } else {
            self.stop_autoplay();
        }
    }

    /// Whether autoplay waits for a step's messages.
    pub fn set_autoplay_wait_for_messages(&mut self, wait: bool) {
        if self.apply(
            ConfigField::AutoplayWaitForMessages,
            |c| &mut c.autoplay_wait_for_messages,
            wait,
            ConfigValue::Flag,
        ) && self.autoplay.is_running()
            && self.mode == Mode::Steps
            && !self.timers.is_pending(TimerKey::Settle)
        {
            self.schedule_autoplay();
        }
    }

    /// Reset to the initial position on completion.
    pub fn set_reset_on_complete(&mut self, reset: bool) {
        self.apply(
            ConfigField::ResetOnComplete,
            |c| &mut c.reset_on_complete,
            reset,
            ConfigValue::Flag,
        );
    }

    /// Hide on completion.
    pub fn set_hide_on_complete(&mut self, hide: bool) {
        self.apply(
            ConfigField::HideOnComplete,
            |c| &mut c.hide_on_complete,
            hide,
            ConfigValue::Flag,
        );
    }

    /// Delay before hiding on completion; `None` uses the animation duration.
    pub fn set_hide_on_complete_delay(&mut self, delay: Option<Millis>) {
        self.apply(
            ConfigField::HideOnCompleteDelay,
            |c| &mut c.hide_on_complete_delay,
            delay,
            ConfigValue::MaybeMillis,
        );
    }
}
