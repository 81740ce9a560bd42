// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate limiter for the tracking loop.

use waypoint_timers::Millis;

/// Whether the tracking loop runs, and at what rate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackingLoop {
    fps: u32,
    running: bool,
    last_tick: Option<Millis>,
}

impl TrackingLoop {
    /// A stopped loop capped at `fps` (0 is uncapped).
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            running: false,
            last_tick: None,
        }
    }

    /// True while running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The cap.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Start. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.last_tick = None;
        true
    }

    /// Stop. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        core::mem::replace(&mut self.running, false)
    }

    /// Change the cap; takes effect on the next frame.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    /// Minimum time between two iterations, or `None` when uncapped.
    pub fn interval(&self) -> Option<Millis> {
        (self.fps > 0).then(|| (1_000 / Millis::from(self.fps)).max(1))
    }

    /// Decide whether the frame at `now` runs an iteration, and record it if so.
    pub fn should_tick(&mut self, now: Millis) -> bool {
        if !self.running {
            return false;
        }
        let due = match (self.interval(), self.last_tick) {
            (Some(interval), Some(last)) => now.saturating_sub(last) >= interval,
            _ => true,
        };
        if due {
            self.last_tick = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_runs_every_frame() {
        let mut t = TrackingLoop::new(0);
        assert!(!t.should_tick(0));
        t.start();
        assert!(t.should_tick(0));
        assert!(t.should_tick(0));
        assert!(t.should_tick(16));
    }

    #[test]
    fn cap_skips_early_frames() {
        let mut t = TrackingLoop::new(10);
        t.start();
        assert!(t.should_tick(0));
        assert!(!t.should_tick(16));
        assert!(!t.should_tick(99));
        assert!(t.should_tick(100));
    }

    #[test]
    fn restart_ticks_immediately() {
        let mut t = TrackingLoop::new(1);
        t.start();
        assert!(t.should_tick(0));
        assert!(t.stop());
        assert!(!t.stop());
        t.start();
        assert!(t.should_tick(10));
    }
}
