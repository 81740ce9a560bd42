// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tour state enums and the read-only snapshot.

use kurbo::Point;
use waypoint_timers::Millis;

use crate::autoplay::AutoplayMode;
use crate::config::Direction;
use crate::host::PointerFlags;
use crate::messages::CycleState;

/// Visibility lifecycle.
///
/// `Hidden → Showing → Visible → Hiding → Hidden`. `Showing` lasts for the intro (or not at
/// all on later shows); `Hiding` lasts for the fade-out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Not shown.
    #[default]
    Hidden,
    /// Playing the intro.
    Showing,
    /// Shown.
    Visible,
    /// Fading out.
    Hiding,
}

/// What the pointer follows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The current step's target.
    #[default]
    Steps,
    /// An arbitrary target from `point_to`; the step cursor is untouched.
    PointTo,
    /// Resting at the initial position after `reset`.
    Parked,
}

/// Keys of the engine's timers. At most one timer per key is live.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    /// End of a movement animation.
    Settle,
    /// End of the intro fade-in.
    IntroFade,
    /// End of the intro movement.
    IntroMove,
    /// End of the hide fade-out.
    HideFade,
    /// End of the bubble fade-out after a reset.
    BubbleFade,
    /// Periodic message cycle.
    MessageCycle,
    /// Autoplay advance.
    Autoplay,
    /// Hide after completion.
    AutoHide,
    /// Delayed show after a restart.
    RestartShow,
}

/// Read-only view of a tour's state.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<E> {
    /// Engine clock.
    pub now: Millis,
    /// Visibility.
    pub visibility: Visibility,
    /// What the pointer follows.
    pub mode: Mode,
    /// Current step index.
    pub step: usize,
    /// Number of steps.
    pub step_count: usize,
    /// Current message index.
    pub message: usize,
    /// Number of messages.
    pub message_count: usize,
    /// Message cycle state.
    pub cycle: CycleState,
    /// Autoplay mode.
    pub autoplay: AutoplayMode,
    /// Effective pointing direction.
    pub direction: Direction,
    /// Manual direction override.
    pub manual_direction: Option<Direction>,
    /// Pointer position.
    pub position: Point,
    /// Visual flags.
    pub flags: PointerFlags,
    /// Whether the intro has played since the last reset or restart.
    pub has_intro_played: bool,
    /// Whether the tracking loop runs.
    pub tracking: bool,
    /// Current pointee.
    pub target: Option<E>,
    /// True after `destroy`.
    pub destroyed: bool,
}
