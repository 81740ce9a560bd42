// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events emitted by a [`Tour`](crate::Tour).
//!
//! ## Names and groups
//!
//! Every [`EventKind`] has a stable wire name ([`EventKind::name`]) and belongs to exactly one
//! [`EventGroup`] ([`EventKind::group`]). Both come from the explicit match tables in this
//! module; nothing is inferred from the shape of a name.
//!
//! | Group          | Kinds |
//! |----------------|-------|
//! | `lifecycle`    | `beforeShow`, `show`, `beforeHide`, `hide`, `destroy`, `restart`, `reset` |
//! | `navigation`   | `stepChange`, `next`, `prev`, `complete` |
//! | `animation`    | `introStart`, `introComplete`, `moveStart`, `moveComplete` |
//! | `content`      | `contentChange`, `messagesSet` |
//! | `messageCycle` | `messageChange`, `messageCycleStart`, `messageCycleStop`, `messageCyclePause`, `messageCycleResume`, `messageCycleComplete` |
//! | `pointing`     | `pointTo`, `directionChange` |
//! | `tracking`     | `trackingStart`, `trackingStop`, `track` |
//! | `autoplay`     | `autoplayStart`, `autoplayStop`, `autoplayPause`, `autoplayResume`, `autoplayNext`, `autoplayComplete`, `autoHide` |
//! | `config`       | one `<field>Change` per [`ConfigField`] |

use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Point, Vec2};
use waypoint_bus::Routable;
use waypoint_timers::Millis;

use crate::config::{Direction, Easing, InitialPosition};
use crate::content::Content;

/// Identity of a tour instance, carried by every event it emits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TourId(pub u64);

impl TourId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Event groups, usable as bus topics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventGroup {
    /// Visibility and instance lifetime.
    Lifecycle,
    /// Step changes and completion.
    Navigation,
    /// Intro and movement animations.
    Animation,
    /// Bubble content.
    Content,
    /// Message cursor and cycling.
    MessageCycle,
    /// Point-to mode and direction.
    Pointing,
    /// The tracking loop.
    Tracking,
    /// Autoplay and auto-hide.
    Autoplay,
    /// Settings changes.
    Config,
}

impl EventGroup {
    /// Wire name of the group.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lifecycle => "lifecycle",
            Self::Navigation => "navigation",
            Self::Animation => "animation",
            Self::Content => "content",
            Self::MessageCycle => "messageCycle",
            Self::Pointing => "pointing",
            Self::Tracking => "tracking",
            Self::Autoplay => "autoplay",
            Self::Config => "config",
        }
    }
}

/// A setting whose change is reported by a `<field>Change` event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// The step list.
    Steps,
    /// [`TourConfig::offset`](crate::TourConfig::offset).
    Offset,
    /// [`TourConfig::animation_duration`](crate::TourConfig::animation_duration).
    AnimationDuration,
    /// [`TourConfig::fade_duration`](crate::TourConfig::fade_duration).
    FadeDuration,
    /// [`TourConfig::message_interval`](crate::TourConfig::message_interval).
    MessageInterval,
    /// [`TourConfig::easing`](crate::TourConfig::easing).
    Easing,
    /// [`TourConfig::tracking`](crate::TourConfig::tracking).
    Tracking,
    /// [`TourConfig::tracking_fps`](crate::TourConfig::tracking_fps).
    TrackingFps,
    /// [`TourConfig::initial_position`](crate::TourConfig::initial_position).
    InitialPosition,
    /// [`TourConfig::autoplay_interval`](crate::TourConfig::autoplay_interval).
    AutoplayInterval,
    /// [`TourConfig::autoplay`](crate::TourConfig::autoplay).
    Autoplay,
    /// [`TourConfig::autoplay_wait_for_messages`](crate::TourConfig::autoplay_wait_for_messages).
    AutoplayWaitForMessages,
    /// [`TourConfig::reset_on_complete`](crate::TourConfig::reset_on_complete).
    ResetOnComplete,
    /// [`TourConfig::hide_on_complete`](crate::TourConfig::hide_on_complete).
    HideOnComplete,
    /// [`TourConfig::hide_on_complete_delay`](crate::TourConfig::hide_on_complete_delay).
    HideOnCompleteDelay,
}

impl ConfigField {
    /// Every field, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Steps,
        Self::Offset,
        Self::AnimationDuration,
        Self::FadeDuration,
        Self::MessageInterval,
        Self::Easing,
        Self::Tracking,
        Self::TrackingFps,
        Self::InitialPosition,
        Self::AutoplayInterval,
        Self::Autoplay,
        Self::AutoplayWaitForMessages,
        Self::ResetOnComplete,
        Self::HideOnComplete,
        Self::HideOnCompleteDelay,
    ];

    /// Name of the change event for this field.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Steps => "stepsChange",
            Self::Offset => "offsetChange",
            Self::AnimationDuration => "animationDurationChange",
            Self::FadeDuration => "fadeDurationChange",
            Self::MessageInterval => "messageIntervalChange",
            Self::Easing => "easingChange",
            Self::Tracking => "trackingChange",
            Self::TrackingFps => "trackingFpsChange",
            Self::InitialPosition => "initialPositionChange",
            Self::AutoplayInterval => "autoplayIntervalChange",
            Self::Autoplay => "autoplayChange",
            Self::AutoplayWaitForMessages => "autoplayWaitForMessagesChange",
            Self::ResetOnComplete => "resetOnCompleteChange",
            Self::HideOnComplete => "hideOnCompleteChange",
            Self::HideOnCompleteDelay => "hideOnCompleteDelayChange",
        }
    }
}

/// Discriminant of an event, usable as an exact bus topic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "each variant is documented by its wire name")]
pub enum EventKind {
    BeforeShow,
    Show,
    BeforeHide,
    Hide,
    Destroy,
    Restart,
    Reset,
    StepChange,
    Next,
    Prev,
    Complete,
    IntroStart,
    IntroComplete,
    MoveStart,
    MoveComplete,
    ContentChange,
    MessagesSet,
    MessageChange,
    MessageCycleStart,
    MessageCycleStop,
    MessageCyclePause,
    MessageCycleResume,
    MessageCycleComplete,
    PointTo,
    DirectionChange,
    TrackingStart,
    TrackingStop,
    Track,
    AutoplayStart,
    AutoplayStop,
    AutoplayPause,
    AutoplayResume,
    AutoplayNext,
    AutoplayComplete,
    AutoHide,
    ConfigChange(ConfigField),
}

impl EventKind {
    /// Wire name of the event.
    pub fn name(self) -> &'static str {
        match self {
            Self::BeforeShow => "beforeShow",
            Self::Show => "show",
            Self::BeforeHide => "beforeHide",
            Self::Hide => "hide",
            Self::Destroy => "destroy",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::StepChange => "stepChange",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Complete => "complete",
            Self::IntroStart => "introStart",
            Self::IntroComplete => "introComplete",
            Self::MoveStart => "moveStart",
            Self::MoveComplete => "moveComplete",
            Self::ContentChange => "contentChange",
            Self::MessagesSet => "messagesSet",
            Self::MessageChange => "messageChange",
            Self::MessageCycleStart => "messageCycleStart",
            Self::MessageCycleStop => "messageCycleStop",
            Self::MessageCyclePause => "messageCyclePause",
            Self::MessageCycleResume => "messageCycleResume",
            Self::MessageCycleComplete => "messageCycleComplete",
            Self::PointTo => "pointTo",
            Self::DirectionChange => "directionChange",
            Self::TrackingStart => "trackingStart",
            Self::TrackingStop => "trackingStop",
            Self::Track => "track",
            Self::AutoplayStart => "autoplayStart",
            Self::AutoplayStop => "autoplayStop",
            Self::AutoplayPause => "autoplayPause",
            Self::AutoplayResume => "autoplayResume",
            Self::AutoplayNext => "autoplayNext",
            Self::AutoplayComplete => "autoplayComplete",
            Self::AutoHide => "autoHide",
            Self::ConfigChange(field) => field.event_name(),
        }
    }

    /// Group containing this kind.
    pub fn group(self) -> EventGroup {
        match self {
            Self::BeforeShow
            | Self::Show
            | Self::BeforeHide
            | Self::Hide
            | Self::Destroy
            | Self::Restart
            | Self::Reset => EventGroup::Lifecycle,
            Self::StepChange | Self::Next | Self::Prev | Self::Complete => EventGroup::Navigation,
            Self::IntroStart | Self::IntroComplete | Self::MoveStart | Self::MoveComplete => {
                EventGroup::Animation
            }
            Self::ContentChange | Self::MessagesSet => EventGroup::Content,
            Self::MessageChange
            | Self::MessageCycleStart
            | Self::MessageCycleStop
            | Self::MessageCyclePause
            | Self::MessageCycleResume
            | Self::MessageCycleComplete => EventGroup::MessageCycle,
            Self::PointTo | Self::DirectionChange => EventGroup::Pointing,
            Self::TrackingStart | Self::TrackingStop | Self::Track => EventGroup::Tracking,
            Self::AutoplayStart
            | Self::AutoplayStop
            | Self::AutoplayPause
            | Self::AutoplayResume
            | Self::AutoplayNext
            | Self::AutoplayComplete
            | Self::AutoHide => EventGroup::Autoplay,
            Self::ConfigChange(_) => EventGroup::Config,
        }
    }

    /// Look a kind up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        const PLAIN: [EventKind; 35] = [
            EventKind::BeforeShow,
            EventKind::Show,
            EventKind::BeforeHide,
            EventKind::Hide,
            EventKind::Destroy,
            EventKind::Restart,
            EventKind::Reset,
            EventKind::StepChange,
            EventKind::Next,
            EventKind::Prev,
            EventKind::Complete,
            EventKind::IntroStart,
            EventKind::IntroComplete,
            EventKind::MoveStart,
            EventKind::MoveComplete,
            EventKind::ContentChange,
            EventKind::MessagesSet,
            EventKind::MessageChange,
            EventKind::MessageCycleStart,
            EventKind::MessageCycleStop,
            EventKind::MessageCyclePause,
            EventKind::MessageCycleResume,
            EventKind::MessageCycleComplete,
            EventKind::PointTo,
            EventKind::DirectionChange,
            EventKind::TrackingStart,
            EventKind::TrackingStop,
            EventKind::Track,
            EventKind::AutoplayStart,
            EventKind::AutoplayStop,
            EventKind::AutoplayPause,
            EventKind::AutoplayResume,
            EventKind::AutoplayNext,
            EventKind::AutoplayComplete,
            EventKind::AutoHide,
        ];
        PLAIN
            .into_iter()
            .chain(ConfigField::ALL.into_iter().map(Self::ConfigChange))
            .find(|k| k.name() == name)
    }
}

/// What drove a tour to completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompletionSource {
    /// An autoplay timer called `next()` on the last step.
    Autoplay,
    /// The host called `next()` on the last step.
    Manual,
}

impl CompletionSource {
    /// Wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Autoplay => "autoplay",
            Self::Manual => "manual",
        }
    }
}

/// Old or new value of a changed setting.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs, reason = "variants mirror the setting types")]
pub enum ConfigValue {
    Flag(bool),
    Millis(Millis),
    MaybeMillis(Option<Millis>),
    Count(usize),
    Fps(u32),
    Offset(Vec2),
    Easing(Easing),
    InitialPosition(InitialPosition),
}

/// Event-specific data. Unit variants carry no fields beyond the envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// About to become visible.
    BeforeShow,
    /// Became visible; `intro` is true when the intro animation is starting.
    Show {
        /// Whether this show plays the intro.
        intro: bool,
    },
    /// About to hide.
    BeforeHide,
    /// Fully hidden.
    Hide,
    /// Destroyed; the last event the instance emits.
    Destroy,
    /// `restart()` was called.
    Restart,
    /// `reset()` was called.
    Reset {
        /// Whether step 0's content is reloaded.
        go_to_first_step: bool,
    },
    /// The step cursor moved.
    StepChange {
        /// Previous index.
        from: usize,
        /// New index.
        to: usize,
        /// Number of steps.
        total: usize,
    },
    /// `next()` moved forward.
    Next {
        /// Previous index.
        from: usize,
        /// New index.
        to: usize,
    },
    /// `prev()` moved back.
    Prev {
        /// Previous index.
        from: usize,
        /// New index.
        to: usize,
    },
    /// `next()` was called on the last step.
    Complete {
        /// The last step's index.
        step: usize,
        /// What drove the completion.
        source: CompletionSource,
    },
    /// The intro animation started at `from`.
    IntroStart {
        /// Initial position.
        from: Point,
    },
    /// The intro animation finished.
    IntroComplete,
    /// A movement animation started.
    MoveStart {
        /// Where the pointer was.
        from: Point,
        /// Where it is heading.
        to: Point,
        /// Animation length.
        duration: Millis,
    },
    /// A movement animation settled.
    MoveComplete {
        /// Where it ended.
        position: Point,
    },
    /// The bubble shows new content.
    ContentChange {
        /// The content now shown.
        content: Content,
        /// Message index.
        index: usize,
        /// Number of messages.
        total: usize,
    },
    /// The message list was replaced.
    MessagesSet {
        /// Number of messages.
        count: usize,
        /// True when the list came from a step change.
        from_step_change: bool,
    },
    /// The message cursor moved.
    MessageChange {
        /// Previous index.
        from: usize,
        /// New index.
        to: usize,
        /// Number of messages.
        total: usize,
        /// True when the cycle timer moved it.
        auto: bool,
    },
    /// Message cycling started.
    MessageCycleStart {
        /// Interval between messages.
        interval: Millis,
    },
    /// Message cycling stopped.
    MessageCycleStop,
    /// Message cycling paused.
    MessageCyclePause,
    /// Message cycling resumed.
    MessageCycleResume,
    /// Every message of a step was shown while autoplay waits for messages.
    MessageCycleComplete {
        /// Step whose messages completed.
        step: usize,
    },
    /// Point-to mode entered.
    PointTo {
        /// Selector of the new target, when it was given as one.
        selector: Option<String>,
        /// Whether the target resolved to an element.
        resolved: bool,
    },
    /// The pointing direction flipped.
    DirectionChange {
        /// Previous direction.
        from: Direction,
        /// New direction.
        to: Direction,
        /// True when caused by an explicit direction rather than inference.
        manual: bool,
    },
    /// The tracking loop started.
    TrackingStart {
        /// FPS cap (0 is uncapped).
        fps: u32,
    },
    /// The tracking loop stopped.
    TrackingStop,
    /// The tracking loop moved the pointer.
    Track {
        /// New position.
        position: Point,
        /// Current direction.
        direction: Direction,
    },
    /// Autoplay enabled.
    AutoplayStart,
    /// Autoplay disabled.
    AutoplayStop,
    /// Autoplay paused.
    AutoplayPause,
    /// Autoplay resumed.
    AutoplayResume,
    /// Autoplay is advancing.
    AutoplayNext {
        /// Current step.
        from: usize,
        /// Next step, or `None` when this completes the tour.
        to: Option<usize>,
    },
    /// Autoplay ran to the end of the tour.
    AutoplayComplete,
    /// Hiding automatically after completion.
    AutoHide {
        /// What drove the completion.
        source: CompletionSource,
    },
    /// A setting changed.
    ConfigChange {
        /// Which setting.
        field: ConfigField,
        /// Old value.
        from: ConfigValue,
        /// New value.
        to: ConfigValue,
    },
}

impl EventPayload {
    /// Discriminant of this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::BeforeShow => EventKind::BeforeShow,
            Self::Show { .. } => EventKind::Show,
            Self::BeforeHide => EventKind::BeforeHide,
            Self::Hide => EventKind::Hide,
            Self::Destroy => EventKind::Destroy,
            Self::Restart => EventKind::Restart,
            Self::Reset { .. } => EventKind::Reset,
            Self::StepChange { .. } => EventKind::StepChange,
            Self::Next { .. } => EventKind::Next,
            Self::Prev { .. } => EventKind::Prev,
            Self::Complete { .. } => EventKind::Complete,
            Self::IntroStart { .. } => EventKind::IntroStart,
            Self::IntroComplete => EventKind::IntroComplete,
            Self::MoveStart { .. } => EventKind::MoveStart,
            Self::MoveComplete { .. } => EventKind::MoveComplete,
            Self::ContentChange { .. } => EventKind::ContentChange,
            Self::MessagesSet { .. } => EventKind::MessagesSet,
            Self::MessageChange { .. } => EventKind::MessageChange,
            Self::MessageCycleStart { .. } => EventKind::MessageCycleStart,
            Self::MessageCycleStop => EventKind::MessageCycleStop,
            Self::MessageCyclePause => EventKind::MessageCyclePause,
            Self::MessageCycleResume => EventKind::MessageCycleResume,
            Self::MessageCycleComplete { .. } => EventKind::MessageCycleComplete,
            Self::PointTo { .. } => EventKind::PointTo,
            Self::DirectionChange { .. } => EventKind::DirectionChange,
            Self::TrackingStart { .. } => EventKind::TrackingStart,
            Self::TrackingStop => EventKind::TrackingStop,
            Self::Track { .. } => EventKind::Track,
            Self::AutoplayStart => EventKind::AutoplayStart,
            Self::AutoplayStop => EventKind::AutoplayStop,
            Self::AutoplayPause => EventKind::AutoplayPause,
            Self::AutoplayResume => EventKind::AutoplayResume,
            Self::AutoplayNext { .. } => EventKind::AutoplayNext,
            Self::AutoplayComplete => EventKind::AutoplayComplete,
            Self::AutoHide { .. } => EventKind::AutoHide,
            Self::ConfigChange { field, .. } => EventKind::ConfigChange(*field),
        }
    }
}

/// Envelope delivered to observers.
#[derive(Clone, Debug, PartialEq)]
pub struct TourEvent {
    /// The emitting instance.
    pub source: TourId,
    /// Engine clock when the event was emitted.
    pub at: Millis,
    /// Event-specific data.
    pub payload: EventPayload,
}

impl TourEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        self.payload.kind().name()
    }
}

impl Routable for TourEvent {
    type Kind = EventKind;
    type Group = EventGroup;

    fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    fn group(&self) -> Option<EventGroup> {
        Some(self.payload.kind().group())
    }
}

/// Bus topic over tour events.
pub type TourTopic = waypoint_bus::Topic<EventKind, EventGroup>;
