// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tour state machine.
//!
//! [`Tour`] is the single writer of every piece of tour state. Hosts call its operations
//! and drive its clock with [`Tour::tick`]; timers and the tracking loop re-enter it only
//! through that call. Every transition is reported on its event bus.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use kurbo::Point;
use tracing::{debug, error, trace, warn};
use waypoint_bus::{EventBus, SubscriptionId};
use waypoint_timers::{Millis, TimerSet};

use crate::autoplay::{self, Autoplay, AutoplayMode, AutoplayPlan};
use crate::config::{
    Anchor, CompleteFn, Direction, InitialPosition, StepChangeFn, TourConfig, TourOptions,
};
use crate::content::{Content, Step, StepContent, Target};
use crate::direction::DirectionTracker;
use crate::event::{CompletionSource, EventPayload, TourEvent, TourId, TourTopic};
use crate::host::{CenterAnchor, Geometry, PointerFlags, PointerFrame, Renderer, Resolver, Transition};
use crate::messages::{CycleState, MessageCursor, PauseCause};
use crate::state::{Mode, Snapshot, TimerKey, Visibility};
use crate::tracking::TrackingLoop;

mod setters;

/// Extra delay after the fade-out before a restart shows again.
pub const RESTART_SETTLE: Millis = 50;

/// Timers owned by a single flow, canceled when that flow is superseded.
const MOTION_TIMERS: [TimerKey; 6] = [
    TimerKey::Settle,
    TimerKey::IntroFade,
    TimerKey::IntroMove,
    TimerKey::BubbleFade,
    TimerKey::MessageCycle,
    TimerKey::Autoplay,
];

/// An animated pointer tour.
///
/// `R` finds elements, `D` paints, `G` places the pointer next to a target.
pub struct Tour<R: Resolver, D: Renderer, G: Geometry = CenterAnchor> {
    id: TourId,
    config: TourConfig,
    steps: Vec<Step<R::Element>>,
    resolver: R,
    renderer: D,
    geometry: G,
    bus: EventBus<TourEvent>,
    timers: TimerSet<TimerKey>,
    now: Millis,
    visibility: Visibility,
    mode: Mode,
    step: usize,
    has_intro_played: bool,
    target: Option<R::Element>,
    tracker: DirectionTracker,
    cursor: MessageCursor,
    autoplay: Autoplay,
    tracking: TrackingLoop,
    position: Point,
    flags: PointerFlags,
    reload_first_step: bool,
    hide_source: Option<CompletionSource>,
    on_step_change: Option<StepChangeFn<R::Element>>,
    on_complete: Option<CompleteFn>,
    destroyed: bool,
}

impl<R: Resolver, D: Renderer, G: Geometry> fmt::Debug for Tour<R, D, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tour")
            .field("id", &self.id)
            .field("now", &self.now)
            .field("visibility", &self.visibility)
            .field("mode", &self.mode)
            .field("step", &self.step)
            .field("steps", &self.steps.len())
            .field("cursor", &self.cursor)
            .field("autoplay", &self.autoplay)
            .field("timers", &self.timers.len())
            .field("bus", &self.bus)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<R: Resolver, D: Renderer> Tour<R, D> {
    /// Build a hidden tour that places the pointer with [`CenterAnchor`].
    pub fn new(options: TourOptions<R::Element>, resolver: R, renderer: D) -> Self {
        Self::with_geometry(options, resolver, renderer, CenterAnchor)
    }
}

impl<R: Resolver, D: Renderer, G: Geometry> Tour<R, D, G> {
    /// Build a hidden tour with a custom [`Geometry`].
    ///
    /// The initial target and content default to the first step's. Nothing is emitted until
    /// the first operation; the first message is rendered right away.
    pub fn with_geometry(
        options: TourOptions<R::Element>,
        resolver: R,
        renderer: D,
        geometry: G,
    ) -> Self {
        let TourOptions {
            config,
            steps,
            target,
            content,
            on_step_change,
            on_complete,
            id,
        } = options;
        let mut tour = Self {
            id: id.unwrap_or_else(TourId::next),
            tracking: TrackingLoop::new(config.tracking_fps),
            config,
            steps,
            resolver,
            renderer,
            geometry,
            bus: EventBus::new(),
            timers: TimerSet::new(),
            now: 0,
            visibility: Visibility::Hidden,
            mode: Mode::Steps,
            step: 0,
            has_intro_played: false,
            target: None,
            tracker: DirectionTracker::new(),
            cursor: MessageCursor::default(),
            autoplay: Autoplay::default(),
            position: Point::ZERO,
            flags: PointerFlags::empty(),
            reload_first_step: false,
            hide_source: None,
            on_step_change,
            on_complete,
            destroyed: false,
        };

        let first = tour.steps.first();
        let target = target.or_else(|| first.map(|s| s.target.clone()));
        let content = content.or_else(|| first.map(|s| s.content.clone()));
        if let Some(direction) = first.and_then(|s| s.direction) {
            tour.tracker.set_manual(Some(direction));
        }
        tour.target = target.and_then(|t| tour.resolve(&t));
        tour.cursor = MessageCursor::new(content.map(StepContent::into_vec).unwrap_or_default());
        if let Some(c) = tour.cursor.current() {
            tour.renderer.render(c);
        }
        if tour.config.message_interval > 0 {
            tour.cursor.start();
        }
        if tour.config.autoplay {
            tour.autoplay.start();
        }
        tour.position = tour.initial_point();
        tour.sync_direction_flag();
        debug!(tour = tour.id.0, steps = tour.steps.len(), "tour created");
        tour
    }

    // --- Clock ---------------------------------------------------------------

    /// Advance the engine clock to `now`.
    ///
    /// Fires every due timer in deadline order, with the clock set to each deadline while its
    /// continuation runs, then runs one tracking iteration if the FPS cap allows.
    /// Times earlier than the current clock are treated as the current clock.
    pub fn tick(&mut self, now: Millis) {
        if self.destroyed {
            return;
        }
        let now = now.max(self.now);
        while let Some(fired) = self.timers.pop_due(now) {
            self.now = fired.at;
            trace!(tour = self.id.0, key = ?fired.key, at = fired.at, "timer fired");
            self.fire(fired.key);
            if self.destroyed {
                return;
            }
        }
        self.now = now;
        if self.tracking.should_tick(now) {
            self.track();
        }
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    fn fire(&mut self, key: TimerKey) {
        match key {
            TimerKey::Settle => self.on_settle(),
            TimerKey::IntroFade => self.on_intro_faded(),
            TimerKey::IntroMove => self.on_intro_moved(),
            TimerKey::HideFade => self.on_hidden(),
            TimerKey::BubbleFade => self.on_bubble_faded(),
            TimerKey::MessageCycle => self.on_cycle_tick(),
            TimerKey::Autoplay => self.on_autoplay_due(),
            TimerKey::AutoHide => self.on_auto_hide(),
            TimerKey::RestartShow => self.show(),
        }
    }

    // --- Subscriptions -------------------------------------------------------

    /// Subscribe to an event kind, a group, or everything.
    pub fn on(
        &mut self,
        topic: TourTopic,
        handler: impl FnMut(&TourEvent) + 'static,
    ) -> SubscriptionId {
        self.bus.on(topic, handler)
    }

    /// Unsubscribe one handler (`Some(id)`) or every handler on `topic`.
    pub fn off(&mut self, topic: TourTopic, id: Option<SubscriptionId>) -> usize {
        self.bus.off(topic, id)
    }

    /// Unsubscribe a handler wherever it is subscribed.
    pub fn off_id(&mut self, id: SubscriptionId) -> bool {
        self.bus.off_id(id)
    }

    // --- Lifecycle -----------------------------------------------------------

    /// Show the pointer.
    ///
    /// The first show (and the first after a reset or restart) plays the intro. Later shows
    /// fade in at the target and resume a cycle or autoplay that `hide` paused.
    pub fn show(&mut self) {
        if self.destroyed {
            return;
        }
        match self.visibility {
            Visibility::Visible | Visibility::Showing => return,
            Visibility::Hiding => {
                self.timers.cancel(TimerKey::HideFade);
            }
            Visibility::Hidden => {}
        }
        self.timers.cancel(TimerKey::RestartShow);
        debug!(tour = self.id.0, intro = !self.has_intro_played, "show");
        self.emit(EventPayload::BeforeShow);
        if self.has_intro_played {
            self.reveal();
        } else {
            self.play_intro();
        }
    }

    fn play_intro(&mut self) {
        self.visibility = Visibility::Showing;
        if self.mode == Mode::Parked {
            self.mode = Mode::Steps;
        }
        let from = self.initial_point();
        self.position = from;
        self.flags = PointerFlags::INTRO;
        self.sync_direction_flag();
        self.present(None);
        self.flags.insert(PointerFlags::VISIBLE);
        let fade = self.fade();
        self.present(Some(fade));
        self.emit(EventPayload::Show { intro: true });
        self.emit(EventPayload::IntroStart { from });
        self.timers
            .schedule(TimerKey::IntroFade, self.now, self.config.fade_duration);
    }

    fn on_intro_faded(&mut self) {
        if self.config.initial_position == InitialPosition::Preset(Anchor::FirstStep) {
            self.finish_intro();
            return;
        }
        let Some(to) = self.target_point() else {
            self.finish_intro();
            return;
        };
        let from = self.position;
        let duration = self.config.animation_duration;
        self.position = to;
        self.flags.insert(PointerFlags::MOVING);
        self.sync_direction_flag();
        let movement = self.movement();
        self.present(Some(movement));
        self.emit(EventPayload::MoveStart { from, to, duration });
        self.timers.schedule(TimerKey::IntroMove, self.now, duration);
    }

    fn on_intro_moved(&mut self) {
        self.flags.remove(PointerFlags::MOVING);
        self.emit(EventPayload::MoveComplete {
            position: self.position,
        });
        self.finish_intro();
    }

    fn finish_intro(&mut self) {
        self.has_intro_played = true;
        self.flags.remove(PointerFlags::INTRO);
        self.flags.insert(PointerFlags::BUBBLE_VISIBLE);
        let fade = self.fade();
        self.present(Some(fade));
        self.emit(EventPayload::IntroComplete);
        self.enter_visible();
    }

    fn reveal(&mut self) {
        if self.mode != Mode::Parked
            && let Some(p) = self.target_point()
        {
            self.position = p;
        }
        self.flags.insert(PointerFlags::VISIBLE | PointerFlags::BUBBLE_VISIBLE);
        self.sync_direction_flag();
        let fade = self.fade();
        self.present(Some(fade));
        self.emit(EventPayload::Show { intro: false });
        self.enter_visible();
    }

    fn enter_visible(&mut self) {
        self.visibility = Visibility::Visible;
        self.sync_tracking();
        if self.cursor.cycle() == CycleState::Paused(PauseCause::Hidden)
            && self.cursor.resume().is_some()
        {
            self.emit(EventPayload::MessageCycleResume);
        }
        self.arm_cycle();
        if self.autoplay.mode() == AutoplayMode::Paused(PauseCause::Hidden)
            && self.autoplay.resume().is_some()
        {
            self.emit(EventPayload::AutoplayResume);
        }
        self.schedule_autoplay();
    }

    /// Hide the pointer.
    ///
    /// Stops tracking and pauses (without stopping) message cycling and autoplay so the next
    /// `show` resumes them. Cancels a pending auto-hide. Fades out over `fade_duration`.
    pub fn hide(&mut self) {
        if self.destroyed {
            return;
        }
        match self.visibility {
            Visibility::Hidden | Visibility::Hiding => return,
            Visibility::Showing => {
                self.timers.cancel(TimerKey::IntroFade);
                self.timers.cancel(TimerKey::IntroMove);
                self.flags.remove(PointerFlags::INTRO | PointerFlags::MOVING);
            }
            Visibility::Visible => {}
        }
        debug!(tour = self.id.0, "hide");
        self.emit(EventPayload::BeforeHide);
        self.visibility = Visibility::Hiding;
        self.sync_tracking();
        if self.cursor.pause(PauseCause::Hidden) {
            self.timers.cancel(TimerKey::MessageCycle);
            self.emit(EventPayload::MessageCyclePause);
        }
        if self.autoplay.pause(PauseCause::Hidden) {
            self.timers.cancel(TimerKey::Autoplay);
            self.emit(EventPayload::AutoplayPause);
        }
        self.timers.cancel(TimerKey::AutoHide);
        self.hide_source = None;
        self.flags
            .remove(PointerFlags::VISIBLE | PointerFlags::BUBBLE_VISIBLE);
        let fade = self.fade();
        self.present(Some(fade));
        self.timers
            .schedule(TimerKey::HideFade, self.now, self.config.fade_duration);
    }

    fn on_hidden(&mut self) {
        self.visibility = Visibility::Hidden;
        self.emit(EventPayload::Hide);
    }

    /// Tear the tour down.
    ///
    /// Cancels every timer, emits `destroy`, drops every subscriber and detaches the renderer.
    /// Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        debug!(tour = self.id.0, "destroy");
        self.timers.cancel_all();
        if self.tracking.stop() {
            self.emit(EventPayload::TrackingStop);
        }
        self.emit(EventPayload::Destroy);
        self.bus.clear();
        self.renderer.detach();
        self.on_step_change = None;
        self.on_complete = None;
        self.visibility = Visibility::Hidden;
        self.flags = PointerFlags::empty();
        self.destroyed = true;
    }

    /// Replay the tour from step 0 with the intro.
    ///
    /// When shown, hides first and shows again once the fade-out has finished.
    pub fn restart(&mut self) {
        if self.destroyed {
            return;
        }
        debug!(tour = self.id.0, "restart");
        self.emit(EventPayload::Restart);
        for key in MOTION_TIMERS {
            self.timers.cancel(key);
        }
        self.timers.cancel(TimerKey::AutoHide);
        self.timers.cancel(TimerKey::RestartShow);
        self.reload_first_step = false;
        self.hide_source = None;
        if matches!(self.visibility, Visibility::Visible | Visibility::Showing) {
            self.hide();
        }
        if self.cursor.stop() {
            self.emit(EventPayload::MessageCycleStop);
        }
        self.has_intro_played = false;
        self.mode = Mode::Steps;
        let from = self.step;
        if !self.steps.is_empty() {
            self.load_step(0, true);
            if from != 0 {
                self.step_changed(from);
            }
        }
        if self.config.autoplay && self.autoplay.start() {
            self.emit(EventPayload::AutoplayStart);
        }
        if self.visibility == Visibility::Hidden {
            self.show();
        } else {
            self.timers.schedule(
                TimerKey::RestartShow,
                self.now,
                self.config.fade_duration + RESTART_SETTLE,
            );
        }
    }

    /// Move back to the initial position and fade the bubble out.
    ///
    /// With `go_to_first_step`, step 0's content is loaded once the bubble has faded. The next
    /// `show` after a hide replays the intro.
    pub fn reset(&mut self, go_to_first_step: bool) {
        if self.destroyed {
            return;
        }
        debug!(tour = self.id.0, go_to_first_step, "reset");
        for key in MOTION_TIMERS {
            self.timers.cancel(key);
        }
        self.emit(EventPayload::Reset { go_to_first_step });
        if self.visibility == Visibility::Showing {
            self.visibility = Visibility::Visible;
            self.flags.remove(PointerFlags::INTRO);
            self.flags.insert(PointerFlags::VISIBLE);
        }
        self.mode = Mode::Parked;
        self.has_intro_played = false;
        self.sync_tracking();
        if self.cursor.stop() {
            self.emit(EventPayload::MessageCycleStop);
        }
        let from = self.position;
        let to = self.initial_point();
        let duration = self.config.animation_duration;
        self.position = to;
        self.flags.insert(PointerFlags::MOVING);
        self.flags.remove(PointerFlags::BUBBLE_VISIBLE);
        let movement = self.movement();
        self.present(Some(movement));
        self.emit(EventPayload::MoveStart { from, to, duration });
        self.timers.schedule(TimerKey::Settle, self.now, duration);
        self.timers
            .schedule(TimerKey::BubbleFade, self.now, self.config.fade_duration);
        self.reload_first_step = go_to_first_step;
    }

    fn on_bubble_faded(&mut self) {
        if !core::mem::take(&mut self.reload_first_step) || self.steps.is_empty() {
            return;
        }
        let from = self.step;
        self.load_step(0, false);
        if from != 0 {
            self.step_changed(from);
        }
    }

    // --- Navigation ----------------------------------------------------------

    /// Move to step `index`. Out-of-range indices are ignored.
    ///
    /// Starts the movement (settling after `animation_duration`), replaces the messages
    /// and reschedules autoplay once the movement settles. Going to the current step reloads
    /// it without emitting `stepChange` or calling the step-change callback.
    pub fn go_to_step(&mut self, index: usize) {
        if self.destroyed {
            return;
        }
        if index >= self.steps.len() {
            warn!(tour = self.id.0, index, steps = self.steps.len(), "step index out of range");
            return;
        }
        let from = self.step;
        self.timers.cancel(TimerKey::Autoplay);
        self.timers.cancel(TimerKey::BubbleFade);
        self.reload_first_step = false;
        self.mode = Mode::Steps;
        self.load_step(index, true);
        if self.visibility == Visibility::Visible {
            self.flags.insert(PointerFlags::BUBBLE_VISIBLE);
        }
        self.start_move();
        self.sync_tracking();
        if from != index {
            self.step_changed(from);
        }
    }

    /// Go to the next step, or complete the tour on the last one.
    pub fn next(&mut self) {
        self.advance(CompletionSource::Manual);
    }

    /// Go to the previous step. No-op on the first.
    pub fn prev(&mut self) {
        if self.destroyed || self.step == 0 || self.steps.is_empty() {
            return;
        }
        let from = self.step;
        self.go_to_step(from - 1);
        self.emit(EventPayload::Prev { from, to: from - 1 });
    }

    fn advance(&mut self, source: CompletionSource) {
        if self.destroyed || self.steps.is_empty() {
            return;
        }
        let from = self.step;
        if from + 1 < self.steps.len() {
            self.go_to_step(from + 1);
            self.emit(EventPayload::Next { from, to: from + 1 });
        } else {
            self.complete(source);
        }
    }

    fn complete(&mut self, source: CompletionSource) {
        let step = self.step;
        debug!(tour = self.id.0, step, source = source.name(), "complete");
        self.emit(EventPayload::Complete { step, source });
        if self.autoplay.stop() {
            self.timers.cancel(TimerKey::Autoplay);
            self.emit(EventPayload::AutoplayComplete);
        }
        let reset = self.config.reset_on_complete;
        if reset {
            self.reset(true);
        }
        if self.config.hide_on_complete {
            let mut delay = self.config.hide_delay();
            if reset {
                delay += self.config.animation_duration;
            }
            self.hide_source = Some(source);
            self.timers.schedule(TimerKey::AutoHide, self.now, delay);
        }
        if let Some(callback) = self.on_complete.as_mut()
            && catch_unwind(AssertUnwindSafe(|| callback())).is_err()
        {
            error!(tour = self.id.0, "completion callback panicked");
        }
    }

    fn on_auto_hide(&mut self) {
        let source = self.hide_source.take().unwrap_or(CompletionSource::Manual);
        self.emit(EventPayload::AutoHide { source });
        self.hide();
    }

    /// Point at an arbitrary target without moving the step cursor.
    ///
    /// `content` replaces the messages when given. `direction` pins the pointing direction;
    /// `None` infers it. Shows the pointer if hidden. An unresolved selector leaves the
    /// pointer where it is until a valid target is set.
    pub fn point_to(
        &mut self,
        target: Target<R::Element>,
        content: Option<StepContent>,
        direction: Option<Direction>,
    ) {
        if self.destroyed {
            return;
        }
        self.timers.cancel(TimerKey::Autoplay);
        self.timers.cancel(TimerKey::BubbleFade);
        self.reload_first_step = false;
        self.mode = Mode::PointTo;
        self.set_manual_direction(direction);
        self.target = self.resolve(&target);
        self.emit(EventPayload::PointTo {
            selector: target.as_selector().map(str::to_owned),
            resolved: self.target.is_some(),
        });
        if let Some(content) = content {
            self.replace_messages(content.into_vec(), false);
        }
        if matches!(self.visibility, Visibility::Hidden | Visibility::Hiding) {
            self.timers.cancel(TimerKey::Settle);
            self.show();
            return;
        }
        if self.visibility == Visibility::Visible {
            self.flags.insert(PointerFlags::BUBBLE_VISIBLE);
        }
        self.start_move();
        self.sync_tracking();
    }

    fn load_step(&mut self, index: usize, from_step_change: bool) {
        let Some(step) = self.steps.get(index) else {
            return;
        };
        let direction = step.direction;
        let target = step.target.clone();
        let messages = step.content.as_slice().to_vec();
        self.step = index;
        self.autoplay.reset_step();
        self.set_manual_direction(direction);
        self.target = self.resolve(&target);
        self.replace_messages(messages, from_step_change);
    }

    fn step_changed(&mut self, from: usize) {
        let to = self.step;
        self.emit(EventPayload::StepChange {
            from,
            to,
            total: self.steps.len(),
        });
        if let (Some(callback), Some(step)) = (self.on_step_change.as_mut(), self.steps.get(to))
            && catch_unwind(AssertUnwindSafe(|| callback(to, step))).is_err()
        {
            error!(tour = self.id.0, step = to, "step-change callback panicked");
        }
    }

    // --- Movement and tracking -----------------------------------------------

    fn start_move(&mut self) {
        let duration = self.config.animation_duration;
        if let Some(to) = self.target_point() {
            let from = self.position;
            self.position = to;
            self.flags.insert(PointerFlags::MOVING);
            self.sync_direction_flag();
            let movement = self.movement();
            self.present(Some(movement));
            self.emit(EventPayload::MoveStart { from, to, duration });
        }
        self.timers.schedule(TimerKey::Settle, self.now, duration);
    }

    fn on_settle(&mut self) {
        self.flags.remove(PointerFlags::MOVING);
        self.present(None);
        self.emit(EventPayload::MoveComplete {
            position: self.position,
        });
        if self.mode == Mode::Steps {
            self.schedule_autoplay();
        }
    }

    fn sync_tracking(&mut self) {
        let wanted = !self.destroyed
            && self.config.tracking
            && self.visibility == Visibility::Visible
            && self.mode != Mode::Parked;
        if wanted {
            if self.tracking.start() {
                self.tracker.clear_history();
                self.emit(EventPayload::TrackingStart {
                    fps: self.tracking.fps(),
                });
            }
        } else if self.tracking.stop() {
            self.emit(EventPayload::TrackingStop);
        }
    }

    fn track(&mut self) {
        let Some(bounds) = self
            .target
            .as_ref()
            .and_then(|t| self.resolver.bounds(t))
        else {
            return;
        };
        let from = self.tracker.direction();
        if let Some(to) = self.tracker.sample(bounds.y0, self.now) {
            self.emit(EventPayload::DirectionChange {
                from,
                to,
                manual: false,
            });
        }
        if self.flags.contains(PointerFlags::MOVING) {
            return;
        }
        let direction = self.tracker.direction();
        let position = self.geometry.place(bounds, direction, self.config.offset);
        let up = direction == Direction::Up;
        if position == self.position && self.flags.contains(PointerFlags::POINTING_UP) == up {
            return;
        }
        self.position = position;
        self.flags.set(PointerFlags::POINTING_UP, up);
        self.present(None);
        self.emit(EventPayload::Track {
            position,
            direction,
        });
    }

    fn refresh_position(&mut self) {
        if self.mode == Mode::Parked || self.flags.contains(PointerFlags::MOVING) {
            return;
        }
        if let Some(p) = self.target_point() {
            self.position = p;
            self.present(None);
        }
    }

    fn set_manual_direction(&mut self, manual: Option<Direction>) {
        let from = self.tracker.direction();
        if let Some(to) = self.tracker.set_manual(manual) {
            self.sync_direction_flag();
            self.emit(EventPayload::DirectionChange {
                from,
                to,
                manual: true,
            });
        }
    }

    fn sync_direction_flag(&mut self) {
        self.flags.set(
            PointerFlags::POINTING_UP,
            self.tracker.direction() == Direction::Up,
        );
    }

    fn resolve(&self, target: &Target<R::Element>) -> Option<R::Element> {
        match target {
            Target::Selector(selector) => {
                let found = self.resolver.resolve(selector);
                if found.is_none() {
                    warn!(tour = self.id.0, %selector, "target did not resolve");
                }
                found
            }
            Target::Element(element) => Some(element.clone()),
        }
    }

    fn target_point(&self) -> Option<Point> {
        let bounds = self.resolver.bounds(self.target.as_ref()?)?;
        Some(
            self.geometry
                .place(bounds, self.tracker.direction(), self.config.offset),
        )
    }

    fn initial_point(&self) -> Point {
        let viewport = self.resolver.viewport();
        let place = |element: Option<R::Element>| {
            element
                .and_then(|e| self.resolver.bounds(&e))
                .map(|b| {
                    self.geometry
                        .place(b, self.tracker.direction(), self.config.offset)
                })
        };
        match &self.config.initial_position {
            InitialPosition::Preset(Anchor::Center) => viewport.center(),
            InitialPosition::Preset(Anchor::TopLeft) => Point::new(viewport.x0, viewport.y0),
            InitialPosition::Preset(Anchor::TopRight) => Point::new(viewport.x1, viewport.y0),
            InitialPosition::Preset(Anchor::BottomLeft) => Point::new(viewport.x0, viewport.y1),
            InitialPosition::Preset(Anchor::BottomRight) => Point::new(viewport.x1, viewport.y1),
            InitialPosition::Preset(Anchor::FirstStep) => {
                let first = self.steps.first().and_then(|s| match &s.target {
                    Target::Selector(sel) => self.resolver.resolve(sel),
                    Target::Element(e) => Some(e.clone()),
                });
                place(first)
                    .or_else(|| self.target_point())
                    .unwrap_or_else(|| viewport.center())
            }
            InitialPosition::At(point) => *point,
            InitialPosition::Element(selector) => {
                place(self.resolver.resolve(selector)).unwrap_or_else(|| viewport.center())
            }
        }
    }

    fn fade(&self) -> Transition {
        Transition {
            duration: self.config.fade_duration,
            easing: self.config.easing.clone(),
        }
    }

    fn movement(&self) -> Transition {
        Transition {
            duration: self.config.animation_duration,
            easing: self.config.easing.clone(),
        }
    }

    fn present(&mut self, transition: Option<Transition>) {
        if self.destroyed {
            return;
        }
        self.renderer.present(&PointerFrame {
            position: self.position,
            flags: self.flags,
            transition,
        });
    }

    // --- Messages ------------------------------------------------------------

    /// Replace the messages. Does not start cycling; a cycle that was running is left paused.
    pub fn set_messages(&mut self, content: impl Into<StepContent>) {
        if self.destroyed {
            return;
        }
        self.replace_messages(content.into().into_vec(), false);
    }

    /// Replace the messages with a single one.
    pub fn set_message(&mut self, content: impl Into<Content>) {
        if self.destroyed {
            return;
        }
        self.replace_messages(vec![content.into()], false);
    }

    /// Show the next message, wrapping around. Restarts the cycle interval when cycling.
    pub fn next_message(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some((from, to)) = self.cursor.next() else {
            return false;
        };
        self.message_changed(from, to, false);
        self.arm_cycle();
        true
    }

    /// Show the previous message, wrapping around. Restarts the cycle interval when cycling.
    pub fn prev_message(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some((from, to)) = self.cursor.prev() else {
            return false;
        };
        self.message_changed(from, to, false);
        self.arm_cycle();
        true
    }

    /// Show message `index`. Out-of-range indices are ignored.
    pub fn go_to_message(&mut self, index: usize) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(from) = self.cursor.go_to(index) else {
            return false;
        };
        self.message_changed(from, index, false);
        self.arm_cycle();
        true
    }

    /// Start cycling, optionally changing the interval first.
    pub fn start_message_cycle(&mut self, interval: Option<Millis>) -> bool {
        if self.destroyed {
            return false;
        }
        if let Some(interval) = interval {
            self.set_message_interval(interval);
        }
        if self.cursor.cycle() == CycleState::Running {
            return false;
        }
        self.begin_cycle()
    }

    /// Stop cycling.
    pub fn stop_message_cycle(&mut self) -> bool {
        if self.destroyed || !self.cursor.stop() {
            return false;
        }
        self.timers.cancel(TimerKey::MessageCycle);
        self.emit(EventPayload::MessageCycleStop);
        self.replan_autoplay();
        true
    }

    /// Pause cycling until [`resume_message_cycle`](Self::resume_message_cycle).
    pub fn pause_message_cycle(&mut self) -> bool {
        if self.destroyed || !self.cursor.pause(PauseCause::User) {
            return false;
        }
        self.timers.cancel(TimerKey::MessageCycle);
        self.emit(EventPayload::MessageCyclePause);
        true
    }

    /// Resume a paused cycle with a full interval.
    pub fn resume_message_cycle(&mut self) -> bool {
        if self.destroyed || self.cursor.resume().is_none() {
            return false;
        }
        self.emit(EventPayload::MessageCycleResume);
        self.arm_cycle();
        true
    }

    fn replace_messages(&mut self, messages: Vec<Content>, from_step_change: bool) {
        self.timers.cancel(TimerKey::MessageCycle);
        let was_cycling = matches!(
            self.cursor.cycle(),
            CycleState::Running | CycleState::Paused(PauseCause::Hidden)
        );
        self.cursor = MessageCursor::new(messages);
        let count = self.cursor.len();
        self.emit(EventPayload::MessagesSet {
            count,
            from_step_change,
        });
        self.show_current_message();
        if from_step_change && self.config.message_interval > 0 && count > 1 {
            self.begin_cycle();
        } else if was_cycling && count > 1 {
            self.cursor.mark_paused(PauseCause::User);
        }
        if !from_step_change {
            self.replan_autoplay();
        }
    }

    fn show_current_message(&mut self) {
        let Some(content) = self.cursor.current().cloned() else {
            return;
        };
        self.renderer.render(&content);
        self.emit(EventPayload::ContentChange {
            content,
            index: self.cursor.index(),
            total: self.cursor.len(),
        });
    }

    fn message_changed(&mut self, from: usize, to: usize, auto: bool) {
        self.emit(EventPayload::MessageChange {
            from,
            to,
            total: self.cursor.len(),
            auto,
        });
        self.show_current_message();
    }

    fn begin_cycle(&mut self) -> bool {
        let interval = self.config.message_interval;
        if interval == 0 || !self.cursor.start() {
            return false;
        }
        self.emit(EventPayload::MessageCycleStart { interval });
        self.arm_cycle();
        true
    }

    /// (Re)arm the cycle timer with a full interval. Cycle timers only run while visible.
    fn arm_cycle(&mut self) {
        let interval = self.config.message_interval;
        if self.cursor.cycle() == CycleState::Running
            && self.visibility == Visibility::Visible
            && interval > 0
        {
            self.timers
                .schedule_every(TimerKey::MessageCycle, self.now, interval);
        }
    }

    fn on_cycle_tick(&mut self) {
        if self.cursor.cycle() != CycleState::Running || self.visibility != Visibility::Visible {
            self.timers.cancel(TimerKey::MessageCycle);
            return;
        }
        if self.waiting_for_messages() && self.cursor.is_last() {
            self.complete_messages();
            return;
        }
        if let Some((from, to)) = self.cursor.next() {
            self.message_changed(from, to, true);
        }
        if self.waiting_for_messages() && self.cursor.is_last() {
            self.complete_messages();
        }
    }

    fn waiting_for_messages(&self) -> bool {
        self.mode == Mode::Steps
            && self.autoplay.is_running()
            && autoplay::waits_for_messages(self.cursor.len(), &self.config)
    }

    fn complete_messages(&mut self) {
        self.timers.cancel(TimerKey::MessageCycle);
        self.cursor.stop();
        self.autoplay.mark_messages_complete();
        self.emit(EventPayload::MessageCycleComplete { step: self.step });
        self.schedule_autoplay();
    }

    // --- Autoplay ------------------------------------------------------------

    /// Enable autoplay.
    pub fn start_autoplay(&mut self) -> bool {
        if self.destroyed || !self.autoplay.start() {
            return false;
        }
        self.emit(EventPayload::AutoplayStart);
        self.schedule_autoplay();
        true
    }

    /// Disable autoplay.
    pub fn stop_autoplay(&mut self) -> bool {
        if self.destroyed || !self.autoplay.stop() {
            return false;
        }
        self.timers.cancel(TimerKey::Autoplay);
        self.emit(EventPayload::AutoplayStop);
        true
    }

    /// Hold autoplay until [`resume_autoplay`](Self::resume_autoplay).
    pub fn pause_autoplay(&mut self) -> bool {
        if self.destroyed || !self.autoplay.pause(PauseCause::User) {
            return false;
        }
        self.timers.cancel(TimerKey::Autoplay);
        self.emit(EventPayload::AutoplayPause);
        true
    }

    /// Resume autoplay with a full, fresh delay.
    pub fn resume_autoplay(&mut self) -> bool {
        if self.destroyed || self.autoplay.resume().is_none() {
            return false;
        }
        self.emit(EventPayload::AutoplayResume);
        self.schedule_autoplay();
        true
    }

    fn schedule_autoplay(&mut self) {
        self.timers.cancel(TimerKey::Autoplay);
        if self.mode != Mode::Steps || self.steps.is_empty() {
            return;
        }
        let duration = self.steps.get(self.step).and_then(|s| s.duration);
        let plan = self.autoplay.plan(
            self.visibility == Visibility::Visible,
            self.cursor.cycle() != CycleState::Stopped,
            self.cursor.len(),
            duration,
            &self.config,
        );
        if let AutoplayPlan::After(delay) = plan {
            trace!(tour = self.id.0, step = self.step, delay, "autoplay scheduled");
            self.timers.schedule(TimerKey::Autoplay, self.now, delay);
        }
    }

    /// Plan again when autoplay may be waiting on a cycle that can no longer complete.
    fn replan_autoplay(&mut self) {
        if self.mode == Mode::Steps
            && !self.timers.is_pending(TimerKey::Settle)
            && !self.timers.is_pending(TimerKey::Autoplay)
        {
            self.schedule_autoplay();
        }
    }

    fn on_autoplay_due(&mut self) {
        if !self.autoplay.is_running()
            || self.visibility != Visibility::Visible
            || self.mode != Mode::Steps
        {
            return;
        }
        let from = self.step;
        let to = (from + 1 < self.steps.len()).then_some(from + 1);
        self.emit(EventPayload::AutoplayNext { from, to });
        self.advance(CompletionSource::Autoplay);
    }

    // --- Events --------------------------------------------------------------

    fn emit(&mut self, payload: EventPayload) {
        if self.destroyed {
            return;
        }
        let event = TourEvent {
            source: self.id,
            at: self.now,
            payload,
        };
        trace!(tour = self.id.0, event = event.name(), "emit");
        self.bus.emit(&event);
    }

    // --- Accessors -----------------------------------------------------------

    /// Instance identity, carried by every event.
    pub fn id(&self) -> TourId {
        self.id
    }

    /// Engine clock.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Current settings.
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// The steps.
    pub fn steps(&self) -> &[Step<R::Element>] {
        &self.steps
    }

    /// Current step index.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Current message index.
    pub fn current_message(&self) -> usize {
        self.cursor.index()
    }

    /// Current messages.
    pub fn messages(&self) -> &[Content] {
        self.cursor.messages()
    }

    /// Visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// What the pointer follows.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current pointee.
    pub fn target(&self) -> Option<&R::Element> {
        self.target.as_ref()
    }

    /// Effective pointing direction.
    pub fn direction(&self) -> Direction {
        self.tracker.direction()
    }

    /// True after [`destroy`](Self::destroy).
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The resolver, for hosts that mutate the scene they describe.
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// The renderer.
    pub fn renderer(&self) -> &D {
        &self.renderer
    }

    /// Read-only view of the whole state.
    pub fn snapshot(&self) -> Snapshot<R::Element> {
        Snapshot {
            now: self.now,
            visibility: self.visibility,
            mode: self.mode,
            step: self.step,
            step_count: self.steps.len(),
            message: self.cursor.index(),
            message_count: self.cursor.len(),
            cycle: self.cursor.cycle(),
            autoplay: self.autoplay.mode(),
            direction: self.tracker.direction(),
            manual_direction: self.tracker.manual(),
            position: self.position,
            flags: self.flags,
            has_intro_played: self.has_intro_played,
            tracking: self.tracking.is_running(),
            target: self.target.clone(),
            destroyed: self.destroyed,
        }
    }
}
