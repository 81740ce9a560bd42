// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoint Tour: a headless engine for guided-tour pointers.
//!
//! ## Overview
//!
//! A [`Tour`] drives an animated pointer with a message bubble. It moves between steps, cycles
//! through each step's messages, advances on its own when autoplay is on, and follows its
//! target while the target moves. It never touches a document: hosts plug in
//!
//! - a [`Resolver`] that finds elements and reports their bounds,
//! - a [`Renderer`] that paints bubble [`Content`] and [`PointerFrame`]s,
//! - optionally a [`Geometry`] that places the pointer (defaults to [`CenterAnchor`]).
//!
//! ## Time
//!
//! The engine owns no clock and spawns nothing. The host calls [`Tour::tick`] from its frame
//! callback with a monotonic millisecond timestamp. Due timers (movement settle, fades,
//! message cycle, autoplay, auto-hide) fire in deadline order inside that call, then one
//! tracking iteration runs. Every timer has a fixed key and rescheduling a key replaces
//! the pending timer, so a superseded continuation never fires.
//!
//! ## Events
//!
//! Every transition is emitted as a [`TourEvent`]. Subscribe to one [`EventKind`], to an
//! [`EventGroup`], or to everything with [`Tour::on`]. A panicking handler is logged and
//! skipped; it never breaks the engine or its sibling handlers.
//!
//! ## Building blocks
//!
//! The pieces the engine is made of are public for hosts that want them on their own:
//! [`DirectionTracker`], [`MessageCursor`], [`Autoplay`] and [`TrackingLoop`].
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use kurbo::Rect;
//! use waypoint_tour::{
//!     Content, EventKind, PointerFrame, Renderer, Resolver, Step, Tour, TourConfig, TourOptions,
//!     TourTopic, Visibility,
//! };
//!
//! struct Page;
//! impl Resolver for Page {
//!     type Element = &'static str;
//!     fn resolve(&self, selector: &str) -> Option<&'static str> {
//!         ["#open", "#save"].into_iter().find(|s| *s == selector)
//!     }
//!     fn bounds(&self, element: &&'static str) -> Option<Rect> {
//!         Some(match *element {
//!             "#open" => Rect::new(10.0, 10.0, 60.0, 30.0),
//!             _ => Rect::new(10.0, 200.0, 60.0, 220.0),
//!         })
//!     }
//!     fn viewport(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 800.0, 600.0)
//!     }
//! }
//!
//! struct Quiet;
//! impl Renderer for Quiet {
//!     fn render(&mut self, _: &Content) {}
//!     fn present(&mut self, _: &PointerFrame) {}
//! }
//!
//! let options = TourOptions::new(TourConfig::default()).steps(vec![
//!     Step::at("#open", "Open a file"),
//!     Step::at("#save", "Then save it"),
//! ]);
//! let mut tour = Tour::new(options, Page, Quiet);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = seen.clone();
//! tour.on(TourTopic::Event(EventKind::StepChange), move |e| log.borrow_mut().push(e.name()));
//!
//! tour.show();
//! tour.tick(1_000); // intro: fade in, then move to the first target
//! assert_eq!(tour.visibility(), Visibility::Visible);
//!
//! tour.next();
//! tour.tick(2_000);
//! assert_eq!(tour.current_step(), 1);
//! assert_eq!(tour.target(), Some(&"#save"));
//! assert_eq!(*seen.borrow(), ["stepChange"]);
//! ```

mod autoplay;
mod config;
mod content;
mod direction;
mod error;
mod event;
mod host;
mod messages;
mod state;
mod tour;
mod tracking;

#[cfg(test)]
mod testing;

pub use autoplay::{Autoplay, AutoplayMode, AutoplayPlan, MESSAGES_SETTLE};
pub use config::{
    Anchor, CompleteFn, Direction, Easing, InitialPosition, StepChangeFn, TourConfig, TourOptions,
};
pub use content::{Content, ExternalId, Step, StepContent, Target};
pub use direction::{DEBOUNCE, DirectionTracker, THRESHOLD, WINDOW};
pub use error::ParseError;
pub use event::{
    CompletionSource, ConfigField, ConfigValue, EventGroup, EventKind, EventPayload, TourEvent,
    TourId, TourTopic,
};
pub use host::{CenterAnchor, Geometry, PointerFlags, PointerFrame, Renderer, Resolver, Transition};
pub use messages::{CycleState, MessageCursor, PauseCause};
pub use state::{Mode, Snapshot, TimerKey, Visibility};
pub use tour::{RESTART_SETTLE, Tour};
pub use tracking::TrackingLoop;
pub use waypoint_bus::{Delivery, SubscriptionId};
pub use waypoint_timers::Millis;
