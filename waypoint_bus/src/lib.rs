// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoint Bus: typed, synchronous publish/subscribe.
//!
//! ## Overview
//!
//! An [`EventBus`] delivers events of one type `E` to handlers subscribed on a [`Topic`]:
//! a single event kind, a group of kinds, or every event.
//! The event type describes itself through [`Routable`], which yields its kind and
//! (optionally) the group that contains it. The bus never inspects names or strings.
//!
//! ## Dispatch order
//!
//! [`EventBus::emit`] runs synchronously and delivers in a fixed order:
//!
//! 1) handlers subscribed to the exact kind,
//! 2) handlers subscribed to the event's group,
//! 3) wildcard handlers.
//!
//! Within each tier handlers run in subscription order.
//!
//! ## Fault isolation
//!
//! A handler that panics does not stop delivery to the handlers after it and does not
//! unwind into the emitter. The panic is reported through `tracing` at `error` level
//! and counted in the returned [`Delivery`].
//!
//! ## Re-entrancy
//!
//! Handlers receive `&E` only. Emitting requires `&mut EventBus`, so a handler cannot
//! emit while the bus is dispatching.
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use waypoint_bus::{EventBus, Routable, Topic};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
//! enum Kind { Opened, Closed }
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
//! enum Group { Lifecycle }
//!
//! struct Ev(Kind);
//!
//! impl Routable for Ev {
//!     type Kind = Kind;
//!     type Group = Group;
//!     fn kind(&self) -> Kind { self.0 }
//!     fn group(&self) -> Option<Group> { Some(Group::Lifecycle) }
//! }
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut bus: EventBus<Ev> = EventBus::new();
//!
//! let l = log.clone();
//! bus.on(Topic::Any, move |e: &Ev| l.borrow_mut().push(("any", e.0)));
//! let l = log.clone();
//! bus.on(Topic::Group(Group::Lifecycle), move |e: &Ev| l.borrow_mut().push(("group", e.0)));
//! let l = log.clone();
//! bus.on(Topic::Event(Kind::Opened), move |e: &Ev| l.borrow_mut().push(("exact", e.0)));
//!
//! bus.emit(&Ev(Kind::Opened));
//! bus.emit(&Ev(Kind::Closed));
//! assert_eq!(
//!     *log.borrow(),
//!     vec![
//!         ("exact", Kind::Opened),
//!         ("group", Kind::Opened),
//!         ("any", Kind::Opened),
//!         ("group", Kind::Closed),
//!         ("any", Kind::Closed),
//!     ]
//! );
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// An event that can be routed by an [`EventBus`].
pub trait Routable {
    /// Discriminant used for exact subscriptions.
    type Kind: Copy + Eq + Hash + Debug;
    /// Group used for group subscriptions.
    type Group: Copy + Eq + Hash + Debug;

    /// The kind of this event.
    fn kind(&self) -> Self::Kind;

    /// The group containing this event, if any.
    fn group(&self) -> Option<Self::Group>;
}

/// What a subscription listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Topic<K, G> {
    /// A single event kind.
    Event(K),
    /// Every event whose [`Routable::group`] is this group.
    Group(G),
    /// Every event.
    Any,
}

/// Handle returned by [`EventBus::on`], used to unsubscribe a single handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Outcome of a single [`EventBus::emit`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Handlers that returned normally.
    pub delivered: usize,
    /// Handlers that panicked.
    pub failed: usize,
}

type Handler<E> = Box<dyn FnMut(&E)>;

struct Subscriber<E> {
    id: SubscriptionId,
    handler: Handler<E>,
}

/// Synchronous event bus over a [`Routable`] event type.
pub struct EventBus<E: Routable> {
    exact: HashMap<E::Kind, Vec<Subscriber<E>>>,
    groups: HashMap<E::Group, Vec<Subscriber<E>>>,
    any: Vec<Subscriber<E>>,
    next_id: u64,
}

impl<E: Routable> Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("exact", &self.exact.values().map(Vec::len).sum::<usize>())
            .field("groups", &self.groups.values().map(Vec::len).sum::<usize>())
            .field("any", &self.any.len())
            .finish_non_exhaustive()
    }
}

impl<E: Routable> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Routable> EventBus<E> {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            groups: HashMap::new(),
            any: Vec::new(),
            next_id: 0,
        }
    }

    /// Subscribe `handler` to `topic`.
    pub fn on(
        &mut self,
        topic: Topic<E::Kind, E::Group>,
        handler: impl FnMut(&E) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let sub = Subscriber {
            id,
            handler: Box::new(handler),
        };
        match topic {
            Topic::Event(kind) => self.exact.entry(kind).or_default().push(sub),
            Topic::Group(group) => self.groups.entry(group).or_default().push(sub),
            Topic::Any => self.any.push(sub),
        }
        id
    }

    /// Unsubscribe from `topic`: the handler `id` if given, otherwise every handler on it.
    ///
    /// Returns the number of handlers removed.
    pub fn off(&mut self, topic: Topic<E::Kind, E::Group>, id: Option<SubscriptionId>) -> usize {
        let list = match topic {
            Topic::Event(kind) => self.exact.get_mut(&kind),
            Topic::Group(group) => self.groups.get_mut(&group),
            Topic::Any => Some(&mut self.any),
        };
        let Some(list) = list else {
            return 0;
        };
        let before = list.len();
        match id {
            Some(id) => list.retain(|s| s.id != id),
            None => list.clear(),
        }
        before - list.len()
    }

    /// Unsubscribe the handler `id` from whichever topic it is on.
    pub fn off_id(&mut self, id: SubscriptionId) -> bool {
        let lists = self
            .exact
            .values_mut()
            .chain(self.groups.values_mut())
            .chain(core::iter::once(&mut self.any));
        for list in lists {
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Remove every subscriber.
    pub fn clear(&mut self) {
        self.exact.clear();
        self.groups.clear();
        self.any.clear();
    }

    /// Number of handlers subscribed directly to `topic`.
    pub fn subscriber_count(&self, topic: Topic<E::Kind, E::Group>) -> usize {
        match topic {
            Topic::Event(kind) => self.exact.get(&kind).map_or(0, Vec::len),
            Topic::Group(group) => self.groups.get(&group).map_or(0, Vec::len),
            Topic::Any => self.any.len(),
        }
    }

    /// True if no handler is subscribed anywhere.
    pub fn is_empty(&self) -> bool {
        self.any.is_empty()
            && self.exact.values().all(Vec::is_empty)
            && self.groups.values().all(Vec::is_empty)
    }

    /// Deliver `event`: exact subscribers, then group subscribers, then wildcard subscribers.
    pub fn emit(&mut self, event: &E) -> Delivery {
        let mut delivery = Delivery::default();
        if let Some(subs) = self.exact.get_mut(&event.kind()) {
            deliver(subs, event, &mut delivery);
        }
        if let Some(group) = event.group()
            && let Some(subs) = self.groups.get_mut(&group)
        {
            deliver(subs, event, &mut delivery);
        }
        deliver(&mut self.any, event, &mut delivery);
        delivery
    }
}

fn deliver<E: Routable>(subs: &mut [Subscriber<E>], event: &E, delivery: &mut Delivery) {
    for sub in subs {
        let handler = &mut sub.handler;
        match catch_unwind(AssertUnwindSafe(|| handler(event))) {
            Ok(()) => delivery.delivered += 1,
            Err(payload) => {
                delivery.failed += 1;
                tracing::error!(
                    kind = ?event.kind(),
                    subscription = sub.id.0,
                    "event handler panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    enum Kind {
        Show,
        Hide,
        Tick,
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    enum Group {
        Lifecycle,
    }

    #[derive(Debug)]
    struct Ev(Kind);

    impl Routable for Ev {
        type Kind = Kind;
        type Group = Group;
        fn kind(&self) -> Kind {
            self.0
        }
        fn group(&self) -> Option<Group> {
            match self.0 {
                Kind::Show | Kind::Hide => Some(Group::Lifecycle),
                Kind::Tick => None,
            }
        }
    }

    type Log = Rc<RefCell<Vec<(&'static str, Kind)>>>;

    fn recorder(log: &Log, tag: &'static str) -> impl FnMut(&Ev) + 'static {
        let log = log.clone();
        move |e: &Ev| log.borrow_mut().push((tag, e.0))
    }

    #[test]
    fn exact_then_group_then_any() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        bus.on(Topic::Any, recorder(&log, "any"));
        bus.on(Topic::Group(Group::Lifecycle), recorder(&log, "group"));
        bus.on(Topic::Event(Kind::Show), recorder(&log, "exact"));
        let d = bus.emit(&Ev(Kind::Show));
        assert_eq!(d, Delivery { delivered: 3, failed: 0 });
        assert_eq!(
            *log.borrow(),
            vec![
                ("exact", Kind::Show),
                ("group", Kind::Show),
                ("any", Kind::Show)
            ]
        );
    }

    // Ungrouped events skip the group tier.
    #[test]
    fn ungrouped_event_reaches_exact_and_any_only() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        bus.on(Topic::Group(Group::Lifecycle), recorder(&log, "group"));
        bus.on(Topic::Event(Kind::Tick), recorder(&log, "exact"));
        bus.on(Topic::Any, recorder(&log, "any"));
        bus.emit(&Ev(Kind::Tick));
        assert_eq!(
            *log.borrow(),
            vec![("exact", Kind::Tick), ("any", Kind::Tick)]
        );
    }

    #[test]
    fn handlers_in_a_tier_run_in_subscription_order() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        bus.on(Topic::Event(Kind::Hide), recorder(&log, "first"));
        bus.on(Topic::Event(Kind::Hide), recorder(&log, "second"));
        bus.emit(&Ev(Kind::Hide));
        assert_eq!(
            *log.borrow(),
            vec![("first", Kind::Hide), ("second", Kind::Hide)]
        );
    }

    #[test]
    fn off_removes_one_or_all() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        let a = bus.on(Topic::Event(Kind::Show), recorder(&log, "a"));
        bus.on(Topic::Event(Kind::Show), recorder(&log, "b"));
        bus.on(Topic::Event(Kind::Show), recorder(&log, "c"));
        assert_eq!(bus.off(Topic::Event(Kind::Show), Some(a)), 1);
        bus.emit(&Ev(Kind::Show));
        assert_eq!(
            *log.borrow(),
            vec![("b", Kind::Show), ("c", Kind::Show)]
        );
        assert_eq!(bus.off(Topic::Event(Kind::Show), None), 2);
        assert_eq!(bus.subscriber_count(Topic::Event(Kind::Show)), 0);
        assert_eq!(bus.off(Topic::Event(Kind::Hide), None), 0);
    }

    #[test]
    fn off_id_finds_any_topic() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        let g = bus.on(Topic::Group(Group::Lifecycle), recorder(&log, "group"));
        let w = bus.on(Topic::Any, recorder(&log, "any"));
        assert!(bus.off_id(g));
        assert!(!bus.off_id(g));
        assert!(bus.off_id(w));
        assert!(bus.is_empty());
        bus.emit(&Ev(Kind::Show));
        assert!(log.borrow().is_empty());
    }

    // A panicking handler must not block its siblings or unwind into the emitter.
    #[test]
    fn panicking_handler_is_isolated() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        bus.on(Topic::Event(Kind::Show), |_: &Ev| panic!("observer bug"));
        bus.on(Topic::Event(Kind::Show), recorder(&log, "after"));
        bus.on(Topic::Any, recorder(&log, "any"));
        let d = bus.emit(&Ev(Kind::Show));
        assert_eq!(d, Delivery { delivered: 2, failed: 1 });
        assert_eq!(
            *log.borrow(),
            vec![("after", Kind::Show), ("any", Kind::Show)]
        );
        // The failing handler stays subscribed and keeps being isolated.
        let d = bus.emit(&Ev(Kind::Show));
        assert_eq!(d.failed, 1);
    }

    #[test]
    fn clear_drops_everything() {
        let log = Log::default();
        let mut bus: EventBus<Ev> = EventBus::new();
        bus.on(Topic::Event(Kind::Show), recorder(&log, "exact"));
        bus.on(Topic::Group(Group::Lifecycle), recorder(&log, "group"));
        bus.on(Topic::Any, recorder(&log, "any"));
        bus.clear();
        assert!(bus.is_empty());
        assert_eq!(bus.emit(&Ev(Kind::Show)), Delivery::default());
    }

    #[test]
    fn panic_message_handles_payload_types() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(s.as_ref()), "non-string panic payload");
    }
}
