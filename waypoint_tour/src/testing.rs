// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording fake host for engine tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Rect;

use crate::{
    Content, PointerFrame, Renderer, Resolver, Step, Tour, TourConfig, TourEvent, TourOptions,
    TourTopic,
};

/// Elements are their selectors.
#[derive(Clone, Debug)]
pub(crate) struct Page {
    rects: HashMap<String, Rect>,
    viewport: Rect,
}

impl Page {
    pub(crate) fn new() -> Self {
        Self {
            rects: HashMap::new(),
            viewport: Rect::new(0.0, 0.0, 1000.0, 800.0),
        }
    }

    pub(crate) fn with(mut self, selector: &str, rect: Rect) -> Self {
        self.rects.insert(selector.to_owned(), rect);
        self
    }

    pub(crate) fn move_to(&mut self, selector: &str, rect: Rect) {
        self.rects.insert(selector.to_owned(), rect);
    }
}

impl Resolver for Page {
    type Element = String;

    fn resolve(&self, selector: &str) -> Option<String> {
        self.rects
            .contains_key(selector)
            .then(|| selector.to_owned())
    }

    fn bounds(&self, element: &String) -> Option<Rect> {
        self.rects.get(element).copied()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) rendered: Vec<Content>,
    pub(crate) frames: Vec<PointerFrame>,
    pub(crate) detached: bool,
}

impl Renderer for Recorder {
    fn render(&mut self, content: &Content) {
        self.rendered.push(content.clone());
    }

    fn present(&mut self, frame: &PointerFrame) {
        self.frames.push(frame.clone());
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

pub(crate) type TestTour = Tour<Page, Recorder>;
pub(crate) type Events = Rc<RefCell<Vec<TourEvent>>>;

/// Three targets stacked down the page.
pub(crate) fn page() -> Page {
    Page::new()
        .with("#a", Rect::new(100.0, 100.0, 200.0, 140.0))
        .with("#b", Rect::new(300.0, 300.0, 400.0, 340.0))
        .with("#c", Rect::new(500.0, 500.0, 600.0, 540.0))
}

/// One single-message step per target.
pub(crate) fn steps() -> Vec<Step<String>> {
    vec![
        Step::at("#a", "first"),
        Step::at("#b", "second"),
        Step::at("#c", "third"),
    ]
}

/// `count` text messages named `m0`, `m1`, …
pub(crate) fn messages(count: usize) -> Vec<Content> {
    (0..count).map(|i| Content::text(format!("m{i}"))).collect()
}

pub(crate) fn build(config: TourConfig, steps: Vec<Step<String>>) -> TestTour {
    Tour::new(TourOptions::new(config).steps(steps), page(), Recorder::default())
}

/// Subscribe a wildcard recorder.
pub(crate) fn record(tour: &mut TestTour) -> Events {
    let events = Events::default();
    let sink = events.clone();
    tour.on(TourTopic::Any, move |e| sink.borrow_mut().push(e.clone()));
    events
}

pub(crate) fn names(events: &Events) -> Vec<&'static str> {
    events.borrow().iter().map(TourEvent::name).collect()
}

pub(crate) fn count(events: &Events, name: &str) -> usize {
    events.borrow().iter().filter(|e| e.name() == name).count()
}

/// Time at which the intro of a default-timed tour shown at 0 has finished.
pub(crate) fn intro_end(config: &TourConfig) -> u64 {
    config.fade_duration + config.animation_duration
}

/// Build, subscribe, show at 0 and run the intro to completion.
pub(crate) fn shown(config: TourConfig, steps: Vec<Step<String>>) -> (TestTour, Events) {
    let end = intro_end(&config);
    let mut tour = build(config, steps);
    let events = record(&mut tour);
    tour.show();
    tour.tick(end);
    (tour, events)
}
