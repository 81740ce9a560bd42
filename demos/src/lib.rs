// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared host pieces for the demos: a fixed page, a printing renderer and a frame clock.

use std::collections::HashMap;

use kurbo::{Rect, Vec2};
use waypoint_tour::{Content, Geometry, PointerFrame, Renderer, Resolver, Tour};

/// A page of named boxes. Elements are their selectors.
#[derive(Clone, Debug, Default)]
pub struct Page {
    boxes: HashMap<String, Rect>,
}

impl Page {
    /// Add a box.
    pub fn with(mut self, selector: &str, rect: Rect) -> Self {
        self.boxes.insert(selector.to_owned(), rect);
        self
    }

    /// Move a box, as a scrolling page would.
    pub fn scroll_by(&mut self, dy: f64) {
        for rect in self.boxes.values_mut() {
            *rect = *rect + Vec2::new(0.0, dy);
        }
    }
}

impl Resolver for Page {
    type Element = String;

    fn resolve(&self, selector: &str) -> Option<String> {
        self.boxes
            .contains_key(selector)
            .then(|| selector.to_owned())
    }

    fn bounds(&self, element: &String) -> Option<Rect> {
        self.boxes.get(element).copied()
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, 1280.0, 720.0)
    }
}

/// Prints what a real renderer would paint.
#[derive(Debug, Default)]
pub struct Printer {
    /// Number of frames presented.
    pub frames: usize,
}

impl Renderer for Printer {
    fn render(&mut self, content: &Content) {
        match content {
            Content::Text(text) => println!("  bubble: {text}"),
            Content::Html(html) => println!("  bubble (html): {html}"),
            Content::External(id) => println!("  bubble (external): {id:?}"),
        }
    }

    fn present(&mut self, frame: &PointerFrame) {
        self.frames += 1;
        tracing::trace!(x = frame.position.x, y = frame.position.y, flags = ?frame.flags, "frame");
    }
}

/// The demo page: a toolbar along the top and a form below it.
pub fn page() -> Page {
    Page::default()
        .with("#open", Rect::new(20.0, 10.0, 100.0, 40.0))
        .with("#save", Rect::new(120.0, 10.0, 200.0, 40.0))
        .with("#name", Rect::new(300.0, 240.0, 700.0, 280.0))
        .with("#submit", Rect::new(300.0, 600.0, 420.0, 640.0))
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Drive the tour at 60 frames per second from `from` up to and including `until`.
pub fn run_frames<R: Resolver, D: Renderer, G: Geometry>(
    tour: &mut Tour<R, D, G>,
    from: u64,
    until: u64,
) {
    let mut now = from;
    while now <= until {
        tour.tick(now);
        now += 16;
    }
    tour.tick(until);
}
