// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits: how the engine sees and paints the host.
//!
//! The engine never touches a document directly. A [`Resolver`] turns selectors into elements
//! and reports their bounds, a [`Renderer`] paints bubble content and the pointer, and a
//! [`Geometry`] decides where the pointer sits relative to a target.

use std::fmt::Debug;

use kurbo::{Point, Rect, Vec2};
use waypoint_timers::Millis;

use crate::config::{Direction, Easing};
use crate::content::Content;

/// Looks up elements and their geometry.
pub trait Resolver {
    /// Host element handle.
    type Element: Clone + PartialEq + Debug;

    /// Resolve a selector; `None` if nothing matches.
    fn resolve(&self, selector: &str) -> Option<Self::Element>;

    /// Current bounds of `element` in viewport coordinates; `None` once it is gone.
    fn bounds(&self, element: &Self::Element) -> Option<Rect>;

    /// The viewport, used for the initial-position presets.
    fn viewport(&self) -> Rect;
}

/// Paints the pointer and its bubble.
pub trait Renderer {
    /// Replace the bubble's content.
    fn render(&mut self, content: &Content);

    /// Apply the pointer's complete visual state.
    fn present(&mut self, frame: &PointerFrame);

    /// Remove everything the renderer created. Called once, on destroy.
    fn detach(&mut self) {}
}

/// Places the pointer next to a target.
pub trait Geometry {
    /// Pointer position for `target` when pointing in `direction`.
    fn place(&self, target: Rect, direction: Direction, offset: Vec2) -> Point;
}

/// Horizontally centered on the target, below it when pointing up and above it otherwise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CenterAnchor;

impl Geometry for CenterAnchor {
    fn place(&self, target: Rect, direction: Direction, offset: Vec2) -> Point {
        let x = target.center().x + offset.x;
        let y = match direction {
            Direction::Up => target.y1 + offset.y,
            Direction::Down => target.y0 - offset.y,
        };
        Point::new(x, y)
    }
}

bitflags::bitflags! {
    /// Visual state flags, the renderer's equivalent of CSS classes.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerFlags: u8 {
        /// The pointer is shown (or fading in).
        const VISIBLE = 1 << 0;
        /// A movement animation is in flight.
        const MOVING = 1 << 1;
        /// The pointer sits below its target and points up.
        const POINTING_UP = 1 << 2;
        /// The bubble is shown.
        const BUBBLE_VISIBLE = 1 << 3;
        /// The intro animation is playing.
        const INTRO = 1 << 4;
    }
}

/// How the renderer should animate into a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Animation length.
    pub duration: Millis,
    /// Timing curve.
    pub easing: Easing,
}

/// Complete visual state of the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerFrame {
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// Visual flags.
    pub flags: PointerFlags,
    /// Animate into this frame, or jump when `None`.
    pub transition: Option<Transition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_anchor_sides() {
        let r = Rect::new(100.0, 50.0, 200.0, 80.0);
        let off = Vec2::new(0.0, 12.0);
        assert_eq!(CenterAnchor.place(r, Direction::Up, off), Point::new(150.0, 92.0));
        assert_eq!(CenterAnchor.place(r, Direction::Down, off), Point::new(150.0, 38.0));
    }
}
