// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubble content, step targets and steps.
//!
//! Content is a tagged union decided by the caller: the [`Renderer`](crate::Renderer)
//! receives a [`Content`] and never has to probe what kind of value it was handed.

use waypoint_timers::Millis;

use crate::config::Direction;

/// Handle to host-owned content (for example a component mounted by a UI framework).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalId(pub u64);

/// One message shown in the bubble.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "value", rename_all = "camelCase")
)]
pub enum Content {
    /// Plain text, rendered verbatim.
    Text(String),
    /// Markup the renderer may inject as-is.
    Html(String),
    /// Host-owned content, looked up by the renderer.
    External(ExternalId),
}

impl Content {
    /// Plain text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Markup content.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html(markup.into())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Content of a step: one message or an ordered list of messages.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum StepContent {
    /// A single message.
    Single(Content),
    /// Messages cycled in order.
    List(Vec<Content>),
}

impl StepContent {
    /// The messages as a slice (a single message is a slice of one).
    pub fn as_slice(&self) -> &[Content] {
        match self {
            Self::Single(c) => core::slice::from_ref(c),
            Self::List(list) => list,
        }
    }

    /// The messages as an owned list.
    pub fn into_vec(self) -> Vec<Content> {
        match self {
            Self::Single(c) => vec![c],
            Self::List(list) => list,
        }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<Content> for StepContent {
    fn from(content: Content) -> Self {
        Self::Single(content)
    }
}

impl From<Vec<Content>> for StepContent {
    fn from(list: Vec<Content>) -> Self {
        Self::List(list)
    }
}

impl From<&str> for StepContent {
    fn from(text: &str) -> Self {
        Self::Single(text.into())
    }
}

/// What the pointer points at: a selector for the [`Resolver`](crate::Resolver),
/// or an element the caller already holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target<E> {
    /// Resolved through [`Resolver::resolve`](crate::Resolver::resolve) when needed.
    Selector(String),
    /// Used as-is.
    Element(E),
}

impl<E> Target<E> {
    /// A selector target.
    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }

    /// The selector, if this target is one.
    pub fn as_selector(&self) -> Option<&str> {
        match self {
            Self::Selector(s) => Some(s),
            Self::Element(_) => None,
        }
    }
}

/// One stop of a tour.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<E> {
    /// Element the pointer moves to.
    pub target: Target<E>,
    /// Message(s) shown while on this step.
    pub content: StepContent,
    /// Fixed pointing direction; `None` infers it from target motion.
    pub direction: Option<Direction>,
    /// Autoplay delay for this step, overriding the global interval.
    pub duration: Option<Millis>,
}

impl<E> Step<E> {
    /// A step pointing at `target` with automatic direction and the global autoplay interval.
    pub fn new(target: Target<E>, content: impl Into<StepContent>) -> Self {
        Self {
            target,
            content: content.into(),
            direction: None,
            duration: None,
        }
    }

    /// Shorthand for a step targeting a selector.
    pub fn at(selector: impl Into<String>, content: impl Into<StepContent>) -> Self {
        Self::new(Target::Selector(selector.into()), content)
    }

    /// Pin the pointing direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Override the autoplay delay for this step.
    #[must_use]
    pub fn with_duration(mut self, duration: Millis) -> Self {
        self.duration = Some(duration);
        self
    }

    /// The step's messages.
    pub fn messages(&self) -> &[Content] {
        self.content.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_content_is_a_slice_of_one() {
        let c = StepContent::from("hello");
        assert_eq!(c.len(), 1);
        assert_eq!(c.as_slice(), &[Content::text("hello")]);
    }

    #[test]
    fn step_builder_sets_overrides() {
        let step: Step<()> = Step::at("#save", vec![Content::text("a"), Content::html("<b>b</b>")])
            .with_direction(Direction::Up)
            .with_duration(1_500);
        assert_eq!(step.target.as_selector(), Some("#save"));
        assert_eq!(step.messages().len(), 2);
        assert_eq!(step.direction, Some(Direction::Up));
        assert_eq!(step.duration, Some(1_500));
    }

    #[test]
    fn element_target_has_no_selector() {
        let t: Target<u32> = Target::Element(7);
        assert_eq!(t.as_selector(), None);
    }
}
