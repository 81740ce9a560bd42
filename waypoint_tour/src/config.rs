// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tour settings.
//!
//! ## Overview
//!
//! [`TourConfig`] holds every plain setting (durations, easing, tracking, initial position,
//! autoplay and completion policy). With the `serde` feature it can be loaded from data.
//! [`TourOptions`] adds what cannot be serialized: the steps, an initial target/content,
//! and the step-change and completion callbacks.
//!
//! Settings can be changed after construction through the `set_*` family on
//! [`Tour`](crate::Tour); each setter is a no-op when the value is unchanged.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use kurbo::{Point, Vec2};
use waypoint_timers::Millis;

use crate::content::{Step, StepContent, Target};
use crate::error::ParseError;
use crate::event::TourId;

/// Vertical pointing direction.
///
/// `Up` means the pointer sits below its target and points up at it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Pointer below the target, pointing up.
    Up,
    /// Pointer above the target, pointing down.
    #[default]
    Down,
}

impl Direction {
    /// The other direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Name used in settings strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(ParseError::UnknownDirection(other.to_owned())),
        }
    }
}

/// Timing curve used for movement and fades.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Easing {
    /// `linear`.
    Linear,
    /// `ease`.
    Ease,
    /// `ease-in`.
    EaseIn,
    /// `ease-out`.
    EaseOut,
    /// `ease-in-out`.
    #[default]
    EaseInOut,
    /// Fast start with a soft landing.
    Snappy,
    /// Standard material-style curve.
    Smooth,
    /// `cubic-bezier(x1, y1, x2, y2)` with `x1`, `x2` in `[0, 1]`.
    CubicBezier([f64; 4]),
    /// Any other timing-function string, passed through verbatim.
    Custom(String),
}

impl Easing {
    /// The timing-function string a renderer can hand to its animation system.
    pub fn timing_function(&self) -> Cow<'static, str> {
        match self {
            Self::Linear => Cow::Borrowed("linear"),
            Self::Ease => Cow::Borrowed("ease"),
            Self::EaseIn => Cow::Borrowed("ease-in"),
            Self::EaseOut => Cow::Borrowed("ease-out"),
            Self::EaseInOut => Cow::Borrowed("ease-in-out"),
            Self::Snappy => Cow::Borrowed("cubic-bezier(0.2, 0.9, 0.1, 1)"),
            Self::Smooth => Cow::Borrowed("cubic-bezier(0.4, 0, 0.2, 1)"),
            Self::CubicBezier([x1, y1, x2, y2]) => {
                Cow::Owned(format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"))
            }
            Self::Custom(raw) => Cow::Owned(raw.clone()),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snappy => f.write_str("snappy"),
            Self::Smooth => f.write_str("smooth"),
            other => f.write_str(&other.timing_function()),
        }
    }
}

impl FromStr for Easing {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let preset = match s {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            "snappy" => Some(Self::Snappy),
            "smooth" => Some(Self::Smooth),
            _ => None,
        };
        if let Some(preset) = preset {
            return Ok(preset);
        }
        if let Some(args) = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_bezier(args).ok_or_else(|| ParseError::MalformedCurve(s.to_owned()));
        }
        if s.contains('(') && s.ends_with(')') {
            return Ok(Self::Custom(s.to_owned()));
        }
        Err(ParseError::UnknownEasing(s.to_owned()))
    }
}

fn parse_bezier(args: &str) -> Option<Easing> {
    let mut parts = args.split(',').map(|p| p.trim().parse::<f64>());
    let mut curve = [0.0; 4];
    for slot in &mut curve {
        *slot = parts.next()?.ok()?;
    }
    if parts.next().is_some() || curve.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let unit = 0.0..=1.0;
    (unit.contains(&curve[0]) && unit.contains(&curve[2])).then_some(Easing::CubicBezier(curve))
}

impl TryFrom<String> for Easing {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

/// Named starting points for the intro animation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Anchor {
    /// Viewport center.
    #[default]
    Center,
    /// Viewport top-left corner.
    TopLeft,
    /// Viewport top-right corner.
    TopRight,
    /// Viewport bottom-left corner.
    BottomLeft,
    /// Viewport bottom-right corner.
    BottomRight,
    /// Start already placed at the first step, so the intro only fades in.
    FirstStep,
}

impl Anchor {
    /// Name used in settings strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::FirstStep => "first-step",
        }
    }
}

/// Where the pointer appears before its first movement, and where [`reset`](crate::Tour::reset) returns it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum InitialPosition {
    /// A named position.
    Preset(Anchor),
    /// An explicit point in viewport coordinates.
    At(Point),
    /// Next to the element matching a selector.
    Element(String),
}

impl Default for InitialPosition {
    fn default() -> Self {
        Self::Preset(Anchor::Center)
    }
}

impl FromStr for InitialPosition {
    type Err = ParseError;

    /// Parses a preset name (`center`, `top-left`, …, `first-step`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let anchor = match s.trim() {
            "center" => Anchor::Center,
            "top-left" => Anchor::TopLeft,
            "top-right" => Anchor::TopRight,
            "bottom-left" => Anchor::BottomLeft,
            "bottom-right" => Anchor::BottomRight,
            "first-step" => Anchor::FirstStep,
            other => return Err(ParseError::UnknownInitialPosition(other.to_owned())),
        };
        Ok(Self::Preset(anchor))
    }
}

/// Plain tour settings.
///
/// Every duration is in milliseconds. `tracking_fps == 0` means the tracking loop runs
/// on every host frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct TourConfig {
    /// Offset handed to the [`Geometry`](crate::Geometry) when placing the pointer.
    pub offset: Vec2,
    /// Duration of a movement; also the settle delay after every move.
    pub animation_duration: Millis,
    /// Duration of fade-in/fade-out transitions.
    pub fade_duration: Millis,
    /// Interval between automatic message changes; `0` disables cycling.
    pub message_interval: Millis,
    /// Timing curve for movement and fades.
    pub easing: Easing,
    /// Follow the target every frame while visible.
    pub tracking: bool,
    /// Cap on tracking updates per second; `0` is uncapped.
    pub tracking_fps: u32,
    /// Starting point of the intro and destination of a reset.
    pub initial_position: InitialPosition,
    /// Start with autoplay enabled.
    pub autoplay: bool,
    /// Delay before autoplay advances, unless a step overrides it.
    pub autoplay_interval: Millis,
    /// On multi-message steps, advance only after every message has been shown.
    pub autoplay_wait_for_messages: bool,
    /// Reset to the initial position when the last step completes.
    pub reset_on_complete: bool,
    /// Hide when the last step completes.
    pub hide_on_complete: bool,
    /// Delay before hiding on completion; defaults to `animation_duration`.
    pub hide_on_complete_delay: Option<Millis>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            offset: Vec2::new(0.0, 12.0),
            animation_duration: 600,
            fade_duration: 300,
            message_interval: 0,
            easing: Easing::default(),
            tracking: true,
            tracking_fps: 0,
            initial_position: InitialPosition::default(),
            autoplay: false,
            autoplay_interval: 3_000,
            autoplay_wait_for_messages: true,
            reset_on_complete: false,
            hide_on_complete: false,
            hide_on_complete_delay: None,
        }
    }
}

impl TourConfig {
    /// Effective delay before hiding on completion.
    pub fn hide_delay(&self) -> Millis {
        self.hide_on_complete_delay
            .unwrap_or(self.animation_duration)
    }
}

/// Called with the new index and step after every step change.
pub type StepChangeFn<E> = Box<dyn FnMut(usize, &Step<E>)>;

/// Called once the last step completes.
pub type CompleteFn = Box<dyn FnMut()>;

/// Everything a [`Tour`](crate::Tour) is built from.
pub struct TourOptions<E> {
    /// Plain settings.
    pub config: TourConfig,
    /// The tour's steps.
    pub steps: Vec<Step<E>>,
    /// Initial target; defaults to the first step's.
    pub target: Option<Target<E>>,
    /// Initial content; defaults to the first step's.
    pub content: Option<StepContent>,
    /// Step-change callback.
    pub on_step_change: Option<StepChangeFn<E>>,
    /// Completion callback.
    pub on_complete: Option<CompleteFn>,
    /// Instance identity carried by events; allocated by the tour when unset.
    pub id: Option<TourId>,
}

impl<E> Default for TourOptions<E> {
    fn default() -> Self {
        Self {
            config: TourConfig::default(),
            steps: Vec::new(),
            target: None,
            content: None,
            on_step_change: None,
            on_complete: None,
            id: None,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for TourOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourOptions")
            .field("config", &self.config)
            .field("steps", &self.steps)
            .field("target", &self.target)
            .field("content", &self.content)
            .field("on_step_change", &self.on_step_change.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("id", &self.id)
            .finish()
    }
}

impl<E> TourOptions<E> {
    /// Options with the given settings and nothing else.
    pub fn new(config: TourConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the steps.
    #[must_use]
    pub fn steps(mut self, steps: Vec<Step<E>>) -> Self {
        self.steps = steps;
        self
    }

    /// Set the initial target.
    #[must_use]
    pub fn target(mut self, target: Target<E>) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the initial content.
    #[must_use]
    pub fn content(mut self, content: impl Into<StepContent>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the step-change callback.
    #[must_use]
    pub fn on_step_change(mut self, f: impl FnMut(usize, &Step<E>) + 'static) -> Self {
        self.on_step_change = Some(Box::new(f));
        self
    }

    /// Set the completion callback.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Use a host-assigned identity instead of an allocated one.
    #[must_use]
    pub fn id(mut self, id: TourId) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_presets_parse() {
        assert_eq!("ease-out".parse::<Easing>(), Ok(Easing::EaseOut));
        assert_eq!(" linear ".parse::<Easing>(), Ok(Easing::Linear));
        assert_eq!("snappy".parse::<Easing>(), Ok(Easing::Snappy));
    }

    #[test]
    fn easing_bezier_is_validated() {
        assert_eq!(
            "cubic-bezier(0.1, 0.7, 1.0, 0.1)".parse::<Easing>(),
            Ok(Easing::CubicBezier([0.1, 0.7, 1.0, 0.1]))
        );
        // y control points may overshoot; x control points may not.
        assert!("cubic-bezier(0.3, -0.5, 0.7, 1.5)".parse::<Easing>().is_ok());
        assert!(matches!(
            "cubic-bezier(1.3, 0, 0.7, 1)".parse::<Easing>(),
            Err(ParseError::MalformedCurve(_))
        ));
        assert!(matches!(
            "cubic-bezier(0.3, 0, 0.7)".parse::<Easing>(),
            Err(ParseError::MalformedCurve(_))
        ));
    }

    #[test]
    fn easing_raw_functions_pass_through() {
        let e: Easing = "steps(4, end)".parse().unwrap();
        assert_eq!(e, Easing::Custom("steps(4, end)".into()));
        assert_eq!(e.timing_function(), "steps(4, end)");
        assert_eq!(
            "wobbly".parse::<Easing>(),
            Err(ParseError::UnknownEasing("wobbly".into()))
        );
    }

    // Display output must parse back to the same value.
    #[test]
    fn easing_display_round_trips() {
        for e in [
            Easing::Linear,
            Easing::EaseInOut,
            Easing::Snappy,
            Easing::Smooth,
            Easing::CubicBezier([0.25, 0.1, 0.25, 1.0]),
        ] {
            assert_eq!(e.to_string().parse::<Easing>(), Ok(e));
        }
    }

    #[test]
    fn initial_position_presets() {
        assert_eq!(
            "first-step".parse::<InitialPosition>(),
            Ok(InitialPosition::Preset(Anchor::FirstStep))
        );
        assert_eq!(
            "middle".parse::<InitialPosition>(),
            Err(ParseError::UnknownInitialPosition("middle".into()))
        );
    }

    #[test]
    fn direction_parse_and_flip() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert!("left".parse::<Direction>().is_err());
        assert_eq!(Direction::Up.flipped(), Direction::Down);
    }

    #[test]
    fn hide_delay_defaults_to_animation_duration() {
        let mut c = TourConfig::default();
        assert_eq!(c.hide_delay(), c.animation_duration);
        c.hide_on_complete_delay = Some(0);
        assert_eq!(c.hide_delay(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_loads_from_json() {
        let json = r#"{
            "animationDuration": 400,
            "messageInterval": 2000,
            "easing": "cubic-bezier(0.2, 0, 0, 1)",
            "initialPosition": { "preset": "top-left" },
            "autoplay": true
        }"#;
        let c: TourConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.animation_duration, 400);
        assert_eq!(c.message_interval, 2_000);
        assert_eq!(c.easing, Easing::CubicBezier([0.2, 0.0, 0.0, 1.0]));
        assert_eq!(c.initial_position, InitialPosition::Preset(Anchor::TopLeft));
        assert!(c.autoplay);
        // Unspecified fields keep their defaults.
        assert_eq!(c.fade_duration, TourConfig::default().fade_duration);
        assert!(serde_json::from_str::<TourConfig>(r#"{ "easing": "wobbly" }"#).is_err());
    }
}
