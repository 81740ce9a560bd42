// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised when parsing settings at the API boundary.
//!
//! Engine operations never fail: invalid input is ignored. Only the string
//! forms of settings ([`Easing`](crate::Easing), [`InitialPosition`](crate::InitialPosition),
//! [`Direction`](crate::Direction)) can be rejected.

use thiserror::Error;

/// A settings string that could not be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Bare identifier that is not a known easing preset.
    #[error("unknown easing preset `{0}`")]
    UnknownEasing(String),
    /// `cubic-bezier(..)` without four numbers, or with x control points outside `[0, 1]`.
    #[error("malformed cubic-bezier curve `{0}`")]
    MalformedCurve(String),
    /// Not one of the initial-position presets.
    #[error("unknown initial position `{0}`")]
    UnknownInitialPosition(String),
    /// Neither `up` nor `down`.
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
}
