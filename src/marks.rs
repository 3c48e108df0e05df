//! Mark editing: parsing user input and checking it against the track.
//!
//! Input is either a bare number of seconds (`"45"`) or a `m:s` timestamp
//! (`"1:30"`). Anything else, including a seconds field of 60 or more, is
//! rejected rather than normalised.

mod parse;

pub use parse::{format_timestamp, parse_mark};

use crate::error::{TrackError, TrackResult};
use crate::host::Seconds;
use crate::track::{MARKIN_KEY, MARKOUT_KEY, TrackState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkKind {
    /// Loop restart point.
    In,
    /// Early stop point.
    Out,
}

impl MarkKind {
    pub fn flag_key(self) -> &'static str {
        match self {
            MarkKind::In => MARKIN_KEY,
            MarkKind::Out => MARKOUT_KEY,
        }
    }

    /// Localization key of the prompt label.
    pub fn prompt_key(self) -> &'static str {
        match self {
            MarkKind::In => "TRACK-TRACKER.prompts.markin",
            MarkKind::Out => "TRACK-TRACKER.prompts.markout",
        }
    }

    pub fn current(self, state: &TrackState) -> Option<Seconds> {
        match self {
            MarkKind::In => state.markin,
            MarkKind::Out => state.markout,
        }
    }
}

/// Exclusive bounds a new mark value must fall within.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkBounds {
    pub min: Seconds,
    pub max: Seconds,
    pub current: Option<Seconds>,
}

impl MarkBounds {
    /// A mark in sits between 0 and the mark out (or the end); a mark out
    /// sits between the mark in (or 0) and the end.
    pub fn for_kind(kind: MarkKind, state: &TrackState, duration: Seconds) -> Self {
        let (min, max) = match kind {
            MarkKind::In => (0.0, state.markout.unwrap_or(duration)),
            MarkKind::Out => (state.markin.unwrap_or(0.0), duration),
        };
        Self {
            min,
            max,
            current: kind.current(state),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MarkChange {
    /// Same value as the existing mark; nothing to write.
    Unchanged,
    Set(Seconds),
}

pub fn validate_mark(value: Seconds, bounds: &MarkBounds) -> TrackResult<MarkChange> {
    if bounds.current == Some(value) {
        return Ok(MarkChange::Unchanged);
    }
    if value <= bounds.min || value >= bounds.max {
        return Err(TrackError::OutOfRange {
            value,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(MarkChange::Set(value))
}

/// Parse `input` and validate it against `bounds`.
pub fn check_mark_input(input: &str, bounds: &MarkBounds) -> TrackResult<MarkChange> {
    let value = parse_mark(input)?;
    validate_mark(value as Seconds, bounds)
}
