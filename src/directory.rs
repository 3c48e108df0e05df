//! Rendering data for the currently-playing panel.
//!
//! Nothing here mutates state; the host's directory view calls these when it
//! renders a sound row and again on each `ui.refresh_interval_ms` tick.

use std::time::Instant;

use crate::cadence::Cadence;
use crate::config::Settings;
use crate::host::{AudioResource, Seconds, SoundDocument};
use crate::marks::{MarkBounds, MarkKind, format_timestamp};
use crate::offset::{self, effective_duration, percentage};
use crate::track::TrackState;

/// Per-sound values the panel template renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRow {
    pub is_paused: bool,
    /// Localization key of the play button tooltip.
    pub play_title: &'static str,
    pub current_time: String,
    pub duration_time: String,
    /// Slider position, `None` while the duration is unknown.
    pub track_percentage: Option<u8>,
    pub markin: Option<u8>,
    pub markout: Option<u8>,
}

/// Values rewritten in place on each refresh tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampRefresh {
    pub current_time: String,
    pub duration_time: String,
    pub tracker: Option<u8>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextAction {
    EditMarkIn,
    EditMarkOut,
    RemoveMarks,
}

/// Text of the mark edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPrompt {
    pub label_key: &'static str,
    pub min: String,
    pub max: String,
    pub current: String,
}

fn elapsed_and_duration<D, S>(doc: &D, sound: &S, state: &TrackState) -> (Seconds, Option<Seconds>)
where
    D: SoundDocument + ?Sized,
    S: AudioResource + ?Sized,
{
    (
        offset::elapsed(sound, doc.data().playing, state),
        effective_duration(sound.duration(), state),
    )
}

/// Build the row of a sound that is playing or paused. Idle sounds get no row.
pub fn prepare_row<D, S>(doc: &D, sound: &S, state: &TrackState) -> Option<SoundRow>
where
    D: SoundDocument + ?Sized,
    S: AudioResource + ?Sized,
{
    let data = doc.data();
    if !data.playing && state.paused_at.is_none() {
        return None;
    }

    let (elapsed, duration) = elapsed_and_duration(doc, sound, state);
    let as_pct = |t: Option<Seconds>| t.zip(duration).and_then(|(t, d)| percentage(t, d));
    Some(SoundRow {
        is_paused: !data.playing,
        play_title: if state.paused_at.is_some() {
            "PLAYLIST.SoundResume"
        } else {
            "PLAYLIST.SoundPlay"
        },
        current_time: format_timestamp(Some(elapsed)),
        duration_time: format_timestamp(duration),
        track_percentage: as_pct(Some(elapsed)),
        markin: as_pct(state.markin),
        markout: as_pct(state.markout),
    })
}

/// Values for the periodic refresh of an already rendered row.
pub fn refresh_timestamps<D, S>(doc: &D, sound: &S, state: &TrackState) -> TimestampRefresh
where
    D: SoundDocument + ?Sized,
    S: AudioResource + ?Sized,
{
    let (elapsed, duration) = elapsed_and_duration(doc, sound, state);
    TimestampRefresh {
        current_time: format_timestamp(Some(elapsed)),
        duration_time: format_timestamp(duration),
        tracker: duration.and_then(|d| percentage(elapsed, d)),
    }
}

/// Gates `refresh_timestamps` to the configured refresh interval.
#[derive(Debug, Clone)]
pub struct TimestampRefresher {
    cadence: Cadence,
}

impl TimestampRefresher {
    pub fn new(settings: &Settings) -> Self {
        Self {
            cadence: Cadence::new(settings.ui.refresh_interval()),
        }
    }

    /// Fresh values for a playing row when a refresh is due at `now`.
    ///
    /// Paused rows keep what they show.
    pub fn poll<D, S>(
        &mut self,
        now: Instant,
        doc: &D,
        sound: &S,
        state: &TrackState,
    ) -> Option<TimestampRefresh>
    where
        D: SoundDocument + ?Sized,
        S: AudioResource + ?Sized,
    {
        if !doc.data().playing || !self.cadence.ready(now) {
            return None;
        }
        Some(refresh_timestamps(doc, sound, state))
    }
}

/// Entries of the row's context menu.
pub fn context_actions(state: &TrackState) -> Vec<ContextAction> {
    let mut actions = vec![ContextAction::EditMarkIn, ContextAction::EditMarkOut];
    if state.has_marks() {
        actions.push(ContextAction::RemoveMarks);
    }
    actions
}

pub fn mark_prompt(kind: MarkKind, state: &TrackState, duration: Seconds) -> MarkPrompt {
    let bounds = MarkBounds::for_kind(kind, state, duration);
    MarkPrompt {
        label_key: kind.prompt_key(),
        min: format_timestamp(Some(bounds.min)),
        max: format_timestamp(Some(bounds.max)),
        current: format_timestamp(bounds.current),
    }
}

#[cfg(test)]
mod tests;
