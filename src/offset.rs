//! Playback offset controller.
//!
//! Converts between a sound's elapsed time and the 0..=100 position shown
//! on the tracker slider, and applies a scrub by routing it through the
//! host's pause-then-play update path (the host has no seek primitive).

use crate::error::{TrackError, TrackResult};
use crate::host::{AudioResource, Seconds, SoundDocument, SoundUpdate};
use crate::track::{TrackState, TrackStore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrubOutcome {
    /// The target renders at the same percentage as the current position.
    Unchanged,
    /// The sound was playing; it was paused at the offset and resumed.
    Resumed(Seconds),
    /// The sound was paused; only its resume offset moved.
    Repositioned(Seconds),
}

fn usable(duration: Seconds) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Prefer the live duration, then the cached one.
pub fn effective_duration(live: Option<Seconds>, state: &TrackState) -> Option<Seconds> {
    live.filter(|d| usable(*d))
        .or(state.cached_duration.filter(|d| usable(*d)))
}

/// `floor(elapsed / duration * 100)`, clamped to `0..=100`.
///
/// `None` when the duration cannot be divided by.
pub fn percentage(elapsed: Seconds, duration: Seconds) -> Option<u8> {
    if !usable(duration) || !elapsed.is_finite() {
        return None;
    }
    let pct = (elapsed / duration * 100.0).floor();
    Some(pct.clamp(0.0, 100.0) as u8)
}

/// Elapsed offset as the host would display it: live time while playing,
/// the paused offset otherwise.
pub fn elapsed<S: AudioResource + ?Sized>(sound: &S, playing: bool, state: &TrackState) -> Seconds {
    if playing {
        sound.current_time().unwrap_or(0.0)
    } else {
        state.paused_at.unwrap_or(0.0)
    }
}

/// Current slider position of `sound`.
pub fn current_percentage<S: AudioResource + ?Sized>(
    sound: &S,
    playing: bool,
    state: &TrackState,
) -> TrackResult<u8> {
    if !sound.loaded() {
        return Err(TrackError::NotLoaded);
    }
    let duration =
        effective_duration(sound.duration(), state).ok_or(TrackError::MissingDuration)?;
    percentage(elapsed(sound, playing, state), duration).ok_or(TrackError::MissingDuration)
}

/// Offset matching slider position `pct`. The input is not clamped.
pub fn percentage_to_offset<S: AudioResource + ?Sized>(
    sound: &S,
    state: &TrackState,
    pct: u8,
) -> TrackResult<Seconds> {
    let duration =
        effective_duration(sound.duration(), state).ok_or(TrackError::MissingDuration)?;
    Ok(f64::from(pct) / 100.0 * duration)
}

/// Move playback of `sound` to slider position `target`.
pub fn apply_scrub<D, S>(
    doc: &mut D,
    sound: &S,
    state: &TrackState,
    target: u8,
) -> TrackResult<ScrubOutcome>
where
    D: SoundDocument + ?Sized,
    S: AudioResource + ?Sized,
{
    let playing = doc.data().playing;
    let current = current_percentage(sound, playing, state)?;
    if current == target {
        return Ok(ScrubOutcome::Unchanged);
    }

    let offset = percentage_to_offset(sound, state, target)?;
    doc.update(SoundUpdate::pause_at(offset))?;
    if playing {
        log::debug!("scrub {current}% -> {target}% ({offset:.2}s), restarting");
        doc.update(SoundUpdate::resume())?;
        Ok(ScrubOutcome::Resumed(offset))
    } else {
        log::debug!("scrub {current}% -> {target}% ({offset:.2}s) while paused");
        Ok(ScrubOutcome::Repositioned(offset))
    }
}

/// Remember the live duration if it is known and none is cached yet.
pub fn cache_duration_if_known<D, S>(doc: &mut D, sound: &S, namespace: &str) -> TrackResult<bool>
where
    D: SoundDocument + ?Sized,
    S: AudioResource + ?Sized,
{
    match sound.duration().filter(|d| usable(*d)) {
        Some(duration) => TrackStore::new(doc, namespace).cache_duration(duration),
        None => Ok(false),
    }
}
