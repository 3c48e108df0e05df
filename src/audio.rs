//! Reference audio backend built on `rodio`.
//!
//! `RodioSound` implements `AudioResource` for local files. A host loop
//! drives it through `Pump`, which runs `pump_track` once per
//! `audio.tick_ms` to turn the sound's clock into truncation callbacks and
//! end-of-track notifications.

mod probe;
mod sink;
mod sound;

use std::time::Instant;

pub use probe::probe_duration;
pub use sound::{RodioFactory, RodioSound};

use crate::cadence::Cadence;
use crate::config::Settings;
use crate::error::TrackResult;
use crate::host::{AudioResource, PlaylistHooks, ScheduleId, SoundDocument};
use crate::lifecycle::PlaylistTrack;
use crate::scheduler::MarkOutOutcome;

/// What happened to a sound since the last `tick`.
#[derive(Debug, Default, PartialEq)]
pub struct TickEvents {
    /// Schedules whose offset was reached, in the order they were armed.
    pub due: Vec<ScheduleId>,
    /// Playback reached the natural end of a non-looping sound.
    pub ended: bool,
}

/// A resource whose clock is advanced by its owner rather than by the host.
pub trait Tick {
    fn tick(&mut self) -> TickEvents;
}

/// Advance `track`'s sound and deliver whatever came due.
pub fn pump_track<S, D, H>(
    track: &mut PlaylistTrack<S>,
    doc: &mut D,
    hooks: &mut H,
) -> TrackResult<Vec<MarkOutOutcome>>
where
    S: AudioResource + Tick,
    D: SoundDocument + ?Sized,
    H: PlaylistHooks + ?Sized,
{
    let fired = track.sound().id();
    let events = track.sound_mut().tick();

    let mut outcomes = Vec::with_capacity(events.due.len());
    for schedule in events.due {
        outcomes.push(track.on_mark_out(fired, schedule, doc, hooks)?);
    }
    // A truncation in this same tick already ended or restarted playback.
    let handled = outcomes
        .iter()
        .any(|o| matches!(o, MarkOutOutcome::Ended | MarkOutOutcome::Looped { .. }));
    if events.ended && !handled && track.on_natural_end(&*doc, hooks) {
        log::debug!("{fired:?} reached its natural end");
    }
    Ok(outcomes)
}

/// Runs `pump_track` at the configured tick rate.
#[derive(Debug, Clone)]
pub struct Pump {
    cadence: Cadence,
}

impl Pump {
    pub fn new(settings: &Settings) -> Self {
        Self {
            cadence: Cadence::new(settings.audio.tick_interval()),
        }
    }

    /// Pump `track` if a tick is due at `now`; otherwise do nothing.
    pub fn poll<S, D, H>(
        &mut self,
        now: Instant,
        track: &mut PlaylistTrack<S>,
        doc: &mut D,
        hooks: &mut H,
    ) -> TrackResult<Vec<MarkOutOutcome>>
    where
        S: AudioResource + Tick,
        D: SoundDocument + ?Sized,
        H: PlaylistHooks + ?Sized,
    {
        if !self.cadence.ready(now) {
            return Ok(Vec::new());
        }
        pump_track(track, doc, hooks)
    }
}
