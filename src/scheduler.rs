//! Mark boundary scheduler.
//!
//! One `MarkScheduler` follows one playlist sound. When playback starts it
//! arms a single truncation callback on the audio resource, either at the
//! mark out or just before the natural end of a looping track that has a
//! mark in. When the callback comes back the scheduler ends the track or
//! restarts it at the mark in.
//!
//! A non-repeating sound with a fade gets a second callback that starts the
//! fade-out `fade` seconds before the cut or the natural end.
//!
//! Pending callbacks are owned handles: they are always cancelled before new
//! ones are armed, even though stopping a resource also drops its schedules
//! on the host side.

mod types;

use std::time::Duration;

use crate::config::Settings;
use crate::error::TrackResult;
use crate::host::{
    AudioResource, PlayOptions, PlaylistHooks, ScheduleId, Seconds, SoundDocument, SoundId,
};
use crate::offset;
use crate::track::TrackState;

pub use types::*;

/// Pick the truncation point for a playback cycle.
pub fn boundary_for(
    state: &TrackState,
    looping: bool,
    duration: Option<Seconds>,
    loop_guard: Seconds,
) -> Boundary {
    if let Some(markout) = state.markout {
        return Boundary::MarkOut(markout);
    }
    let (true, Some(markin)) = (looping, state.markin) else {
        return Boundary::None;
    };
    match duration {
        Some(d) if d - loop_guard > markin => Boundary::LoopGuard(d - loop_guard),
        Some(d) => {
            log::warn!("mark in {markin:.2}s leaves no room before the end ({d:.2}s)");
            Boundary::None
        }
        None => {
            log::debug!("looping with mark in but duration unknown, not guarding the end");
            Boundary::None
        }
    }
}

/// Where the fade-out of a non-repeating sound starts, if it has one.
///
/// The fade ends where playback ends: at the mark out, else at the natural
/// end. Repeating sounds never fade out on their own.
pub fn fade_out_at(
    boundary: Boundary,
    duration: Option<Seconds>,
    fade: Duration,
    repeat: bool,
) -> Option<Seconds> {
    if repeat || fade.is_zero() {
        return None;
    }
    let end = match boundary {
        Boundary::MarkOut(at) => at,
        _ => duration?,
    };
    let at = end - fade.as_secs_f64();
    (at > 0.0).then_some(at)
}

#[derive(Debug)]
pub struct MarkScheduler {
    state: ScheduleState,
    pending: Option<PendingSchedule>,
    fade_out: Option<PendingSchedule>,
    namespace: String,
    loop_guard: Seconds,
}

impl MarkScheduler {
    pub fn new(settings: &Settings) -> Self {
        Self::with_options(
            settings.flags.namespace.clone(),
            settings.scheduler.loop_guard_secs,
        )
    }

    pub fn with_options(namespace: impl Into<String>, loop_guard: Seconds) -> Self {
        Self {
            state: ScheduleState::Idle,
            pending: None,
            fade_out: None,
            namespace: namespace.into(),
            loop_guard,
        }
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    /// The armed truncation callback.
    pub fn pending(&self) -> Option<PendingSchedule> {
        self.pending
    }

    pub fn pending_fade_out(&self) -> Option<PendingSchedule> {
        self.fade_out
    }

    /// Playback of `sound` just started.
    pub fn on_playback_start<D, S, H>(
        &mut self,
        doc: &mut D,
        sound: &mut S,
        hooks: &mut H,
    ) -> TrackResult<()>
    where
        D: SoundDocument + ?Sized,
        S: AudioResource + ?Sized,
        H: PlaylistHooks + ?Sized,
    {
        if !doc.data().playing {
            self.disarm(sound);
            sound.stop();
            self.state = ScheduleState::Idle;
            return Ok(());
        }

        if let Err(e) = offset::cache_duration_if_known(doc, &*sound, &self.namespace) {
            log::warn!("could not cache duration of {:?}: {e}", doc.data().path);
        }

        self.arm(&*doc, sound);
        hooks.on_sound_start(sound.id());
        Ok(())
    }

    /// Marks or the repeat flag changed while playing: re-arm in place
    /// without restarting playback.
    pub fn reschedule<D, S>(&mut self, doc: &D, sound: &mut S)
    where
        D: SoundDocument + ?Sized,
        S: AudioResource + ?Sized,
    {
        if !sound.playing() || !doc.data().playing {
            return;
        }
        let boundary = self.arm(doc, sound);
        log::debug!("rescheduling {:?} -> {boundary:?}", sound.id());
    }

    /// A callback armed on `fired` came due.
    pub fn on_mark_out<D, S, H>(
        &mut self,
        fired: SoundId,
        schedule: ScheduleId,
        doc: &mut D,
        sound: &mut S,
        hooks: &mut H,
    ) -> TrackResult<MarkOutOutcome>
    where
        D: SoundDocument + ?Sized,
        S: AudioResource + ?Sized,
        H: PlaylistHooks + ?Sized,
    {
        if fired != sound.id() {
            log::trace!("ignoring mark out from {fired:?}, tracking {:?}", sound.id());
            return Ok(MarkOutOutcome::Ignored(StaleReason::OtherSound));
        }
        let armed = PendingSchedule {
            sound: fired,
            schedule,
        };
        if self.fade_out == Some(armed) {
            self.fade_out = None;
            if !doc.data().playing {
                return Ok(MarkOutOutcome::Ignored(StaleReason::NotPlaying));
            }
            let fade = doc.data().fade;
            log::debug!("{fired:?} fading out over {fade:?}");
            sound.fade(0.0, fade);
            return Ok(MarkOutOutcome::FadingOut);
        }
        if self.pending != Some(armed) {
            log::trace!("ignoring mark out {schedule:?}, armed {:?}", self.pending);
            return Ok(MarkOutOutcome::Ignored(StaleReason::NotArmed));
        }
        if !doc.data().playing {
            self.disarm(sound);
            self.state = ScheduleState::Idle;
            return Ok(MarkOutOutcome::Ignored(StaleReason::NotPlaying));
        }

        self.disarm(sound);
        self.state = ScheduleState::Stopping;
        sound.stop();

        if !doc.data().repeat {
            self.state = ScheduleState::Idle;
            log::debug!("{fired:?} reached its mark out, ending");
            hooks.on_sound_end(fired);
            return Ok(MarkOutOutcome::Ended);
        }

        let markin = TrackState::load(&*doc, &self.namespace).markin;
        let options = PlayOptions {
            looping: true,
            volume: doc.data().volume,
            offset: markin,
            ..PlayOptions::default()
        };
        // Restart through load/play so the resource re-buffers from the loop point.
        let restarted = if sound.loaded() {
            sound.play(options)
        } else {
            sound.load(Some(options))
        };
        if let Err(e) = restarted {
            self.state = ScheduleState::Idle;
            return Err(e);
        }

        let offset = markin.unwrap_or(0.0);
        log::debug!("{fired:?} looping back to {offset:.2}s");
        self.arm(&*doc, sound);
        Ok(MarkOutOutcome::Looped { offset })
    }

    /// Explicit stop, natural end or path change. Drops the pending callbacks.
    pub fn reset<S: AudioResource + ?Sized>(&mut self, sound: &mut S) {
        self.disarm(sound);
        self.state = ScheduleState::Idle;
    }

    /// Replace both callbacks with the ones the current flags call for.
    fn arm<D, S>(&mut self, doc: &D, sound: &mut S) -> Boundary
    where
        D: SoundDocument + ?Sized,
        S: AudioResource + ?Sized,
    {
        self.disarm(sound);

        let data = doc.data();
        let state = TrackState::load(doc, &self.namespace);
        let duration = offset::effective_duration(sound.duration(), &state);
        let boundary = boundary_for(&state, data.repeat, duration, self.loop_guard);

        if let Some(at) = boundary.at() {
            self.pending = Some(PendingSchedule {
                sound: sound.id(),
                schedule: sound.schedule(at),
            });
        }
        if let Some(at) = fade_out_at(boundary, duration, data.fade, data.repeat) {
            self.fade_out = Some(PendingSchedule {
                sound: sound.id(),
                schedule: sound.schedule(at),
            });
        }
        self.state = ScheduleState::Playing(boundary);
        boundary
    }

    fn disarm<S: AudioResource + ?Sized>(&mut self, sound: &mut S) {
        for pending in [self.pending.take(), self.fade_out.take()].into_iter().flatten() {
            // A handle on a replaced resource died with that resource's stop.
            if pending.sound == sound.id() {
                sound.cancel(pending.schedule);
            }
        }
    }
}
