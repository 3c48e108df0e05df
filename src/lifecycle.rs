//! Document lifecycle adapter.
//!
//! `PlaylistTrack` is what the host hooks call into for one playlist sound:
//! playback start, document updates, truncation callbacks, and the user
//! actions of the currently-playing panel (scrub, mark edits, mute).

use std::time::Duration;

use crate::config::Settings;
use crate::error::{TrackError, TrackResult};
use crate::host::{
    AudioResource, Changed, Notice, Notifier, PlayOptions, PlaylistHooks, ScheduleId,
    SoundDocument, SoundId, SoundUpdate,
};
use crate::marks::{self, MarkBounds, MarkChange, MarkKind};
use crate::offset::{self, ScrubOutcome};
use crate::scheduler::{MarkOutOutcome, MarkScheduler};
use crate::track::{TrackState, TrackStore};

/// Builds the audio resource for a document path.
pub trait SoundFactory {
    type Sound: AudioResource;

    fn create(&mut self, path: &str) -> TrackResult<Self::Sound>;
}

/// What `sync` did to the resource.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    Stopped,
    FadingOut,
    /// The resource was already producing audio; nothing to do.
    AlreadyPlaying,
    /// Playback started. The host fires the start hook next.
    Started(PlayOptions),
    /// Loading with autoplay; the start hook fires once loaded.
    Loading(PlayOptions),
}

pub struct PlaylistTrack<S: AudioResource> {
    sound: S,
    scheduler: MarkScheduler,
    namespace: String,
    mute_restore: f32,
    volume_debounce: Duration,
}

impl<S: AudioResource> PlaylistTrack<S> {
    pub fn new(sound: S, settings: &Settings) -> Self {
        Self {
            sound,
            scheduler: MarkScheduler::new(settings),
            namespace: settings.flags.namespace.clone(),
            mute_restore: settings.volume.mute_restore,
            volume_debounce: Duration::from_millis(settings.volume.debounce_ms),
        }
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    pub fn scheduler(&self) -> &MarkScheduler {
        &self.scheduler
    }

    pub fn state<D: SoundDocument + ?Sized>(&self, doc: &D) -> TrackState {
        TrackState::load(doc, &self.namespace)
    }

    pub fn on_playback_start<D, H>(&mut self, doc: &mut D, hooks: &mut H) -> TrackResult<()>
    where
        D: SoundDocument + ?Sized,
        H: PlaylistHooks + ?Sized,
    {
        self.scheduler
            .on_playback_start(doc, &mut self.sound, hooks)
    }

    pub fn on_mark_out<D, H>(
        &mut self,
        fired: SoundId,
        schedule: ScheduleId,
        doc: &mut D,
        hooks: &mut H,
    ) -> TrackResult<MarkOutOutcome>
    where
        D: SoundDocument + ?Sized,
        H: PlaylistHooks + ?Sized,
    {
        self.scheduler
            .on_mark_out(fired, schedule, doc, &mut self.sound, hooks)
    }

    /// The resource played to its natural end on its own.
    ///
    /// Returns whether the playlist was told; a document that stopped in the
    /// meantime gets no end notification.
    pub fn on_natural_end<D, H>(&mut self, doc: &D, hooks: &mut H) -> bool
    where
        D: SoundDocument + ?Sized,
        H: PlaylistHooks + ?Sized,
    {
        self.scheduler.reset(&mut self.sound);
        if !doc.data().playing {
            return false;
        }
        hooks.on_sound_end(self.sound.id());
        true
    }

    /// The host applied an update to this sound's document.
    ///
    /// A new path invalidates the marks and cached duration and replaces the
    /// resource; a new paused offset while playing restarts from it; a mark
    /// or repeat change while playing re-arms the boundary.
    pub fn on_document_update<D, F>(
        &mut self,
        changed: Changed,
        doc: &mut D,
        factory: &mut F,
    ) -> TrackResult<SyncAction>
    where
        D: SoundDocument + ?Sized,
        F: SoundFactory<Sound = S> + ?Sized,
    {
        if changed.path {
            let cleared = TrackStore::new(doc, &self.namespace).clear_all();
            if let Err(e) = cleared {
                log::warn!("could not clear marks of {:?}: {e}", doc.data().path);
            }
            self.scheduler.reset(&mut self.sound);
            self.sound.stop();
            self.sound = factory.create(&doc.data().path)?;
            log::debug!("{:?} now plays {:?}", self.sound.id(), doc.data().path);
        }
        if changed.paused_time && doc.data().playing && self.sound.playing() {
            // The host has no seek primitive; a new offset while playing
            // means stop here and start again from it.
            self.scheduler.reset(&mut self.sound);
            self.sound.stop();
        }
        if changed.repeat || changed.flags {
            self.scheduler.reschedule(&*doc, &mut self.sound);
        }
        self.sync(&*doc)
    }

    /// Bring the resource in line with the document's playing state.
    pub fn sync<D: SoundDocument + ?Sized>(&mut self, doc: &D) -> TrackResult<SyncAction> {
        let data = doc.data();
        if !data.playing {
            self.scheduler.reset(&mut self.sound);
            if !data.fade.is_zero() && data.paused_time.is_none() && self.sound.playing() {
                self.sound.fade_out(data.fade);
                return Ok(SyncAction::FadingOut);
            }
            self.sound.stop();
            return Ok(SyncAction::Stopped);
        }
        if self.sound.playing() {
            return Ok(SyncAction::AlreadyPlaying);
        }

        let markin = self.state(doc).markin;
        let options = PlayOptions {
            looping: data.repeat,
            volume: data.volume,
            fade: data.fade,
            // A paused offset wins over the mark in.
            offset: data.paused_time.or(markin),
        };
        if self.sound.loaded() {
            self.sound.play(options.clone())?;
            Ok(SyncAction::Started(options))
        } else {
            self.sound.load(Some(options.clone()))?;
            Ok(SyncAction::Loading(options))
        }
    }

    /// Move playback to slider position `target`.
    pub fn scrub<D, N>(
        &mut self,
        doc: &mut D,
        notifier: &mut N,
        target: u8,
    ) -> TrackResult<ScrubOutcome>
    where
        D: SoundDocument + ?Sized,
        N: Notifier + ?Sized,
    {
        self.ensure_loaded(notifier)?;
        let state = self.state(&*doc);
        match offset::apply_scrub(doc, &self.sound, &state, target) {
            Err(TrackError::MissingDuration) => {
                notifier.notify(Notice::SoundNotLoaded);
                Err(TrackError::MissingDuration)
            }
            other => other,
        }
    }

    /// Validate `input` for a mark and store it.
    ///
    /// Bounds come from the flags as they are now, so an edit racing with
    /// another peer's edit is checked against whichever landed last.
    pub fn edit_mark<D, N>(
        &mut self,
        doc: &mut D,
        notifier: &mut N,
        kind: MarkKind,
        input: &str,
    ) -> TrackResult<MarkChange>
    where
        D: SoundDocument + ?Sized,
        N: Notifier + ?Sized,
    {
        self.ensure_loaded(notifier)?;
        let state = self.state(&*doc);
        let Some(duration) = offset::effective_duration(self.sound.duration(), &state) else {
            notifier.notify(Notice::SoundNotLoaded);
            return Err(TrackError::MissingDuration);
        };

        let bounds = MarkBounds::for_kind(kind, &state, duration);
        match marks::check_mark_input(input, &bounds) {
            Ok(MarkChange::Set(value)) => {
                TrackStore::new(doc, &self.namespace).set_mark(kind.flag_key(), value)?;
                log::debug!("{} set to {value}s", kind.flag_key());
                Ok(MarkChange::Set(value))
            }
            Ok(MarkChange::Unchanged) => Ok(MarkChange::Unchanged),
            Err(e @ TrackError::MalformedInput { .. }) => {
                notifier.notify(Notice::InvalidFormat {
                    value: input.to_string(),
                });
                Err(e)
            }
            Err(e @ TrackError::OutOfRange { .. }) => {
                notifier.notify(Notice::OutOfBounds {
                    value: input.to_string(),
                });
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop both marks. The cached duration stays.
    pub fn remove_marks<D: SoundDocument + ?Sized>(&mut self, doc: &mut D) -> TrackResult<()> {
        TrackStore::new(doc, &self.namespace).clear_marks()
    }

    /// Mute, or restore the volume remembered at the last mute.
    ///
    /// Returns the new document volume.
    pub fn toggle_mute<D, N>(
        &mut self,
        doc: &mut D,
        notifier: &mut N,
        global_volume: f32,
    ) -> TrackResult<f32>
    where
        D: SoundDocument + ?Sized,
        N: Notifier + ?Sized,
    {
        self.ensure_loaded(notifier)?;
        let current = doc.data().volume;
        let volume = if current == 0.0 {
            self.state(&*doc).saved_volume.unwrap_or(self.mute_restore)
        } else {
            TrackStore::new(doc, &self.namespace).remember_volume(current)?;
            0.0
        };

        // Apply locally right away, then propagate to everyone.
        self.sound
            .fade(volume * global_volume, self.volume_debounce);
        doc.update(SoundUpdate::volume(volume))?;
        Ok(volume)
    }

    /// Surface a not-loaded notice and start loading.
    fn ensure_loaded<N: Notifier + ?Sized>(&mut self, notifier: &mut N) -> TrackResult<()> {
        if self.sound.loaded() {
            return Ok(());
        }
        notifier.notify(Notice::SoundNotLoaded);
        self.sound.load(None)?;
        Err(TrackError::NotLoaded)
    }
}
