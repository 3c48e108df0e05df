//! In-memory host doubles shared by the unit tests.

use std::collections::HashMap;
use std::time::Duration;

use crate::audio::{Tick, TickEvents};
use crate::error::{TrackError, TrackResult};
use crate::host::{
    AudioResource, Changed, FlagStore, Notice, Notifier, PlayOptions, PlaylistHooks, ScheduleId,
    Seconds, SoundData, SoundDocument, SoundId, SoundUpdate,
};
use crate::lifecycle::SoundFactory;

pub(crate) const NS: &str = "track-tracker";

#[derive(Debug, Default)]
pub(crate) struct FakeSound {
    pub id: u64,
    pub loaded: bool,
    pub playing: bool,
    pub current_time: Seconds,
    pub duration: Option<Seconds>,
    pub schedules: Vec<(ScheduleId, Seconds)>,
    next_schedule: u64,
    pub plays: Vec<PlayOptions>,
    pub loads: usize,
    pub stops: usize,
    pub fades: Vec<(f32, Duration)>,
    /// The next tick reports a natural end.
    pub ends: bool,
}

impl FakeSound {
    pub fn loaded(id: u64, duration: Seconds) -> Self {
        Self {
            id,
            loaded: true,
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn unloaded(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn playing_at(mut self, t: Seconds) -> Self {
        self.playing = true;
        self.current_time = t;
        self
    }

    /// Offsets of the schedules still pending.
    pub fn pending_at(&self) -> Vec<Seconds> {
        self.schedules.iter().map(|(_, at)| *at).collect()
    }

    /// Move the clock to `t` and take the schedules that became due.
    pub fn advance_to(&mut self, t: Seconds) -> Vec<ScheduleId> {
        self.current_time = t;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.schedules.drain(..).partition(|(_, at)| *at <= t);
        self.schedules = pending;
        due.into_iter().map(|(id, _)| id).collect()
    }
}

impl AudioResource for FakeSound {
    fn id(&self) -> SoundId {
        SoundId(self.id)
    }

    fn loaded(&self) -> bool {
        self.loaded
    }

    fn playing(&self) -> bool {
        self.playing
    }

    fn current_time(&self) -> Option<Seconds> {
        self.loaded.then_some(self.current_time)
    }

    fn duration(&self) -> Option<Seconds> {
        self.duration
    }

    fn load(&mut self, autoplay: Option<PlayOptions>) -> TrackResult<()> {
        self.loads += 1;
        self.loaded = true;
        if let Some(options) = autoplay {
            self.play(options)?;
        }
        Ok(())
    }

    fn play(&mut self, options: PlayOptions) -> TrackResult<()> {
        if !self.loaded {
            return Err(TrackError::NotLoaded);
        }
        self.playing = true;
        self.current_time = options.offset.unwrap_or(0.0);
        self.plays.push(options);
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.playing = false;
        self.schedules.clear();
    }

    fn fade(&mut self, volume: f32, duration: Duration) {
        self.fades.push((volume, duration));
    }

    fn fade_out(&mut self, duration: Duration) {
        self.fades.push((0.0, duration));
        self.stop();
    }

    fn schedule(&mut self, at: Seconds) -> ScheduleId {
        self.next_schedule += 1;
        let id = ScheduleId(self.next_schedule);
        self.schedules.push((id, at));
        id
    }

    fn cancel(&mut self, id: ScheduleId) {
        self.schedules.retain(|(sid, _)| *sid != id);
    }
}

impl Tick for FakeSound {
    fn tick(&mut self) -> TickEvents {
        let due = self.advance_to(self.current_time);
        let ended = std::mem::take(&mut self.ends);
        if ended {
            self.playing = false;
            self.schedules.clear();
        }
        TickEvents { due, ended }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeDocument {
    pub data: SoundData,
    pub flags: HashMap<(String, String), f64>,
    pub updates: Vec<SoundUpdate>,
    /// Change sets the host would deliver to the update hook.
    pub changes: Vec<Changed>,
    pub reject_updates: bool,
}

impl FakeDocument {
    pub fn new(path: &str) -> Self {
        Self {
            data: SoundData {
                path: path.to_string(),
                ..SoundData::default()
            },
            ..Self::default()
        }
    }

    pub fn playing(mut self) -> Self {
        self.data.playing = true;
        self
    }

    pub fn repeat(mut self) -> Self {
        self.data.repeat = true;
        self
    }

    pub fn with_flag(mut self, key: &str, value: f64) -> Self {
        self.flags.insert((NS.to_string(), key.to_string()), value);
        self
    }

    pub fn flag(&self, key: &str) -> Option<f64> {
        self.get_flag(NS, key)
    }
}

impl FlagStore for FakeDocument {
    fn get_flag(&self, namespace: &str, key: &str) -> Option<f64> {
        self.flags
            .get(&(namespace.to_string(), key.to_string()))
            .copied()
    }

    fn set_flag(&mut self, namespace: &str, key: &str, value: f64) -> TrackResult<()> {
        if self.reject_updates {
            return Err(TrackError::Host("rejected".into()));
        }
        self.flags
            .insert((namespace.to_string(), key.to_string()), value);
        self.changes.push(Changed::flags());
        Ok(())
    }

    fn unset_flag(&mut self, namespace: &str, key: &str) -> TrackResult<()> {
        if self.reject_updates {
            return Err(TrackError::Host("rejected".into()));
        }
        self.flags.remove(&(namespace.to_string(), key.to_string()));
        self.changes.push(Changed::flags());
        Ok(())
    }
}

impl SoundDocument for FakeDocument {
    fn data(&self) -> &SoundData {
        &self.data
    }

    fn update(&mut self, update: SoundUpdate) -> TrackResult<()> {
        if self.reject_updates {
            return Err(TrackError::Host("rejected".into()));
        }
        if let Some(playing) = update.playing {
            self.data.playing = playing;
        }
        if let Some(paused) = update.paused_time {
            self.data.paused_time = paused;
        }
        if let Some(volume) = update.volume {
            self.data.volume = volume;
        }
        self.changes.push(Changed::from_update(&update));
        self.updates.push(update);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    pub notices: Vec<Notice>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPlaylist {
    pub started: Vec<SoundId>,
    pub ended: Vec<SoundId>,
}

impl PlaylistHooks for RecordingPlaylist {
    fn on_sound_start(&mut self, sound: SoundId) {
        self.started.push(sound);
    }

    fn on_sound_end(&mut self, sound: SoundId) {
        self.ended.push(sound);
    }
}

/// Creates loaded sounds with increasing ids and a fixed duration.
#[derive(Debug)]
pub(crate) struct FakeFactory {
    pub next_id: u64,
    pub duration: Seconds,
    pub created: Vec<String>,
}

impl FakeFactory {
    pub fn new(next_id: u64, duration: Seconds) -> Self {
        Self {
            next_id,
            duration,
            created: Vec::new(),
        }
    }
}

impl SoundFactory for FakeFactory {
    type Sound = FakeSound;

    fn create(&mut self, path: &str) -> TrackResult<FakeSound> {
        let id = self.next_id;
        self.next_id += 1;
        self.created.push(path.to_string());
        Ok(FakeSound::loaded(id, self.duration))
    }
}
