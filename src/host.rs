//! Capabilities the host provides to the core.
//!
//! The host owns audio resources, sound documents and the notification
//! area. The core only talks to them through the traits here, and scheduled
//! callbacks come back as plain `SoundId`/`ScheduleId` messages rather than
//! closures.

mod types;

use std::time::Duration;

use crate::error::TrackResult;

pub use types::*;

/// A playable unit owned by the host.
pub trait AudioResource {
    fn id(&self) -> SoundId;
    fn loaded(&self) -> bool;
    /// Whether the resource itself is currently producing audio.
    fn playing(&self) -> bool;
    /// Elapsed offset of the current playback, if known.
    fn current_time(&self) -> Option<Seconds>;
    /// Total duration, if the resource can report it.
    fn duration(&self) -> Option<Seconds>;

    /// Start loading. With `autoplay`, playback starts once loading is done.
    fn load(&mut self, autoplay: Option<PlayOptions>) -> TrackResult<()>;
    fn play(&mut self, options: PlayOptions) -> TrackResult<()>;
    /// Stop playback. Invalidates every pending schedule on this resource.
    fn stop(&mut self);
    fn fade(&mut self, volume: f32, duration: Duration);
    /// Fade to silence over `duration`, then stop as `stop` does.
    fn fade_out(&mut self, duration: Duration);

    /// Arrange for the host to report `self.id()` back once playback reaches
    /// `at` seconds on the resource's own clock. Single shot.
    fn schedule(&mut self, at: Seconds) -> ScheduleId;
    fn cancel(&mut self, id: ScheduleId);
}

/// Namespaced numeric flags attached to a document.
pub trait FlagStore {
    fn get_flag(&self, namespace: &str, key: &str) -> Option<f64>;
    fn set_flag(&mut self, namespace: &str, key: &str, value: f64) -> TrackResult<()>;
    fn unset_flag(&mut self, namespace: &str, key: &str) -> TrackResult<()>;
}

/// A playlist sound document, synchronized by the host to all peers.
pub trait SoundDocument: FlagStore {
    fn data(&self) -> &SoundData;
    /// Push a partial update. The host applies it everywhere and later calls
    /// the update hook with the matching `Changed` set.
    fn update(&mut self, update: SoundUpdate) -> TrackResult<()>;
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Playlist-level orchestration around a single sound.
pub trait PlaylistHooks {
    fn on_sound_start(&mut self, sound: SoundId);
    /// Natural-end handler; decides what plays next.
    fn on_sound_end(&mut self, sound: SoundId);
}
