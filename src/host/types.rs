//! Plain value types exchanged with the host.
//!
//! These mirror the fields of a host sound document and the options its
//! audio resources accept when (re)starting playback.

use std::time::Duration;

/// Offsets and durations, in seconds.
pub type Seconds = f64;

/// Identity of one audio resource instance.
///
/// A resource recreated after a path change gets a fresh id, which is what
/// lets a late truncation callback be recognised as stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SoundId(pub u64);

/// Identity of one pending scheduled callback on a resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    /// Restart from 0 when the resource reaches its natural end.
    pub looping: bool,
    pub volume: f32,
    /// Fade-in duration. `Duration::ZERO` starts at full volume.
    pub fade: Duration,
    /// Where to start. `None` starts from the beginning.
    pub offset: Option<Seconds>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            looping: false,
            volume: 1.0,
            fade: Duration::ZERO,
            offset: None,
        }
    }
}

/// Document fields of a playlist sound that the core reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    pub path: String,
    /// Whether the document says this sound should be playing.
    pub playing: bool,
    /// Offset recorded at the last pause, if any.
    pub paused_time: Option<Seconds>,
    /// Repeat flag of the sound.
    pub repeat: bool,
    pub volume: f32,
    pub fade: Duration,
}

impl Default for SoundData {
    fn default() -> Self {
        Self {
            path: String::new(),
            playing: false,
            paused_time: None,
            repeat: false,
            volume: 0.5,
            fade: Duration::ZERO,
        }
    }
}

/// Partial document update pushed to every connected peer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundUpdate {
    pub playing: Option<bool>,
    /// `Some(None)` clears the paused time.
    pub paused_time: Option<Option<Seconds>>,
    pub volume: Option<f32>,
}

impl SoundUpdate {
    /// Stop playback and record `offset` as the resume point.
    pub fn pause_at(offset: Seconds) -> Self {
        Self {
            playing: Some(false),
            paused_time: Some(Some(offset)),
            ..Self::default()
        }
    }

    pub fn resume() -> Self {
        Self {
            playing: Some(true),
            ..Self::default()
        }
    }

    pub fn volume(volume: f32) -> Self {
        Self {
            volume: Some(volume),
            ..Self::default()
        }
    }
}

/// Which document fields a host update touched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Changed {
    pub path: bool,
    pub repeat: bool,
    pub flags: bool,
    pub playing: bool,
    pub paused_time: bool,
    pub volume: bool,
}

impl Changed {
    pub fn path() -> Self {
        Self {
            path: true,
            ..Self::default()
        }
    }

    pub fn flags() -> Self {
        Self {
            flags: true,
            ..Self::default()
        }
    }

    pub fn repeat() -> Self {
        Self {
            repeat: true,
            ..Self::default()
        }
    }

    /// The change set produced by applying `update`.
    pub fn from_update(update: &SoundUpdate) -> Self {
        Self {
            playing: update.playing.is_some(),
            paused_time: update.paused_time.is_some(),
            volume: update.volume.is_some(),
            ..Self::default()
        }
    }
}

/// User-facing notices. Each maps to a localization key in the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    SoundNotLoaded,
    InvalidFormat { value: String },
    OutOfBounds { value: String },
}

impl Notice {
    pub fn key(&self) -> &'static str {
        match self {
            Notice::SoundNotLoaded => "TRACK-TRACKER.notifications.soundNotLoaded",
            Notice::InvalidFormat { .. } => "TRACK-TRACKER.notifications.invalidFormat",
            Notice::OutOfBounds { .. } => "TRACK-TRACKER.notifications.outtaBounds",
        }
    }

    /// The raw user input interpolated into the message, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Notice::SoundNotLoaded => None,
            Notice::InvalidFormat { value } | Notice::OutOfBounds { value } => Some(value),
        }
    }
}
