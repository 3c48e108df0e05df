//! Mark in / mark out looping and scrub tracking for playlist audio.
//!
//! The crate sits between a host's audio resources and its synchronized
//! sound documents. `offset` turns elapsed time into slider percentages and
//! back, `scheduler` truncates or loops playback at the user's marks, and
//! `lifecycle` / `directory` are the two adapters the host calls into.

pub mod audio;
pub mod cadence;
pub mod config;
pub mod directory;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod marks;
pub mod offset;
pub mod scheduler;
pub mod track;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{TrackError, TrackResult};
pub use host::{
    AudioResource, Changed, FlagStore, Notice, Notifier, PlayOptions, PlaylistHooks, ScheduleId,
    Seconds, SoundData, SoundDocument, SoundId, SoundUpdate,
};
pub use lifecycle::{PlaylistTrack, SoundFactory};
pub use scheduler::{
    Boundary, MarkOutOutcome, MarkScheduler, PendingSchedule, ScheduleState, StaleReason,
};
pub use track::TrackState;
