//! Error types for mark editing, scrubbing and playback scheduling.

use crate::host::Seconds;

/// Failures surfaced to the caller of a track operation.
///
/// None of these are fatal: a failed operation leaves the track state
/// untouched and playback continues with whatever boundary was armed before.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TrackError {
    /// The audio resource has not finished loading.
    #[error("sound is not loaded")]
    NotLoaded,

    /// Neither the live resource nor the cached flag knows the duration.
    #[error("sound duration is unknown")]
    MissingDuration,

    #[error("invalid mark format: {value:?}")]
    MalformedInput { value: String },

    #[error("mark {value}s is out of bounds ({min}s..{max}s)")]
    OutOfRange { value: Seconds, min: Seconds, max: Seconds },

    /// The host rejected a document or flag update.
    #[error("host update failed: {0}")]
    Host(String),

    #[error("audio backend error: {0}")]
    Audio(String),
}

pub type TrackResult<T> = Result<T, TrackError>;
