//! State, boundary and outcome types of the mark scheduler.

use crate::host::{ScheduleId, Seconds, SoundId};

/// Where the current playback cycle will be cut.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Boundary {
    /// Play to the natural end.
    None,
    /// Cut at the user's mark out.
    MarkOut(Seconds),
    /// Cut just before the natural end so a loop can restart at the mark in
    /// instead of at 0. Never shown to the user as a mark.
    LoopGuard(Seconds),
}

impl Boundary {
    pub fn at(self) -> Option<Seconds> {
        match self {
            Boundary::None => None,
            Boundary::MarkOut(at) | Boundary::LoopGuard(at) => Some(at),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScheduleState {
    Idle,
    Playing(Boundary),
    /// A truncation fired and the resource is being stopped.
    Stopping,
}

/// A callback the scheduler armed and still owns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PendingSchedule {
    pub sound: SoundId,
    pub schedule: ScheduleId,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// The callback came from a resource that is no longer tracked.
    OtherSound,
    /// Nothing is armed, or the armed handle belongs to another resource.
    NotArmed,
    /// The document stopped playing since the callback was armed.
    NotPlaying,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MarkOutOutcome {
    Ignored(StaleReason),
    /// Playback stopped and the playlist was told the sound ended.
    Ended,
    /// Playback restarted at `offset`.
    Looped { offset: Seconds },
    /// The fade-out ahead of the end began. Playback continues until the
    /// truncation or the natural end stops it.
    FadingOut,
}
