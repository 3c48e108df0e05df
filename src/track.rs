//! Per-track mark metadata stored as document flags.
//!
//! `TrackState` is the typed view of the flags; all reads go through
//! `TrackState::load` and all writes through `TrackStore`, so the rest of
//! the crate never touches flag keys directly.

mod state;

pub use state::*;
