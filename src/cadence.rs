//! Fixed-rate gate for work driven from a host loop.

use std::time::{Duration, Instant};

/// Says when a periodic job is due, given the caller's clock.
///
/// The first poll is always due; after that one poll per `every` is.
#[derive(Debug, Clone)]
pub struct Cadence {
    every: Duration,
    last: Option<Instant>,
}

impl Cadence {
    pub fn new(every: Duration) -> Self {
        Self { every, last: None }
    }

    pub fn every(&self) -> Duration {
        self.every
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.every => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
