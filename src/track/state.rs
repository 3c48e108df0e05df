use crate::error::TrackResult;
use crate::host::{FlagStore, Seconds, SoundDocument};

pub const MARKIN_KEY: &str = "markin";
pub const MARKOUT_KEY: &str = "markout";
pub const DURATION_KEY: &str = "duration";
pub const VOLUME_KEY: &str = "volume";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackState {
    /// Where a loop restarts. `None` loops from the start.
    pub markin: Option<Seconds>,
    /// Where playback is cut short. `None` plays to the natural end.
    pub markout: Option<Seconds>,
    /// Duration remembered for when the live resource cannot report one.
    pub cached_duration: Option<Seconds>,
    /// Offset of the last pause, used to resume instead of restart.
    pub paused_at: Option<Seconds>,
    /// Volume remembered by the mute toggle.
    pub saved_volume: Option<f32>,
}

impl TrackState {
    /// Read the current flags and paused offset of `doc`.
    pub fn load<D: SoundDocument + ?Sized>(doc: &D, namespace: &str) -> Self {
        Self {
            markin: positive_flag(doc, namespace, MARKIN_KEY),
            markout: positive_flag(doc, namespace, MARKOUT_KEY),
            cached_duration: positive_flag(doc, namespace, DURATION_KEY),
            paused_at: doc.data().paused_time.filter(|t| t.is_finite() && *t >= 0.0),
            saved_volume: positive_flag(doc, namespace, VOLUME_KEY).map(|v| v as f32),
        }
    }

    pub fn has_marks(&self) -> bool {
        self.markin.is_some() || self.markout.is_some()
    }
}

/// Zero, negative and non-finite flag values count as unset.
fn positive_flag<F: FlagStore + ?Sized>(store: &F, namespace: &str, key: &str) -> Option<f64> {
    store
        .get_flag(namespace, key)
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Write side of `TrackState`.
pub struct TrackStore<'a, F: FlagStore + ?Sized> {
    store: &'a mut F,
    namespace: &'a str,
}

impl<'a, F: FlagStore + ?Sized> TrackStore<'a, F> {
    pub fn new(store: &'a mut F, namespace: &'a str) -> Self {
        Self { store, namespace }
    }

    pub fn set_mark(&mut self, key: &str, value: Seconds) -> TrackResult<()> {
        self.store.set_flag(self.namespace, key, value)
    }

    /// Remove both marks. The cached duration is kept since it is costly to
    /// recover before the resource loads.
    pub fn clear_marks(&mut self) -> TrackResult<()> {
        self.unset_if_present(MARKIN_KEY)?;
        self.unset_if_present(MARKOUT_KEY)
    }

    /// Forget everything tied to the current path.
    pub fn clear_all(&mut self) -> TrackResult<()> {
        self.clear_marks()?;
        self.unset_if_present(DURATION_KEY)
    }

    /// Write `duration` unless one is already cached. Returns whether it wrote.
    pub fn cache_duration(&mut self, duration: Seconds) -> TrackResult<bool> {
        if !(duration.is_finite() && duration > 0.0) {
            return Ok(false);
        }
        if positive_flag(&*self.store, self.namespace, DURATION_KEY).is_some() {
            return Ok(false);
        }
        self.store.set_flag(self.namespace, DURATION_KEY, duration)?;
        Ok(true)
    }

    pub fn remember_volume(&mut self, volume: f32) -> TrackResult<()> {
        self.store.set_flag(self.namespace, VOLUME_KEY, f64::from(volume))
    }

    fn unset_if_present(&mut self, key: &str) -> TrackResult<()> {
        if self.store.get_flag(self.namespace, key).is_some() {
            self.store.unset_flag(self.namespace, key)?;
        }
        Ok(())
    }
}
