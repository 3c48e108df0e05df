use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::{TrackError, TrackResult};
use crate::host::{AudioResource, PlayOptions, ScheduleId, Seconds, SoundId};
use crate::lifecycle::SoundFactory;

use super::probe::probe_duration;
use super::sink::create_sink_at;
use super::{Tick, TickEvents};

static NEXT_SOUND_ID: AtomicU64 = AtomicU64::new(1);

/// A volume ramp applied on each `tick`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Fade {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    /// Stop the sound once the ramp completes.
    pub then_stop: bool,
}

/// Volume at `elapsed` into `fade`, and whether the fade is complete.
pub(super) fn fade_volume(fade: &Fade, elapsed: Duration) -> (f32, bool) {
    if fade.duration.is_zero() || elapsed >= fade.duration {
        return (fade.to, true);
    }
    let t = elapsed.as_secs_f32() / fade.duration.as_secs_f32();
    (fade.from + (fade.to - fade.from) * t, false)
}

/// Remove and return the schedules due at `now`.
pub(super) fn take_due(schedules: &mut Vec<(ScheduleId, Seconds)>, now: Seconds) -> Vec<ScheduleId> {
    let mut due = Vec::new();
    schedules.retain(|&(id, at)| {
        if at <= now {
            due.push(id);
            false
        } else {
            true
        }
    });
    due
}

/// File-backed `AudioResource` playing through a shared rodio output stream.
///
/// rodio has no playback-clock callbacks, so the owner calls `Tick::tick`
/// periodically to run fades, natural-end loops and due schedules.
pub struct RodioSound {
    id: SoundId,
    path: PathBuf,
    stream: Rc<OutputStream>,
    sink: Option<Sink>,
    loaded: bool,
    looping: bool,
    volume: f32,
    duration: Option<Seconds>,

    // Start time and accumulated offset, as the sink has no seekable clock.
    started_at: Option<Instant>,
    accumulated: Duration,

    schedules: Vec<(ScheduleId, Seconds)>,
    next_schedule: u64,
    fade: Option<(Fade, Instant)>,
}

impl RodioSound {
    pub fn new(path: impl Into<PathBuf>, stream: Rc<OutputStream>) -> Self {
        Self {
            id: SoundId(NEXT_SOUND_ID.fetch_add(1, Ordering::Relaxed)),
            path: path.into(),
            stream,
            sink: None,
            loaded: false,
            looping: false,
            volume: 1.0,
            duration: None,
            started_at: None,
            accumulated: Duration::ZERO,
            schedules: Vec::new(),
            next_schedule: 0,
            fade: None,
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn start_sink(&mut self, offset: Duration, volume: f32) -> TrackResult<()> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let (sink, total) = create_sink_at(&self.stream, &self.path, offset)?;
        if self.duration.is_none() {
            self.duration = total.map(|d| d.as_secs_f64()).filter(|d| *d > 0.0);
        }
        sink.set_volume(volume);
        sink.play();
        self.sink = Some(sink);
        self.accumulated = offset;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn start_fade(&mut self, fade: Fade) {
        if fade.duration.is_zero() {
            if let Some(sink) = &self.sink {
                sink.set_volume(fade.to);
            }
            self.fade = None;
            if fade.then_stop {
                self.halt();
            }
            return;
        }
        self.fade = Some((fade, Instant::now()));
    }

    fn apply_fade(&mut self) {
        let Some((fade, started)) = self.fade else {
            return;
        };
        let (volume, done) = fade_volume(&fade, started.elapsed());
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
        if done {
            self.fade = None;
            if fade.then_stop {
                self.halt();
            }
        }
    }

    /// Drop the sink and every pending schedule.
    fn halt(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.schedules.clear();
        self.fade = None;
    }
}

impl Tick for RodioSound {
    fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        self.apply_fade();

        let finished = self.sink.as_ref().is_some_and(|s| s.empty());
        if finished {
            if self.looping {
                // Natural loop: restart from 0, keep the pending schedules.
                if let Err(e) = self.start_sink(Duration::ZERO, self.volume) {
                    log::warn!("could not loop {:?}: {e}", self.path);
                    self.halt();
                    events.ended = true;
                }
            } else {
                self.halt();
                events.ended = true;
            }
        }

        if let Some(now) = self.current_time().filter(|_| self.sink.is_some()) {
            events.due = take_due(&mut self.schedules, now);
        }
        events
    }
}

impl AudioResource for RodioSound {
    fn id(&self) -> SoundId {
        self.id
    }

    fn loaded(&self) -> bool {
        self.loaded
    }

    fn playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.is_paused() && !s.empty())
    }

    fn current_time(&self) -> Option<Seconds> {
        self.loaded.then(|| self.elapsed().as_secs_f64())
    }

    fn duration(&self) -> Option<Seconds> {
        self.duration
    }

    fn load(&mut self, autoplay: Option<PlayOptions>) -> TrackResult<()> {
        if !self.loaded {
            std::fs::metadata(&self.path)
                .map_err(|e| TrackError::Audio(format!("failed to open {:?}: {e}", self.path)))?;
            self.duration = probe_duration(&self.path);
            self.loaded = true;
            log::debug!("loaded {:?} ({:?}s)", self.path, self.duration);
        }
        match autoplay {
            Some(options) => self.play(options),
            None => Ok(()),
        }
    }

    fn play(&mut self, options: PlayOptions) -> TrackResult<()> {
        if !self.loaded {
            return Err(TrackError::NotLoaded);
        }
        self.halt();

        let offset = options
            .offset
            .filter(|o| o.is_finite() && *o > 0.0)
            .map_or(Duration::ZERO, Duration::from_secs_f64);
        let fading = !options.fade.is_zero();
        self.start_sink(offset, if fading { 0.0 } else { options.volume })?;
        self.looping = options.looping;
        self.volume = options.volume;
        if fading {
            self.start_fade(Fade {
                from: 0.0,
                to: options.volume,
                duration: options.fade,
                then_stop: false,
            });
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.halt();
    }

    fn fade(&mut self, volume: f32, duration: Duration) {
        let from = self.sink.as_ref().map_or(self.volume, |s| s.volume());
        self.volume = volume;
        self.start_fade(Fade {
            from,
            to: volume,
            duration,
            then_stop: false,
        });
    }

    fn fade_out(&mut self, duration: Duration) {
        let from = self.sink.as_ref().map_or(self.volume, |s| s.volume());
        // No new schedule may fire while the tail fades.
        self.schedules.clear();
        self.start_fade(Fade {
            from,
            to: 0.0,
            duration,
            then_stop: true,
        });
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

/// Builds `RodioSound`s on one shared output stream.
pub struct RodioFactory {
    stream: Rc<OutputStream>,
}

impl RodioFactory {
    pub fn open_default() -> TrackResult<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| TrackError::Audio(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);
        Ok(Self {
            stream: Rc::new(stream),
        })
    }
}

impl SoundFactory for RodioFactory {
    type Sound = RodioSound;

    fn create(&mut self, path: &str) -> TrackResult<RodioSound> {
        Ok(RodioSound::new(path, Rc::clone(&self.stream)))
    }
}
