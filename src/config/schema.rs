use std::time::Duration;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/marktrack/config.toml` or `~/.config/marktrack/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MARKTRACK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scheduler: SchedulerSettings,
    pub flags: FlagSettings,
    pub volume: VolumeSettings,
    pub ui: UiSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// How long before the natural end a looping track with only a mark in
    /// is cut, so the resource's own loop (which restarts at 0) never runs.
    pub loop_guard_secs: f64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            loop_guard_secs: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlagSettings {
    /// Document flag namespace holding marks, cached duration and volume.
    pub namespace: String,
}

impl Default for FlagSettings {
    fn default() -> Self {
        Self {
            namespace: "track-tracker".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    /// Volume restored by the mute toggle when none was remembered.
    pub mute_restore: f32,
    /// Duration of the local fade applied when muting (milliseconds).
    pub debounce_ms: u64,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            mute_restore: 0.5,
            debounce_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Interval of the timestamp / tracker refresh (milliseconds).
    pub refresh_interval_ms: u64,
}

impl UiSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the rodio backend checks fades and due schedules (milliseconds).
    pub tick_ms: u64,
}

impl AudioSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { tick_ms: 50 }
    }
}
