use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Layer `MARKTRACK__*` variables over the config file, if any.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MARKTRACK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the scheduler and drivers cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let guard = self.scheduler.loop_guard_secs;
        if !guard.is_finite() || guard <= 0.0 {
            return Err("scheduler.loop_guard_secs must be > 0".to_string());
        }
        if self.flags.namespace.trim().is_empty() {
            return Err("flags.namespace must not be empty".to_string());
        }
        let restore = self.volume.mute_restore;
        if !(restore > 0.0 && restore <= 1.0) {
            return Err("volume.mute_restore must be in (0, 1]".to_string());
        }
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        if self.ui.refresh_interval_ms == 0 {
            return Err("ui.refresh_interval_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Load settings, falling back to defaults when loading or validation fails.
///
/// Configuration is optional; a broken file never prevents playback.
pub fn load_settings() -> Settings {
    match Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                log::warn!("marktrack: invalid config, using defaults: {msg}");
                Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            log::warn!("marktrack: failed to load config, using defaults: {e}");
            Settings::default()
        }
    }
}

/// Resolve the config path from `MARKTRACK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MARKTRACK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/marktrack/config.toml`
/// or `~/.config/marktrack/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("marktrack").join("config.toml"))
}
