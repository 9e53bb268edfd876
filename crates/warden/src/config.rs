//! Top-level configuration: one JSON document for every layer.
//!
//! ```json
//! {
//!   "tick":      { "interval_ms": 1000, "policy": "skip" },
//!   "sessions":  { "reap_interval_secs": 60 },
//!   "afk":       { "afk_minutes": 3, "afk_kick_minutes": 60 },
//!   "cooldowns": { "commands": { "home": { "cooldown": 30 } } }
//! }
//! ```
//!
//! Every section and every field is optional; missing values take their
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warden_afk::AfkConfig;
use warden_cooldown::CooldownConfig;
use warden_session::SessionConfig;
use warden_tick::TickConfig;

/// Errors from loading or validating a [`WardenConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config parsed but a value cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for every Warden layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// The sweep driver (AFK then cooldowns).
    pub tick: TickConfig,
    /// Reaping.
    pub sessions: SessionConfig,
    pub afk: AfkConfig,
    pub cooldowns: CooldownConfig,
}

impl WardenConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Clamps every section and rejects values that cannot be clamped.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if AFK list names would be empty.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.afk.idle_name_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "afk.idle_name_max_chars must be at least 1".into(),
            ));
        }
        Ok(Self {
            tick: self.tick.validated(),
            sessions: self.sessions,
            afk: self.afk.validated(),
            cooldowns: self.cooldowns.validated(),
        })
    }

    /// Tick config for the reaper driver, derived from
    /// `sessions.reap_interval_secs` (0 = never reap).
    pub(crate) fn reaper_tick(&self) -> TickConfig {
        let interval = self.sessions.reap_interval();
        if interval.is_zero() {
            return TickConfig::manual();
        }
        TickConfig {
            initial_jitter_us: self.tick.initial_jitter_us,
            ..TickConfig::with_interval(interval)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_from_json_str_empty_object_is_default() {
        let config = WardenConfig::from_json_str("{}").unwrap();
        assert_eq!(config.tick.interval(), Some(Duration::from_secs(1)));
        assert_eq!(config.sessions.reap_interval(), Duration::from_secs(60));
        assert_eq!(config.afk.afk_minutes, 3);
        assert_eq!(config.cooldowns, CooldownConfig::default());
    }

    #[test]
    fn test_from_json_str_partial_sections() {
        let config = WardenConfig::from_json_str(
            r#"{
                "afk": { "afk_kick_minutes": 0 },
                "cooldowns": { "commands": { "home": { "cooldown": 30 } } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.afk.afk_kick_minutes, 0);
        assert_eq!(config.afk.afk_minutes, 3);
        assert_eq!(config.cooldowns.cooldown_for("home"), Some(30));
        assert_eq!(config.cooldowns.cooldown_for("command-with-cooldown"), None);
    }

    #[test]
    fn test_from_json_str_bad_json_is_parse_error() {
        let err = WardenConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = WardenConfig::load("/definitely/not/here/warden.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("warden.json"));
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("warden-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "sessions": { "reap_interval_secs": 5 } }"#).unwrap();

        let config = WardenConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.sessions.reap_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_validated_rejects_zero_name_length() {
        let mut config = WardenConfig::default();
        config.afk.idle_name_max_chars = 0;

        assert!(matches!(config.validated(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validated_clamps_sections() {
        let mut config = WardenConfig::default();
        config.tick.interval_ms = 1;
        config.afk.afk_minutes = 0;

        let config = config.validated().unwrap();

        assert_eq!(config.tick.interval_ms, TickConfig::MIN_INTERVAL_MS);
        assert_eq!(config.afk.afk_minutes, 1);
    }

    #[test]
    fn test_reaper_tick_zero_interval_is_manual() {
        let mut config = WardenConfig::default();
        config.sessions.reap_interval_secs = 0;

        assert_eq!(config.reaper_tick().interval(), None);
    }
}
