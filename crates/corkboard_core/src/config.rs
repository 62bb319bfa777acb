//! Runtime configuration for hosts embedding the core.
//!
//! Values start from [`CoreConfig::default`] and are overridden by
//! `CORKBOARD_*` environment variables.

use crate::logging::default_log_level;
use crate::model::note::NoteDefaults;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CORKBOARD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CORKBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CORKBOARD_LOG_DIR";
pub const ENV_NOTE_WIDTH: &str = "CORKBOARD_NOTE_WIDTH";
pub const ENV_NOTE_HEIGHT: &str = "CORKBOARD_NOTE_HEIGHT";

const DEFAULT_DB_FILE_NAME: &str = "corkboard.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    NonPositiveSize { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "`{key}` must be a number, got `{value}`")
            }
            Self::NonPositiveSize { key, value } => {
                write!(f, "`{key}` must be greater than zero, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Core configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    pub note_defaults: NoteDefaults,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            note_defaults: NoteDefaults::default(),
        }
    }
}

impl CoreConfig {
    /// Builds configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(width) = read(ENV_NOTE_WIDTH) {
            config.note_defaults.width = parse_size(ENV_NOTE_WIDTH, width)?;
        }
        if let Some(height) = read(ENV_NOTE_HEIGHT) {
            config.note_defaults.height = parse_size(ENV_NOTE_HEIGHT, height)?;
        }
        Ok(config)
    }
}

fn parse_size(key: &'static str, raw: String) -> Result<f64, ConfigError> {
    let value: f64 = raw.parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.clone(),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositiveSize { key, value: raw });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_NOTE_HEIGHT, ENV_NOTE_WIDTH};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.note_defaults.width, 150.0);
        assert_eq!(config.note_defaults.height, 150.0);
    }

    #[test]
    fn environment_overrides_db_path_and_note_size() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/board.db"),
            (ENV_NOTE_HEIGHT, "100"),
            (ENV_NOTE_WIDTH, "  "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/board.db"));
        assert_eq!(config.note_defaults.height, 100.0);
        assert_eq!(config.note_defaults.width, 150.0);
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_NOTE_WIDTH, "wide")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_NOTE_HEIGHT, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveSize { .. }));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: CoreConfig =
            serde_json::from_str(r#"{"note_defaults": {"width": 150.0, "height": 100.0}}"#)
                .unwrap();
        assert_eq!(config.note_defaults.height, 100.0);
        assert_eq!(config.db_path, CoreConfig::default().db_path);
    }
}
