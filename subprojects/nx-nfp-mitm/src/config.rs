//! Harness configuration, loaded from TOML.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::input::{Keys, ParseKeyError};

/// Harness configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tag image file
    pub tag_path: PathBuf,
    /// Log file, opened for append
    pub log_path: PathBuf,
    /// Tracing filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Input monitor polling period
    pub poll_interval_ms: u64,
    /// Button names that emulate a tag tap when pressed together
    pub trigger_keys: Vec<String>,
    /// Maximum number of concurrently open client sessions
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_path: PathBuf::from(nx_amiibo::store::FileTagStore::DEFAULT_PATH),
            log_path: PathBuf::from("nfp_log.log"),
            log_filter: "info".to_owned(),
            poll_interval_ms: 100,
            trigger_keys: vec!["L".to_owned(), "R".to_owned()],
            max_sessions: 4,
        }
    }
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs_err::read_to_string(path.as_ref()).map_err(ConfigError::Read)?;
        Self::from_toml(&text)
    }

    /// Parses and validates a configuration document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field values that the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::ZeroSessions);
        }
        if self.trigger_combo()?.is_empty() {
            return Err(ConfigError::EmptyTriggerKeys);
        }
        Ok(())
    }

    /// Returns the trigger key combination.
    pub fn trigger_combo(&self) -> Result<Keys, ParseKeyError> {
        Keys::from_names(&self.trigger_keys)
    }

    /// Returns the input monitor polling period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Error returned when a configuration cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Read(#[source] io::Error),
    #[error("invalid config file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid trigger key")]
    TriggerKey(#[from] ParseKeyError),
    #[error("trigger_keys must name at least one button")]
    EmptyTriggerKeys,
    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,
    #[error("max_sessions must be greater than zero")]
    ZeroSessions,
}
