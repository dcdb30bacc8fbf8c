use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_HISTORY_FILE: &str = "data/history.json";
pub const DEFAULT_MAX_RECORDS: usize = 50;
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_EVENT_BUFFER: usize = 100;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Where the record list is persisted.
    #[serde(alias = "HISTORY_FILE")]
    pub history_file: PathBuf,

    #[serde(alias = "MAX_RECORDS")]
    pub max_records: usize,

    /// Bounded wait for the consumption loop to acknowledge `stop()`.
    #[serde(alias = "STOP_TIMEOUT_MS")]
    pub stop_timeout_ms: u64,

    #[serde(alias = "EVENT_BUFFER")]
    pub event_buffer: usize,

    /// Explicit roots. Empty means "discover mounted volumes".
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    #[serde(default)]
    pub extra_exclusions: Vec<String>,

    #[serde(default, alias = "IGNORE_FILE")]
    pub ignore_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            max_records: DEFAULT_MAX_RECORDS,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
            event_buffer: DEFAULT_EVENT_BUFFER,
            roots: Vec::new(),
            extra_exclusions: Vec::new(),
            ignore_file: None,
        }
    }
}

impl AppConfig {
    /// Load from `filetracker.*` in the working directory plus `FILETRACKER_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Same as [`AppConfig::load`] but with an explicit config file, which must exist.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        // .env is optional; a missing one is the common case
        let _ = dotenvy::dotenv();

        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("filetracker").required(false),
        };

        let builder = Config::builder()
            .set_default("history_file", DEFAULT_HISTORY_FILE)?
            .set_default("max_records", DEFAULT_MAX_RECORDS as u64)?
            .set_default("stop_timeout_ms", DEFAULT_STOP_TIMEOUT_MS)?
            .set_default("event_buffer", DEFAULT_EVENT_BUFFER as u64)?
            .add_source(file_source)
            .add_source(Environment::with_prefix("FILETRACKER"));

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.history_file = crate::path_utils::get_path(&config.history_file.to_string_lossy());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == 0 {
            return Err(ConfigError::Message("max_records must be at least 1".into()));
        }
        if self.event_buffer == 0 {
            return Err(ConfigError::Message("event_buffer must be at least 1".into()));
        }
        Ok(())
    }

    pub fn stop_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stop_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.history_file, PathBuf::from("data/history.json"));
        assert_eq!(config.max_records, 50);
        assert_eq!(config.stop_timeout(), std::time::Duration::from_secs(3));
        assert!(config.roots.is_empty());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filetracker.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "max_records = 7").unwrap();
        writeln!(file, "extra_exclusions = [\"node_modules\"]").unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.max_records, 7);
        assert_eq!(config.extra_exclusions, vec!["node_modules".to_string()]);
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn zero_max_records_is_rejected() {
        let config = AppConfig {
            max_records: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
