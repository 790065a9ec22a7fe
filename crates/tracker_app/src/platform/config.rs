use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tracker_engine::DispatchSettings;

use super::logging::LogDestination;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "tracker.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Holds `storage.json` and `tracker.log`.
    pub data_dir: PathBuf,
    /// Pause after injecting the extractor before asking the page again.
    pub grace_ms: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
    /// Register the extractor as pages load, like a declared content script.
    pub attach_on_load: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("tracker_data"),
            grace_ms: 500,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
            attach_on_load: false,
        }
    }
}

impl TrackerConfig {
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            grace: Duration::from_millis(self.grace_ms),
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::Info)
    }
}

/// Reads the config file. An explicit path must exist; without one, the
/// default file is used when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TrackerConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !fallback.is_file() {
                return Ok(TrackerConfig::default());
            }
            fallback
        }
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(text: &str) -> anyhow::Result<TrackerConfig> {
    Ok(ron::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = parse_config("(grace_ms: 250, log_destination: Both)").unwrap();
        assert_eq!(config.grace_ms, 250);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.data_dir, PathBuf::from("tracker_data"));
        assert!(!config.attach_on_load);
        assert_eq!(config.dispatch_settings().grace, Duration::from_millis(250));
    }

    #[test]
    fn unknown_level_means_info() {
        let config = TrackerConfig {
            log_level: "chatty".into(),
            ..TrackerConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);
        let config = TrackerConfig {
            log_level: "debug".into(),
            ..TrackerConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn explicit_config_file_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.ron");
        fs::write(&path, r#"(data_dir: "/tmp/jobs", attach_on_load: true)"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/jobs"));
        assert!(config.attach_on_load);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.ron"))).is_err());
    }
}
