//! Tracker configuration. Tracked names come from the command line, not from here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "PROC_TRACKER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "proc-tracker.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory holding `<name>.csv` logs, relative to the working directory
    pub log_dir: PathBuf,
    /// Delay between the end of one cycle and the start of the next (seconds)
    pub period_secs: u64,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            period_secs: 5,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TrackerConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<TrackerConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }

    /// Config file path from the environment, or the default name.
    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}
