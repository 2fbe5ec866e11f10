//! Runtime configuration.
//!
//! The data directory comes from `--dir` / `VESTIGIUM_HOME`, falling back to
//! `~/.vestigium`. An optional `config.toml` inside it tunes the rest.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::auth::DEFAULT_LOGIN_DELAY;
use crate::error::{Result, VestigiumError};
use crate::fields::CalendarView;
use crate::rewards::DEFAULT_INTERVAL;

pub const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "vestigium.log";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    login_delay_ms: u64,
    default_view: CalendarView,
    reward_interval: u32,
}

impl Default for FileConfig {
    fn default() -> Self {
        FileConfig {
            login_delay_ms: DEFAULT_LOGIN_DELAY.as_millis() as u64,
            default_view: CalendarView::Month,
            reward_interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub login_delay: Duration,
    pub default_view: CalendarView,
    pub reward_interval: u32,
}

impl Config {
    /// Resolve the data directory and read `config.toml` from it if present.
    pub fn load(dir_override: Option<PathBuf>) -> Self {
        let data_dir = dir_override.unwrap_or_else(default_data_dir);
        let file = match read_file_config(&data_dir.join(CONFIG_FILE)) {
            Ok(Some(file)) => file,
            Ok(None) => FileConfig::default(),
            Err(e) => {
                warn!(error = %e, "ignoring config file");
                FileConfig::default()
            }
        };
        Config {
            data_dir,
            login_delay: Duration::from_millis(file.login_delay_ms),
            default_view: file.default_view,
            reward_interval: file.reward_interval.max(1),
        }
    }
}

/// Default log file for the terminal UI, inside the data directory.
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vestigium")
}

fn read_file_config(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    toml::from_str(&raw)
        .map(Some)
        .map_err(|e| VestigiumError::Config(format!("{}: {e}", path.display())))
}
