//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/playstats/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/playstats/` (~/.config/playstats/)
//! - State/Logs: `$XDG_STATE_HOME/playstats/` (~/.local/state/playstats/)

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Rotated log files are named `<prefix>.<YYYY-MM-DD>.<suffix>`.
pub const LOG_PREFIX: &str = "playstats";
pub const LOG_SUFFIX: &str = "log";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report shape
    #[serde(default)]
    pub report: ReportConfig,

    /// Where history files are found
    #[serde(default)]
    pub input: InputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ranking caps for report generation
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Length of each top list (songs by plays/time/skips, artists)
    #[serde(default = "default_top_count")]
    pub top_count: usize,

    /// Songs listed per month in the monthly top table
    #[serde(default = "default_monthly_top_count")]
    pub monthly_top_count: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_count: default_top_count(),
            monthly_top_count: default_monthly_top_count(),
        }
    }
}

impl ReportConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.top_count == 0 {
            return Err(Error::Config(
                "report.top_count must be at least 1".to_string(),
            ));
        }
        if self.monthly_top_count == 0 {
            return Err(Error::Config(
                "report.monthly_top_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_top_count() -> usize {
    10
}

fn default_monthly_top_count() -> usize {
    3
}

/// History file discovery
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Directory searched when no paths are given on the command line
    pub history_dir: Option<PathBuf>,

    /// Glob pattern for history files inside a directory
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            history_dir: None,
            file_pattern: default_file_pattern(),
        }
    }
}

fn default_file_pattern() -> String {
    "Streaming_History_Audio_*.json".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.report.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/playstats/config.toml` (~/.config/playstats/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("playstats").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/playstats/` (~/.local/state/playstats/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("playstats")
    }

    /// Log file written on `date` (UTC)
    ///
    /// `$XDG_STATE_HOME/playstats/playstats.YYYY-MM-DD.log`
    pub fn log_path(date: NaiveDate) -> PathBuf {
        let name = format!("{}.{}.{}", LOG_PREFIX, date.format("%Y-%m-%d"), LOG_SUFFIX);
        Self::state_dir().join(name)
    }
}
