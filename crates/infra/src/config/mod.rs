//! Configuration loading and management
//!
//! The configuration file holds the user's focus settings next to the
//! Outlook adapter and logging sections:
//!
//! ```toml
//! [focus]
//! start_of_day = "08:30"
//! end_of_day = "17:30"
//! free_slots = 6
//!
//! [outlook]
//! access_token = "..."
//!
//! [log]
//! level = "info"
//! ```
//!
//! Every section and key is optional; missing values take their defaults.

pub mod loader;

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use focusguard_domain::constants::{DEFAULT_STORE_TIMEOUT_SECS, PROGRAM_NAME};
use focusguard_domain::{FocusError, FocusSettings, Result};
use serde::{Deserialize, Serialize};

// Re-export commonly used items
pub use loader::{
    apply_env_overrides, default_config_path, load, load_from_file, probe_config_paths,
    save_to_file, LoadedConfig,
};

/// Microsoft Graph v1.0 endpoint.
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub focus: FocusSettings,
    pub outlook: OutlookConfig,
    pub log: LogConfig,
}

/// Settings of the Graph calendar adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlookConfig {
    pub base_url: String,
    /// Bearer token; acquiring it is left to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Per-request timeout, also used as the store call timeout.
    pub request_timeout_secs: u64,
}

impl Default for OutlookConfig {
    fn default() -> Self {
        Self {
            base_url: GRAPH_API_BASE.to_string(),
            access_token: None,
            request_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` wins over it.
    pub level: String,
    /// Directory of the log file, the data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), directory: None }
    }
}

impl Config {
    /// Check every section.
    ///
    /// # Errors
    /// Returns `FocusError::Config` naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.focus.validate().map_err(|err| FocusError::Config(err.to_string()))?;
        self.time_zone()?;
        if self.outlook.base_url.trim().is_empty() {
            return Err(FocusError::Config("outlook.base_url must not be empty".into()));
        }
        if self.outlook.request_timeout_secs == 0 {
            return Err(FocusError::Config("outlook.request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// The calendar's time zone.
    ///
    /// # Errors
    /// Returns `FocusError::Config` for names outside the IANA database.
    pub fn time_zone(&self) -> Result<Tz> {
        parse_time_zone(&self.focus.time_zone)
    }

    pub fn log_directory(&self) -> PathBuf {
        self.log.directory.clone().unwrap_or_else(data_dir)
    }
}

/// Parse an IANA zone name such as `Europe/Brussels`.
///
/// # Errors
/// Returns `FocusError::Config` when the name is unknown.
pub fn parse_time_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| FocusError::Config(format!("unknown time zone '{name}'")))
}

/// Today's date on the calendar's wall clock.
pub fn today_in(zone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&zone).date_naive()
}

/// `$HOME/focusguard`, where the settings file, the log and the PID file
/// live by default.
pub fn data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(PROGRAM_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.outlook.base_url, GRAPH_API_BASE);
        assert_eq!(config.time_zone().unwrap(), Tz::UTC);
    }

    #[test]
    fn unknown_time_zone_is_a_config_error() {
        let mut config = Config::default();
        config.focus.time_zone = "Mars/Olympus".into();
        assert!(matches!(config.validate(), Err(FocusError::Config(_))));
    }

    #[test]
    fn empty_focus_string_is_a_config_error() {
        let mut config = Config::default();
        config.focus.focus_string = String::new();
        assert!(matches!(config.validate(), Err(FocusError::Config(_))));
    }

    #[test]
    fn named_zone_parses() {
        assert_eq!(parse_time_zone(" Europe/Brussels ").unwrap(), chrono_tz::Europe::Brussels);
    }

    #[test]
    fn log_directory_defaults_to_data_dir() {
        let mut config = Config::default();
        assert_eq!(config.log_directory(), data_dir());
        config.log.directory = Some(PathBuf::from("/var/log/focusguard"));
        assert_eq!(config.log_directory(), PathBuf::from("/var/log/focusguard"));
    }
}
