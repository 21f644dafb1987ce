//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Start from the built-in defaults
//! 2. Overlay the first config file found (explicit path, or probed)
//! 3. Overlay `FOCUSGUARD_*` environment variables
//! 4. Validate the result
//!
//! Saving writes back only what came from defaults and the file, so values
//! injected through the environment (tokens in particular) never end up on
//! disk.
//!
//! ## Environment Variables
//! - `FOCUSGUARD_<SETTING>`: any focus setting, e.g. `FOCUSGUARD_FREE_SLOTS`
//! - `FOCUSGUARD_OUTLOOK_BASE_URL`: Graph endpoint
//! - `FOCUSGUARD_OUTLOOK_ACCESS_TOKEN`: bearer token
//! - `FOCUSGUARD_OUTLOOK_TIMEOUT_SECS`: request timeout in seconds
//! - `FOCUSGUARD_LOG_LEVEL`: log filter directive
//! - `FOCUSGUARD_LOG_DIR`: log file directory
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./focusguard.toml` or `./focusguard.json` (current working directory)
//! 2. `$HOME/focusguard/focusguard.toml` or `.json`
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use focusguard_domain::constants::PROGRAM_NAME;
use focusguard_domain::{FocusError, Result, SettingKey};

use super::{data_dir, Config};
use crate::errors::InfraError;

const ENV_PREFIX: &str = "FOCUSGUARD_";

/// Configuration together with where it is persisted.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Effective configuration, environment overrides applied.
    pub config: Config,
    /// File the configuration is saved to.
    pub path: PathBuf,
    /// False when no file existed and defaults were used.
    pub from_file: bool,
    persisted: Config,
}

impl LoadedConfig {
    /// Change one focus setting in both the effective and the persisted
    /// configuration.
    ///
    /// # Errors
    /// Returns `FocusError::InvalidInput` when the value is rejected; nothing
    /// is changed in that case.
    pub fn update_setting(&mut self, key: SettingKey, value: &str) -> Result<()> {
        let mut persisted = self.persisted.focus.clone();
        persisted.set(key, value)?;
        self.config.focus.set(key, value)?;
        self.persisted.focus = persisted;
        Ok(())
    }

    /// Write the persisted configuration back to [`LoadedConfig::path`].
    ///
    /// # Errors
    /// Returns `FocusError::Io` or `FocusError::Config` when writing fails.
    pub fn save(&mut self) -> Result<()> {
        save_to_file(&self.persisted, &self.path)?;
        self.from_file = true;
        Ok(())
    }
}

/// Load configuration with the full fallback strategy.
///
/// An explicit `path` that does not exist yet is not an error: defaults are
/// used and the file is created on the first save.
///
/// # Errors
/// Returns `FocusError::Config` if a file is unreadable or invalid, an
/// environment variable does not parse, or validation fails.
pub fn load(path: Option<PathBuf>) -> Result<LoadedConfig> {
    let (persisted, path, from_file) = match path.or_else(probe_config_paths) {
        Some(path) if path.exists() => (load_from_file(&path)?, path, true),
        Some(path) => {
            tracing::info!(path = %path.display(), "Config file does not exist yet, using defaults");
            (Config::default(), path, false)
        }
        None => {
            let path = default_config_path();
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            (Config::default(), path, false)
        }
    };

    let mut config = persisted.clone();
    apply_env_overrides(&mut config)?;
    config.validate()?;

    Ok(LoadedConfig { config, path, from_file, persisted })
}

/// Load configuration from a file.
///
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `FocusError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(FocusError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| FocusError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

/// Write `config` to `path` in the format its extension names, creating
/// parent directories as needed.
///
/// # Errors
/// Returns `FocusError::Io` when the file cannot be written and
/// `FocusError::Config` for an unsupported extension.
pub fn save_to_file(config: &Config, path: &Path) -> Result<()> {
    let contents = match extension_of(path) {
        "toml" => toml::to_string_pretty(config).map_err(InfraError::from)?,
        "json" => serde_json::to_string_pretty(config).map_err(InfraError::from)?,
        other => {
            return Err(FocusError::Config(format!("Unsupported config format: {other}")));
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(InfraError::from)?;
    }
    std::fs::write(path, contents).map_err(InfraError::from)?;

    tracing::info!(path = %path.display(), "Configuration saved");
    Ok(())
}

/// Parse configuration from string content.
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match extension_of(path) {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FocusError::Config(format!("Invalid JSON format: {e}"))),
        other => Err(FocusError::Config(format!("Unsupported config format: {other}"))),
    }
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

/// Overlay `FOCUSGUARD_*` environment variables onto `config`.
///
/// Unset and empty variables are ignored.
///
/// # Errors
/// Returns `FocusError::Config` naming the variable whose value is invalid.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    for key in SettingKey::ALL {
        let name = format!("{ENV_PREFIX}{}", key.to_string().to_ascii_uppercase());
        if let Some(value) = env_var(&name) {
            config
                .focus
                .set(key, &value)
                .map_err(|e| FocusError::Config(format!("{name}: {e}")))?;
        }
    }

    if let Some(base_url) = env_var("FOCUSGUARD_OUTLOOK_BASE_URL") {
        config.outlook.base_url = base_url;
    }
    if let Some(token) = env_var("FOCUSGUARD_OUTLOOK_ACCESS_TOKEN") {
        config.outlook.access_token = Some(token);
    }
    if let Some(timeout) = env_var("FOCUSGUARD_OUTLOOK_TIMEOUT_SECS") {
        config.outlook.request_timeout_secs = timeout.parse::<u64>().map_err(|e| {
            FocusError::Config(format!("Invalid FOCUSGUARD_OUTLOOK_TIMEOUT_SECS: {e}"))
        })?;
    }
    if let Some(level) = env_var("FOCUSGUARD_LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(dir) = env_var("FOCUSGUARD_LOG_DIR") {
        config.log.directory = Some(PathBuf::from(dir));
    }

    Ok(())
}

/// Where the configuration is saved when no file exists anywhere.
pub fn default_config_path() -> PathBuf {
    data_dir().join(format!("{PROGRAM_NAME}.toml"))
}

/// Probe multiple paths for configuration files.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let file_names = [format!("{PROGRAM_NAME}.toml"), format!("{PROGRAM_NAME}.json")];
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs.push(data_dir());
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| file_names.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
