//! Logging setup
//!
//! Two sinks share one filter: a console layer on stderr and a plain-text
//! file layer. `RUST_LOG` takes precedence over the configured level.

use std::path::{Path, PathBuf};

use focusguard_domain::constants::PROGRAM_NAME;
use focusguard_domain::{FocusError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;
use crate::errors::InfraError;

/// Keeps the file writer alive; dropping it flushes pending lines.
#[must_use = "dropping the guard stops the file sink"]
pub struct LogGuard {
    _file: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<directory>/focusguard.log`.
pub fn log_file_path(directory: &Path) -> PathBuf {
    directory.join(format!("{PROGRAM_NAME}.log"))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `FocusError::Config` for an invalid level directive,
/// `FocusError::Io` when the directory cannot be created and
/// `FocusError::Internal` when a subscriber is already installed.
pub fn init_logging(config: &LogConfig, directory: &Path) -> Result<LogGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| FocusError::Config(format!("invalid log level '{}': {e}", config.level)))?,
    };

    std::fs::create_dir_all(directory).map_err(InfraError::from)?;
    let path = log_file_path(directory);
    let appender = tracing_appender::rolling::never(directory, format!("{PROGRAM_NAME}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| FocusError::Internal(format!("logging already initialised: {e}")))?;

    tracing::debug!(path = %path.display(), "logging to file");
    Ok(LogGuard { _file: guard, path })
}
