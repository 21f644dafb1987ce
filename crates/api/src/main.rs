//! FocusGuard - keeps focus time free on overbooked Outlook days
//!
//! Main entry point of the `focusguard` binary.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use focusguard_app::utils::logging::{error_label, log_command_execution};
use focusguard_app::{execute, Cli};
use focusguard_infra::config;
use focusguard_infra::observability::init_logging;
use tracing::{debug, error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Before loading the configuration so FOCUSGUARD_* overrides from .env apply
    let dotenv = dotenvy::dotenv();

    let loaded = match config::load(cli.config.clone()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("focusguard: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&loaded.config.log, &loaded.config.log_directory()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("focusguard: logging disabled: {err}");
            None
        }
    };

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    let command = cli.command;
    let name = command.name();
    let started = Instant::now();
    let result = execute(command, loaded).await;
    log_command_execution(name, started.elapsed(), result.is_ok());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                command = name,
                kind = error_label(&err),
                error = %format_args!("{err:#}"),
                "command failed"
            );
            eprintln!("focusguard: {err:#}");
            ExitCode::FAILURE
        }
    }
}
