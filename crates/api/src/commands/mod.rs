//! Commands - CLI entry points into the application

mod block;
mod clear;
mod daemon;
mod settings;

use std::sync::Arc;

use anyhow::{bail, Context};
pub use block::block_now;
pub use clear::empty_now;
pub use daemon::run_daemon;
use focusguard_core::RunOutcome;
use focusguard_infra::config::data_dir;
use focusguard_infra::{FocusSchedulerConfig, LoadedConfig};
pub use settings::{set_setting, show_settings};
use tokio_util::sync::CancellationToken;

use crate::cli::{Command, SettingsCommand};
use crate::context::AppContext;
use crate::utils::report;

const SKIPPED: &str = "another pass is running; nothing done";

/// Run one parsed command to completion.
///
/// # Errors
/// Returns the command's error with context; a pass that left days or
/// meetings unhandled is an error too. A skipped pass is not.
pub async fn execute(command: Command, loaded: LoadedConfig) -> anyhow::Result<()> {
    match command {
        Command::Settings { action: SettingsCommand::Show } => {
            println!("# {}", loaded.path.display());
            println!("{}", show_settings(&loaded));
        }
        Command::Settings { action: SettingsCommand::Set { key, value } } => {
            let mut loaded = loaded;
            let policy = set_setting(&mut loaded, key, &value)
                .with_context(|| format!("cannot set {key}"))?;
            println!("{key} = {}", loaded.config.focus.get(key));
            println!("{}", report::policy(&policy));
        }
        Command::BlockNow => {
            let ctx = AppContext::new(loaded, &data_dir())
                .context("cannot connect to the calendar")?;
            let RunOutcome::Completed(summary) = block_now(&ctx, &CancellationToken::new()).await
            else {
                println!("{SKIPPED}");
                return Ok(());
            };
            println!("{}", report::run_summary(&summary));
            if let Some(err) = &summary.aborted {
                return Err(anyhow::Error::new(err.clone()).context("pass aborted"));
            }
            if !summary.is_clean() {
                bail!("{} day(s) could not be reconciled", summary.failures.len());
            }
        }
        Command::EmptyNow { from, to, message } => {
            let ctx = AppContext::new(loaded, &data_dir())
                .context("cannot connect to the calendar")?;
            let outcome = empty_now(&ctx, from, to, &message, &CancellationToken::new())
                .await
                .with_context(|| format!("emptying calendar from {from} to {to}"))?;
            let RunOutcome::Completed(summary) = outcome else {
                println!("{SKIPPED}");
                return Ok(());
            };
            println!("{}", report::clear_summary(&summary));
            if let Some(err) = &summary.aborted {
                return Err(anyhow::Error::new(err.clone()).context("bulk clear aborted"));
            }
            if !summary.failures.is_empty() {
                bail!("{} meeting(s) could not be declined or cancelled", summary.failures.len());
            }
        }
        Command::Run => {
            let lock_dir = data_dir();
            let ctx = Arc::new(
                AppContext::new(loaded, &lock_dir).context("cannot connect to the calendar")?,
            );
            run_daemon(ctx, &lock_dir, FocusSchedulerConfig::default(), shutdown_signal())
                .await
                .context("daemon stopped with an error")?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for Ctrl-C; stopping");
    }
}
