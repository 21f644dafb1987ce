//! Command-line definition

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use focusguard_domain::SettingKey;

/// Keeps focus time free on overbooked Outlook days.
#[derive(Debug, Parser)]
#[command(name = "focusguard", version)]
pub struct Cli {
    /// Settings file (TOML or JSON); probed locations are used when omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run a startup pass, then hourly passes while `each_hour` is on,
    /// until Ctrl-C.
    Run,
    /// Reconcile focus blocks over the lookahead window once.
    BlockNow,
    /// Decline or cancel every meeting in [from, to) and notify attendees.
    EmptyNow {
        /// First day to clear (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// Day after the last one to clear (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// Comment sent with every decline and cancellation.
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Show or edit the persisted settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Change one setting and save the file, e.g. `set free_slots 4`.
    Set { key: SettingKey, value: String },
}

impl Command {
    /// Stable identifier used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::BlockNow => "block_now",
            Self::EmptyNow { .. } => "empty_now",
            Self::Settings { action: SettingsCommand::Show } => "settings_show",
            Self::Settings { action: SettingsCommand::Set { .. } } => "settings_set",
        }
    }
}
