//! # FocusGuard App
//!
//! Command-line layer - argument parsing, wiring and the top-level error
//! policy.
//!
//! This crate contains:
//! - The `focusguard` CLI definition
//! - Application context (dependency injection)
//! - Commands: one-shot passes, bulk clear, settings and the daemon
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use cli::{Cli, Command, SettingsCommand};
pub use commands::execute;
pub use context::AppContext;
