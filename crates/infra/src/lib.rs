//! # FocusGuard Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Microsoft Graph calendar store
//! - Configuration loading and saving
//! - The hourly scheduler
//! - Logging setup, the single-instance lock and the pass lock
//!
//! ## Architecture
//! - Implements traits defined in `focusguard-core`
//! - Contains all "impure" code (I/O, HTTP, clocks)

pub mod config;
pub mod errors;
pub mod instance_lock;
pub mod integrations;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use config::{Config, LoadedConfig, LogConfig, OutlookConfig};
pub use errors::InfraError;
pub use instance_lock::{FilePassLock, InstanceLock, LockAttempt};
pub use integrations::outlook::GraphCalendarStore;
pub use scheduling::{FocusScheduler, FocusSchedulerConfig, HourlyPass, ScheduledJob};
