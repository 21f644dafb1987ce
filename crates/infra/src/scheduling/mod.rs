//! Scheduling infrastructure for the periodic reconciliation pass
//!
//! The scheduler follows the runtime rules used across this crate:
//! - Explicit lifecycle management (start/stop)
//! - Cancellation token support
//! - Timeout wrapping on all async operations

pub mod error;
pub mod focus_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use focus_scheduler::{FocusScheduler, FocusSchedulerConfig, HourlyPass, ScheduledJob};
