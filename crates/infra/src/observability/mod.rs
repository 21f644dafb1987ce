//! Observability infrastructure
//!
//! Structured logging through `tracing`, written to the console and to a
//! log file in the data directory.

pub mod logging;

pub use logging::{init_logging, log_file_path, LogGuard};
