//! Infrastructure error handling
//!
//! External error types are turned into [`FocusError`] here so adapters can
//! use `?` on reqwest, io and parser results.
//!
//! [`FocusError`]: focusguard_domain::FocusError

pub mod conversions;

pub use conversions::{status_error, InfraError};
