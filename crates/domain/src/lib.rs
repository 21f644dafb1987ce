//! # FocusGuard Domain
//!
//! Business domain types and models for FocusGuard.
//!
//! This crate contains:
//! - Half-hour slot model, work window and overbooking thresholds
//! - Calendar entry snapshots exchanged with the calendar store
//! - User settings and the focus policy derived from them
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other FocusGuard crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
