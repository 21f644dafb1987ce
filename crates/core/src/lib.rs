//! # FocusGuard Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The calendar store and pass lock ports (traits)
//! - Slot grid builder and reconciliation engine
//! - Day loop driver and bulk clear
//!
//! ## Architecture Principles
//! - Only depends on `focusguard-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar_ports;
pub mod focus;

// Re-export specific items to avoid ambiguity
pub use calendar_ports::{CalendarStore, PassGuard, PassLock};
pub use focus::{
    ClearSummary, DayAction, DayOccupationGrid, DayPlan, DayReport, FocusReconciler, FocusRunner,
    RunOutcome, RunSummary,
};
