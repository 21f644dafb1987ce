//! Focus time protection
//!
//! - [`grid`]: slot grid builder
//! - [`reconcile`]: per-day overbooking decision and reconciliation
//! - [`driver`]: lookahead loop, single-run guard and settings application
//! - [`clear`]: bulk decline/cancel of a date range

pub mod clear;
pub mod driver;
pub mod grid;
pub mod reconcile;

use std::future::Future;
use std::time::Duration;

use focusguard_domain::{FocusError, Result};

pub use clear::{ClearSummary, EntryFailure};
pub use driver::{DayFailure, FocusRunner, RunOutcome, RunSummary};
pub use grid::DayOccupationGrid;
pub use reconcile::{day_bounds, plan_day, DayAction, DayPlan, DayReport, FocusReconciler};

/// Await a store call, failing with `FocusError::Timeout` after `limit`.
pub(crate) async fn timed<T, F>(limit: Duration, operation: &'static str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(FocusError::Timeout(format!(
            "calendar store {operation} exceeded {}ms",
            limit.as_millis()
        ))),
    }
}
