//! Bulk decline / cancel of a date range

use chrono::NaiveDate;
use focusguard_core::{ClearSummary, RunOutcome};
use focusguard_domain::Result;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Decline or cancel every meeting starting in `[from, to)`.
///
/// Skipped when a pass is already running in this or another process. An
/// unrecoverable per-meeting error stops the run and is reported in
/// [`ClearSummary::aborted`].
///
/// # Errors
/// Returns the listing error.
pub async fn empty_now(
    ctx: &AppContext,
    from: NaiveDate,
    to: NaiveDate,
    message: &str,
    cancel: &CancellationToken,
) -> Result<RunOutcome<ClearSummary>> {
    match ctx.runner.empty_now(from, to, message, cancel).await {
        RunOutcome::Completed(result) => result.map(RunOutcome::Completed),
        RunOutcome::Skipped => Ok(RunOutcome::Skipped),
    }
}
