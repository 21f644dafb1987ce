//! Manual reconciliation pass

use focusguard_core::{RunOutcome, RunSummary};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::context::AppContext;

/// Reconcile the lookahead window starting today.
///
/// Skipped when a pass is already running in this or another process.
/// Per-day failures and an aborted pass are reported in the summary.
pub async fn block_now(ctx: &AppContext, cancel: &CancellationToken) -> RunOutcome<RunSummary> {
    let today = ctx.today();
    info!(%today, "block now requested");
    ctx.runner.block_now(today, cancel).await
}
