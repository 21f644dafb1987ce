//! Bulk clear - declines or cancels every meeting of a date range

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use focusguard_domain::{DeclineOutcome, EntryHandle, FocusError, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use super::timed;
use crate::calendar_ports::CalendarStore;

/// Outcome of a bulk clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearSummary {
    pub declined: usize,
    pub cancelled: usize,
    pub failures: Vec<EntryFailure>,
    /// Set when the run was cancelled before every entry was handled.
    pub interrupted: bool,
    /// Unrecoverable error that stopped the remaining entries.
    pub aborted: Option<FocusError>,
}

impl ClearSummary {
    /// True when every entry of the range was declined or cancelled.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none() && !self.interrupted
    }
}

/// An entry that could be neither declined nor cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    pub handle: EntryHandle,
    pub subject: String,
    pub error: FocusError,
}

/// Decline every meeting starting in `[from, to)` with `message`; meetings
/// the store refuses to decline (the user organizes them) are cancelled and
/// their attendees notified instead.
///
/// Each entry is attempted once. A failing entry is recorded and the loop
/// moves on; an unrecoverable failure stops the loop and lands in
/// [`ClearSummary::aborted`] next to the counts reached so far.
///
/// # Errors
/// Returns the listing error.
#[instrument(skip(store, message, cancel))]
pub async fn clear_range(
    store: &dyn CalendarStore,
    store_timeout: Duration,
    from: NaiveDate,
    to: NaiveDate,
    message: &str,
    cancel: &CancellationToken,
) -> Result<ClearSummary> {
    let mut summary = ClearSummary::default();
    if to <= from {
        info!(%from, %to, "empty date range, nothing to clear");
        return Ok(summary);
    }

    let start = from.and_time(NaiveTime::MIN);
    let end = to.and_time(NaiveTime::MIN);
    let entries = timed(store_timeout, "list_entries", store.list_entries(start, end)).await?;

    for entry in entries.iter().filter(|entry| entry.start >= start && entry.start < end) {
        if cancel.is_cancelled() {
            warn!("bulk clear cancelled");
            summary.interrupted = true;
            break;
        }

        let outcome =
            timed(store_timeout, "respond_decline", store.respond_decline(entry, message)).await;
        let result = match outcome {
            Ok(DeclineOutcome::Declined) => {
                info!("declining {}: {}", entry.start, entry.subject);
                summary.declined += 1;
                Ok(())
            }
            Ok(DeclineOutcome::NotDeclinable) => {
                let cancelled = timed(
                    store_timeout,
                    "cancel_and_notify",
                    store.cancel_and_notify(entry, message),
                )
                .await;
                if cancelled.is_ok() {
                    info!("canceling {}: {}", entry.start, entry.subject);
                    summary.cancelled += 1;
                }
                cancelled
            }
            Err(err) => Err(err),
        };

        if let Err(error) = result {
            if error.is_unrecoverable() {
                error!(
                    entry = %entry.handle,
                    error = %error,
                    kind = error.label(),
                    "aborting bulk clear"
                );
                summary.aborted = Some(error);
                break;
            }
            warn!(entry = %entry.handle, error = %error, "could not clear entry");
            summary.failures.push(EntryFailure {
                handle: entry.handle.clone(),
                subject: entry.subject.clone(),
                error,
            });
        }
    }

    Ok(summary)
}
