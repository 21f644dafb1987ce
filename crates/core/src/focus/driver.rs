//! Day loop driver - the single entry point every trigger goes through
//!
//! Startup, the hourly scheduler and manual commands all call into one
//! [`FocusRunner`]. A trigger that arrives while another pass is still in
//! progress is dropped, never interleaved. With a [`PassLock`] attached the
//! same holds for passes started by other processes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use focusguard_domain::{FocusError, FocusPolicy, FocusSettings};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::clear::{clear_range, ClearSummary};
use super::reconcile::{DayReport, FocusReconciler};
use crate::calendar_ports::{CalendarStore, PassGuard, PassLock};

/// Result of a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<T> {
    Completed(T),
    /// Another pass was already running, here or in another process.
    Skipped,
}

impl<T> RunOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Skipped => None,
        }
    }
}

/// A day whose reconciliation failed without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayFailure {
    pub date: NaiveDate,
    pub error: FocusError,
}

/// What a lookahead pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub first_day: NaiveDate,
    pub days: Vec<DayReport>,
    pub failures: Vec<DayFailure>,
    /// Unrecoverable error that stopped the remaining days.
    pub aborted: Option<FocusError>,
    pub cancelled: bool,
}

impl RunSummary {
    fn new(first_day: NaiveDate) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            first_day,
            days: Vec::new(),
            failures: Vec::new(),
            aborted: None,
            cancelled: false,
        }
    }

    pub fn created(&self) -> usize {
        self.days.iter().map(|day| day.created).sum()
    }

    pub fn deleted(&self) -> usize {
        self.days.iter().map(|day| day.deleted).sum()
    }

    /// True when every day of the window was reconciled.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none() && !self.cancelled
    }
}

/// Runs reconciliation passes and bulk clears, one at a time.
pub struct FocusRunner {
    reconciler: FocusReconciler,
    policy: RwLock<FocusPolicy>,
    running: Mutex<()>,
    pass_lock: Option<Arc<dyn PassLock>>,
}

impl FocusRunner {
    pub fn new(store: Arc<dyn CalendarStore>, settings: &FocusSettings) -> Self {
        Self {
            reconciler: FocusReconciler::new(store),
            policy: RwLock::new(FocusPolicy::from_settings(settings)),
            running: Mutex::new(()),
            pass_lock: None,
        }
    }

    /// Also hold `lock` for the duration of every pass.
    pub fn with_pass_lock(mut self, lock: Arc<dyn PassLock>) -> Self {
        self.pass_lock = Some(lock);
        self
    }

    /// Limit applied to every single store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.reconciler = self.reconciler.with_store_timeout(store_timeout);
        self
    }

    /// Replace the policy with one derived from `settings`.
    ///
    /// A pass already in progress keeps the policy it started with.
    pub fn apply_settings(&self, settings: &FocusSettings) -> FocusPolicy {
        let policy = FocusPolicy::from_settings(settings);
        info!(
            start_slot = policy.window.start_slot,
            end_slot = policy.window.end_slot,
            max_occupied_slots = policy.thresholds.max_occupied_slots,
            lookahead_days = policy.lookahead_days,
            "settings applied"
        );
        *self.policy.write() = policy.clone();
        policy
    }

    pub fn policy(&self) -> FocusPolicy {
        self.policy.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// `Ok(None)` when another process holds the pass lock.
    fn claim_pass_lock(&self) -> focusguard_domain::Result<Option<PassGuard>> {
        match &self.pass_lock {
            Some(lock) => lock.try_acquire(),
            None => Ok(Some(Box::new(()))),
        }
    }

    /// Reconcile each day of `[today, today + lookahead_days)` in order.
    ///
    /// A failing day is recorded and the loop continues; an unrecoverable
    /// error stops the remaining days. Cancellation is checked between days.
    #[instrument(skip(self, cancel))]
    pub async fn block_now(
        &self,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> RunOutcome<RunSummary> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("reconciliation requested while another pass is running; skipped");
            return RunOutcome::Skipped;
        };

        let policy = self.policy();
        let mut summary = RunSummary::new(today);
        let _pass = match self.claim_pass_lock() {
            Ok(Some(pass)) => pass,
            Ok(None) => {
                warn!("another process is reconciling this calendar; skipped");
                return RunOutcome::Skipped;
            }
            Err(err) => {
                error!(error = %err, kind = err.label(), "cannot take the pass lock");
                summary.aborted = Some(err);
                return RunOutcome::Completed(summary);
            }
        };
        info!(run_id = %summary.run_id, "checking and updating calendar");

        for offset in 0..policy.lookahead_days {
            if cancel.is_cancelled() {
                warn!(run_id = %summary.run_id, "pass cancelled");
                summary.cancelled = true;
                break;
            }
            let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };

            match self.reconciler.fix_day(date, &policy).await {
                Ok(report) => summary.days.push(report),
                Err(err) if err.is_unrecoverable() => {
                    error!(%date, error = %err, kind = err.label(), "aborting pass");
                    summary.aborted = Some(err);
                    break;
                }
                Err(err) => {
                    warn!(%date, error = %err, kind = err.label(), "day failed");
                    summary.failures.push(DayFailure { date, error: err });
                }
            }
        }

        info!(
            run_id = %summary.run_id,
            days = summary.days.len(),
            created = summary.created(),
            deleted = summary.deleted(),
            failures = summary.failures.len(),
            "checked and updated calendar"
        );
        RunOutcome::Completed(summary)
    }

    /// Decline or cancel every meeting in `[from, to)`, see
    /// [`clear_range`].
    #[instrument(skip(self, message, cancel))]
    pub async fn empty_now(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        message: &str,
        cancel: &CancellationToken,
    ) -> RunOutcome<focusguard_domain::Result<ClearSummary>> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("bulk clear requested while another pass is running; skipped");
            return RunOutcome::Skipped;
        };
        let _pass = match self.claim_pass_lock() {
            Ok(Some(pass)) => pass,
            Ok(None) => {
                warn!("another process is working on this calendar; bulk clear skipped");
                return RunOutcome::Skipped;
            }
            Err(err) => {
                error!(error = %err, kind = err.label(), "cannot take the pass lock");
                return RunOutcome::Completed(Err(err));
            }
        };

        info!("emptying calendar");
        let result = clear_range(
            self.reconciler.store().as_ref(),
            self.reconciler.store_timeout(),
            from,
            to,
            message,
            cancel,
        )
        .await;

        match &result {
            Ok(ClearSummary { aborted: Some(err), .. }) => {
                error!(error = %err, kind = err.label(), "emptying calendar aborted");
            }
            Ok(summary) => info!(
                declined = summary.declined,
                cancelled = summary.cancelled,
                failures = summary.failures.len(),
                "emptied calendar"
            ),
            Err(err) => error!(error = %err, kind = err.label(), "emptying calendar failed"),
        }
        RunOutcome::Completed(result)
    }
}
