//! Hourly reconciliation scheduler.
//!
//! Provides a cron-based scheduler that triggers a job at fixed intervals.
//! Cancellation is explicit and every asynchronous operation is wrapped in
//! a timeout. Stopping the scheduler cancels the
//! token handed to a job in flight, so a running pass ends after its current
//! day.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use focusguard_core::FocusRunner;
//! use focusguard_infra::scheduling::{
//!     FocusScheduler, FocusSchedulerConfig, HourlyPass, SchedulerResult,
//! };
//!
//! # async fn example(runner: Arc<FocusRunner>) -> SchedulerResult<()> {
//! let job = Arc::new(HourlyPass::new(runner, true, chrono_tz::Europe::Brussels));
//! let mut scheduler = FocusScheduler::with_config(FocusSchedulerConfig::default(), job);
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono_tz::Tz;
use focusguard_core::{FocusRunner, RunOutcome};
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::today_in;
use crate::errors::InfraError;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Work triggered by the scheduler.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// Execute the job; `cancel` fires when the scheduler stops.
    async fn run(&self, cancel: CancellationToken) -> Result<(), InfraError>;
}

/// Configuration for the focus scheduler.
#[derive(Debug, Clone)]
pub struct FocusSchedulerConfig {
    /// Cron expression describing the execution schedule.
    pub cron_expression: String,
    /// Timeout applied to a single job execution.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
}

impl Default for FocusSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: "0 0 * * * *".into(), // top of every hour
            job_timeout: Duration::from_secs(30 * 60),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

/// Focus scheduler with explicit lifecycle management.
pub struct FocusScheduler {
    scheduler: Option<JobScheduler>,
    config: FocusSchedulerConfig,
    cancellation: CancellationToken,
    job: Arc<dyn ScheduledJob>,
}

impl FocusScheduler {
    /// Create a scheduler with a custom configuration.
    pub fn with_config(config: FocusSchedulerConfig, job: Arc<dyn ScheduledJob>) -> Self {
        Self {
            scheduler: None,
            config,
            cancellation: CancellationToken::new(),
            job,
        }
    }

    /// Start the scheduler and register the job.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        let start_result = tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?;

        start_result.map_err(|source| SchedulerError::StartFailed { source })?;

        self.scheduler = Some(scheduler_instance);
        info!(cron = %self.config.cron_expression, "Focus scheduler started");
        Ok(())
    }

    /// Stop the scheduler and cancel the token of a job in flight.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        let stop_timeout = self.config.stop_timeout;
        let stop_result =
            tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
                .await
                .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?;

        stop_result.map_err(|source| SchedulerError::StopFailed { source })?;

        info!("Focus scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler =
            JobScheduler::new().await.map_err(|source| SchedulerError::CreationFailed { source })?;
        let cron_expr = self.config.cron_expression.clone();
        let job = self.job.clone();
        let job_timeout = self.config.job_timeout;
        let cancel = self.cancellation.clone();

        let job_definition = Job::new_async(cron_expr.as_str(), move |_id, _lock| {
            let job = job.clone();
            let cancel = cancel.clone();

            Box::pin(async move {
                let started = Instant::now();
                let result = tokio::time::timeout(job_timeout, job.run(cancel)).await;
                let elapsed_ms = started.elapsed().as_millis() as u64;

                match result {
                    Ok(Ok(())) => {
                        debug!(elapsed_ms, "Scheduled pass finished");
                    }
                    Ok(Err(err)) => {
                        error!(error = %err, elapsed_ms, "Scheduled pass failed");
                    }
                    Err(elapsed) => {
                        warn!(timeout_secs = job_timeout.as_secs(), "Scheduled pass timed out");
                        debug!(elapsed = ?elapsed, "Timeout details");
                    }
                }
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        let job_id = job_definition.guid();
        scheduler
            .add(job_definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered focus job");
        Ok(scheduler)
    }
}

impl Drop for FocusScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("FocusScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}

/// The hourly lookahead pass.
///
/// Fires every hour and runs only while the `each_hour` setting is on; the
/// flag is read when the job fires, so toggling it takes effect at the next
/// tick.
pub struct HourlyPass {
    runner: Arc<FocusRunner>,
    enabled: AtomicBool,
    zone: Tz,
}

impl HourlyPass {
    pub fn new(runner: Arc<FocusRunner>, each_hour: bool, zone: Tz) -> Self {
        Self { runner, enabled: AtomicBool::new(each_hour), zone }
    }

    pub fn set_enabled(&self, each_hour: bool) {
        self.enabled.store(each_hour, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduledJob for HourlyPass {
    async fn run(&self, cancel: CancellationToken) -> Result<(), InfraError> {
        if !self.is_enabled() {
            debug!("each_hour is off; hourly pass skipped");
            return Ok(());
        }

        match self.runner.block_now(today_in(self.zone), &cancel).await {
            RunOutcome::Skipped => {
                info!("previous pass still running; hourly pass skipped");
                Ok(())
            }
            RunOutcome::Completed(summary) => match summary.aborted {
                Some(err) => Err(InfraError(err)),
                None => Ok(()),
            },
        }
    }
}
