//! Long-running mode: startup pass, then the hourly trigger until shutdown

use std::future::Future;
use std::path::Path;
use std::pin::pin;
use std::sync::Arc;

use focusguard_core::{RunOutcome, RunSummary};
use focusguard_domain::Result;
use focusguard_infra::{FocusScheduler, FocusSchedulerConfig, InstanceLock};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::context::AppContext;

/// Hold the instance lock, run one pass right away, then let the scheduler
/// fire hourly passes until `shutdown` resolves. On unix, `SIGHUP` reloads
/// the settings file.
///
/// A failing pass is logged and the daemon keeps running.
///
/// # Errors
/// Returns `FocusError::Config` when another instance holds the lock and the
/// scheduler error when the scheduler cannot be started or stopped.
pub async fn run_daemon<F>(
    ctx: Arc<AppContext>,
    lock_dir: &Path,
    scheduler_config: FocusSchedulerConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let _lock = InstanceLock::acquire(lock_dir)?;
    let mut shutdown = pin!(shutdown);
    let cancel = CancellationToken::new();

    let mut startup = pin!(ctx.runner.block_now(ctx.today(), &cancel));
    let finished = tokio::select! {
        biased;
        outcome = &mut startup => Some(outcome),
        () = &mut shutdown => None,
    };
    match finished {
        Some(outcome) => log_pass("startup", &outcome),
        None => {
            info!("shutdown requested during the startup pass");
            cancel.cancel();
            log_pass("startup", &startup.await);
            return Ok(());
        }
    }

    let mut scheduler = FocusScheduler::with_config(scheduler_config, ctx.hourly_job());
    scheduler.start().await?;
    info!(each_hour = ctx.hourly.is_enabled(), "daemon running");

    let mut reload = ReloadSignal::new();
    loop {
        tokio::select! {
            () = &mut shutdown => break,
            () = reload.recv() => match ctx.reload_settings() {
                Ok(policy) => info!(
                    lookahead_days = policy.lookahead_days,
                    each_hour = ctx.hourly.is_enabled(),
                    "settings reloaded"
                ),
                Err(err) => warn!(error = %err, "settings reload failed; keeping the current ones"),
            },
        }
    }

    info!("shutting down");
    scheduler.stop().await?;
    Ok(())
}

fn log_pass(trigger: &str, outcome: &RunOutcome<RunSummary>) {
    match outcome {
        RunOutcome::Skipped => info!(trigger, "pass skipped"),
        RunOutcome::Completed(summary) => match &summary.aborted {
            Some(err) => error!(trigger, error = %err, kind = err.label(), "pass aborted"),
            None if !summary.failures.is_empty() => {
                warn!(trigger, failures = summary.failures.len(), "pass finished with failures");
            }
            None => info!(
                trigger,
                created = summary.created(),
                deleted = summary.deleted(),
                "pass finished"
            ),
        },
    }
}

#[cfg(unix)]
struct ReloadSignal(Option<tokio::signal::unix::Signal>);

#[cfg(unix)]
impl ReloadSignal {
    fn new() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::hangup()) {
            Ok(stream) => Self(Some(stream)),
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGHUP; settings reload disabled");
                Self(None)
            }
        }
    }

    async fn recv(&mut self) {
        if let Some(stream) = &mut self.0 {
            if stream.recv().await.is_some() {
                return;
            }
        }
        std::future::pending().await
    }
}

#[cfg(not(unix))]
struct ReloadSignal;

#[cfg(not(unix))]
impl ReloadSignal {
    fn new() -> Self {
        Self
    }

    async fn recv(&mut self) {
        std::future::pending().await
    }
}
