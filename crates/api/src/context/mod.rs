//! Application context - dependency injection container

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use focusguard_core::{CalendarStore, FocusRunner};
use focusguard_domain::{FocusPolicy, FocusSettings, Result};
use focusguard_infra::config::{self, today_in};
use focusguard_infra::{FilePassLock, GraphCalendarStore, HourlyPass, LoadedConfig, ScheduledJob};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Application context - holds the runner and everything wired around it
pub struct AppContext {
    config: Mutex<LoadedConfig>,
    pub runner: Arc<FocusRunner>,
    pub hourly: Arc<HourlyPass>,
    zone: Tz,
}

impl AppContext {
    /// Wire the runner to the Outlook calendar. Passes hold the pass lock
    /// in `lock_dir`, shared with every other process using that directory.
    ///
    /// # Errors
    /// Returns `FocusError::Auth` without an access token and
    /// `FocusError::Config` for an invalid configuration.
    pub fn new(loaded: LoadedConfig, lock_dir: &Path) -> Result<Self> {
        let store =
            GraphCalendarStore::new(&loaded.config.outlook, &loaded.config.focus.time_zone)?;
        Self::with_store(loaded, Arc::new(store), lock_dir)
    }

    /// Wire the runner to an arbitrary calendar store.
    ///
    /// # Errors
    /// Returns `FocusError::Config` for an invalid configuration.
    pub fn with_store(
        loaded: LoadedConfig,
        store: Arc<dyn CalendarStore>,
        lock_dir: &Path,
    ) -> Result<Self> {
        loaded.config.validate()?;
        let zone = loaded.config.time_zone()?;
        let store_timeout = Duration::from_secs(loaded.config.outlook.request_timeout_secs);

        let runner = Arc::new(
            FocusRunner::new(store, &loaded.config.focus)
                .with_store_timeout(store_timeout)
                .with_pass_lock(Arc::new(FilePassLock::new(lock_dir))),
        );
        let hourly = Arc::new(HourlyPass::new(
            Arc::clone(&runner),
            loaded.config.focus.each_hour,
            zone,
        ));

        info!(
            config = %loaded.path.display(),
            from_file = loaded.from_file,
            time_zone = %zone,
            "application context ready"
        );
        Ok(Self { config: Mutex::new(loaded), runner, hourly, zone })
    }

    /// Today on the calendar's wall clock.
    pub fn today(&self) -> NaiveDate {
        today_in(self.zone)
    }

    pub fn settings(&self) -> FocusSettings {
        self.config.lock().config.focus.clone()
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.lock().path.clone()
    }

    pub fn hourly_job(&self) -> Arc<dyn ScheduledJob> {
        Arc::clone(&self.hourly) as Arc<dyn ScheduledJob>
    }

    /// Re-read the settings file and apply it to the runner and the hourly
    /// trigger. The time zone is fixed for the lifetime of the context.
    ///
    /// # Errors
    /// Returns the loader error; the running policy is kept in that case.
    pub fn reload_settings(&self) -> Result<FocusPolicy> {
        let path = self.config_path();
        let reloaded = config::load(Some(path))?;

        if reloaded.config.time_zone()? != self.zone {
            warn!(
                time_zone = %reloaded.config.focus.time_zone,
                "time zone changes take effect after a restart"
            );
        }

        let policy = self.runner.apply_settings(&reloaded.config.focus);
        self.hourly.set_enabled(reloaded.config.focus.each_hour);
        *self.config.lock() = reloaded;
        Ok(policy)
    }
}
