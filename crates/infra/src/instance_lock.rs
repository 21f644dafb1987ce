//! PID-file locks
//!
//! Two processes reconciling the same calendar would race each other's
//! creates and deletes. `focusguard run` holds [`InstanceLock`] for its
//! lifetime so only one daemon runs; every pass, from the daemon or from a
//! one-shot command, additionally holds the short-lived [`FilePassLock`].

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use focusguard_core::{PassGuard, PassLock};
use focusguard_domain::constants::PROGRAM_NAME;
use focusguard_domain::{FocusError, Result};
use tracing::{debug, info, warn};

use crate::errors::InfraError;

/// A PID file that is still empty this soon after creation belongs to a
/// holder that has not written its PID yet.
const FRESH_LOCK_GRACE: Duration = Duration::from_secs(5);

/// Held PID file; removed again on drop.
#[derive(Debug)]
pub struct InstanceLock {
    pid_file: PathBuf,
}

/// Result of a non-blocking attempt on a PID file.
#[derive(Debug)]
pub enum LockAttempt {
    Acquired(InstanceLock),
    /// A live process holds the file; its PID when already written.
    Held(Option<u32>),
}

impl InstanceLock {
    /// Take the daemon lock in `lock_dir`, replacing a stale PID file.
    ///
    /// # Errors
    /// Returns `FocusError::Config` when a live process holds the lock and
    /// `FocusError::Io` when the PID file cannot be written.
    pub fn acquire<P: AsRef<Path>>(lock_dir: P) -> Result<Self> {
        match Self::try_acquire_named(lock_dir.as_ref(), PROGRAM_NAME)? {
            LockAttempt::Acquired(lock) => Ok(lock),
            LockAttempt::Held(pid) => {
                let holder = pid.map_or_else(|| "unknown".to_string(), |pid| pid.to_string());
                Err(FocusError::Config(format!(
                    "another {PROGRAM_NAME} instance is already running (PID {holder})"
                )))
            }
        }
    }

    /// Try to create `<lock_dir>/<name>.pid` exclusively.
    ///
    /// A file left behind by a dead process is removed and creation is
    /// retried once; losing that retry to another process reports the lock
    /// as held.
    ///
    /// # Errors
    /// Returns `FocusError::Io` when the directory or file cannot be written.
    pub fn try_acquire_named(lock_dir: &Path, name: &str) -> Result<LockAttempt> {
        fs::create_dir_all(lock_dir).map_err(InfraError::from)?;
        let pid_file = lock_dir.join(format!("{name}.pid"));
        let current_pid = std::process::id();

        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(&pid_file) {
                Ok(mut file) => {
                    if let Err(e) = file.write_all(current_pid.to_string().as_bytes()) {
                        let _ = fs::remove_file(&pid_file);
                        return Err(InfraError::from(e).into());
                    }
                    info!(pid = current_pid, path = %pid_file.display(), "instance_lock.acquired");
                    return Ok(LockAttempt::Acquired(Self { pid_file }));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(InfraError::from(e).into()),
            }

            match read_pid(&pid_file) {
                Some(pid) if pid != current_pid && is_process_running(pid) => {
                    warn!(
                        existing_pid = pid,
                        path = %pid_file.display(),
                        "instance_lock.process_active"
                    );
                    return Ok(LockAttempt::Held(Some(pid)));
                }
                None if is_fresh(&pid_file) => {
                    warn!(path = %pid_file.display(), "instance_lock.holder_starting");
                    return Ok(LockAttempt::Held(None));
                }
                stale => {
                    warn!(
                        stale_pid = ?stale,
                        path = %pid_file.display(),
                        "instance_lock.stale_pid_file_detected"
                    );
                    match fs::remove_file(&pid_file) {
                        Ok(()) => {}
                        Err(e) if e.kind() == ErrorKind::NotFound => {}
                        Err(e) => return Err(InfraError::from(e).into()),
                    }
                }
            }
        }

        warn!(path = %pid_file.display(), "instance_lock.lost_race");
        Ok(LockAttempt::Held(read_pid(&pid_file)))
    }

    pub fn pid_file(&self) -> &Path {
        &self.pid_file
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.pid_file) {
            Ok(()) => info!(path = %self.pid_file.display(), "instance_lock.released"),
            Err(e) => {
                warn!(error = %e, path = %self.pid_file.display(), "instance_lock.remove_pid_failed");
            }
        }
    }
}

/// [`PassLock`] backed by `<dir>/focusguard-pass.pid`.
#[derive(Debug, Clone)]
pub struct FilePassLock {
    dir: PathBuf,
}

impl FilePassLock {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn pid_file(&self) -> PathBuf {
        self.dir.join(format!("{}.pid", Self::name()))
    }

    fn name() -> String {
        format!("{PROGRAM_NAME}-pass")
    }
}

impl PassLock for FilePassLock {
    fn try_acquire(&self) -> Result<Option<PassGuard>> {
        match InstanceLock::try_acquire_named(&self.dir, &Self::name())? {
            LockAttempt::Acquired(lock) => Ok(Some(Box::new(lock))),
            LockAttempt::Held(pid) => {
                debug!(holder = ?pid, "pass lock held elsewhere");
                Ok(None)
            }
        }
    }
}

fn read_pid(pid_file: &Path) -> Option<u32> {
    fs::read_to_string(pid_file).ok()?.trim().parse().ok()
}

fn is_fresh(pid_file: &Path) -> bool {
    fs::metadata(pid_file)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age < FRESH_LOCK_GRACE)
}

#[cfg(target_os = "linux")]
fn is_process_running(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

#[cfg(target_os = "macos")]
fn is_process_running(pid: u32) -> bool {
    // `kill -0` probes without delivering a signal
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn is_process_running(pid: u32) -> bool {
    warn!(pid, "instance_lock.process_check_unsupported");
    false
}
