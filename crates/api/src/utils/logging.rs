use std::time::Duration;

use focusguard_domain::FocusError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"block_now"`; callers must not
/// forward user-supplied values through it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Stable label for an error chain; domain errors keep their own label.
pub fn error_label(error: &anyhow::Error) -> &'static str {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<FocusError>())
        .map_or("unexpected", FocusError::label)
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn wrapped_domain_error_keeps_its_label() {
        let err = Err::<(), _>(FocusError::Auth("expired".into()))
            .context("checking calendar")
            .unwrap_err();
        assert_eq!(error_label(&err), "auth");
    }

    #[test]
    fn foreign_error_is_unexpected() {
        assert_eq!(error_label(&anyhow::anyhow!("boom")), "unexpected");
    }
}
