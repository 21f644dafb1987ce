//! Settings display and editing

use focusguard_domain::{FocusPolicy, Result, SettingKey};
use focusguard_infra::LoadedConfig;
use tracing::info;

use crate::utils::report;

pub fn show_settings(loaded: &LoadedConfig) -> String {
    report::settings(&loaded.config.focus)
}

/// Change one setting, validate the whole configuration and save it.
///
/// Returns the policy the new settings derive; a running daemon picks it up
/// on its next reload.
///
/// # Errors
/// Returns `FocusError::InvalidInput` or `FocusError::Config` for a rejected
/// value, leaving `loaded` and the file untouched, and `FocusError::Io` when
/// the file cannot be written.
pub fn set_setting(loaded: &mut LoadedConfig, key: SettingKey, value: &str) -> Result<FocusPolicy> {
    let mut next = loaded.clone();
    next.update_setting(key, value)?;
    next.config.validate()?;
    next.save()?;

    info!(%key, value = %next.config.focus.get(key), path = %next.path.display(), "setting saved");
    let policy = FocusPolicy::from_settings(&next.config.focus);
    *loaded = next;
    Ok(policy)
}
