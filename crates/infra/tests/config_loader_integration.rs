//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading, editing and saving the
//! configuration file.

use chrono::NaiveTime;
use focusguard_domain::{FocusPolicy, SettingKey};
use focusguard_infra::config;
use tempfile::TempDir;

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("focusguard.toml");
    std::fs::write(
        &path,
        r#"
[focus]
start_of_day = "09:00"
end_of_day = "18:00"
free_slots = 4
lookahead_days = 10
focus_string = "Focus time"
each_hour = true
time_zone = "Europe/Brussels"
window_pos = { x = 10, y = 20 }

[outlook]
base_url = "http://localhost:9999/v1.0"
request_timeout_secs = 5

[log]
level = "debug"
"#,
    )
    .expect("Failed to write config");

    let loaded = config::load(Some(path.clone())).expect("config loads");
    assert!(loaded.from_file);
    assert_eq!(loaded.path, path);

    let focus = &loaded.config.focus;
    assert_eq!(focus.start_of_day, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(focus.end_of_day, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    assert_eq!(focus.lookahead_days, 10);
    assert!(focus.each_hour);
    assert_eq!(focus.get(SettingKey::WindowPos), "10,20");
    assert_eq!(loaded.config.outlook.request_timeout_secs, 5);
    assert_eq!(loaded.config.log.level, "debug");

    // 09:00 -> 18, 18:00 -> 36
    let policy = FocusPolicy::from_settings(focus);
    assert_eq!(policy.window.start_slot, 18);
    assert_eq!(policy.window.end_slot, 36);
    assert_eq!(policy.thresholds.max_occupied_slots, 14);
}

#[test]
fn test_settings_edit_round_trips_through_json() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("focusguard.json");

    let mut loaded = config::load(Some(path.clone())).expect("defaults load");
    assert!(!loaded.from_file);

    loaded.update_setting(SettingKey::EndOfDay, "16:45").expect("valid time");
    loaded.update_setting(SettingKey::WindowSize, "640x480").expect("valid size");
    loaded.save().expect("save succeeds");
    assert!(loaded.from_file);

    let reloaded = config::load(Some(path)).expect("reload succeeds");
    assert_eq!(reloaded.config.focus.get(SettingKey::EndOfDay), "16:45");
    assert_eq!(reloaded.config.focus.get(SettingKey::WindowSize), "640x480");
    assert_eq!(reloaded.config.focus.free_slots, 6);
}

#[test]
fn test_invalid_time_zone_fails_loading() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("focusguard.toml");
    std::fs::write(&path, "[focus]\ntime_zone = \"Atlantis/Capital\"\n").expect("write");

    let err = config::load(Some(path)).expect_err("unknown zone is rejected");
    assert!(err.to_string().contains("Atlantis/Capital"));
}
