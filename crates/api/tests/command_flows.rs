//! Integration tests for the CLI commands against an in-memory calendar

mod support;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use focusguard_app::commands::{block_now, empty_now, set_setting, show_settings};
use focusguard_app::AppContext;
use focusguard_core::{CalendarStore, RunOutcome};
use focusguard_domain::{FocusError, SettingKey};
use focusguard_infra::config::{self, save_to_file};
use focusguard_infra::FilePassLock;
use support::{at, load_config, today, MemoryCalendar};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

const ONE_DAY: &str = "[focus]\nlookahead_days = 1\n";

fn context(calendar: &Arc<MemoryCalendar>, dir: &TempDir, toml: &str) -> AppContext {
    let loaded = load_config(dir.path(), toml);
    AppContext::with_store(loaded, Arc::clone(calendar) as Arc<dyn CalendarStore>, dir.path())
        .unwrap()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[tokio::test]
async fn block_now_fills_the_free_slots_of_an_overbooked_day() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    calendar.add("Planning", at(today(), 8, 30), 7 * 60, false);
    let ctx = context(&calendar, &dir, ONE_DAY);

    let summary = block_now(&ctx, &CancellationToken::new()).await.completed().unwrap();

    assert!(summary.is_clean());
    assert_eq!(summary.days.len(), 1);
    assert!(summary.days[0].overbooked);
    assert_eq!(summary.created(), 4);
    assert_eq!(
        calendar.starts_of("focus"),
        vec![hm(15, 30), hm(16, 0), hm(16, 30), hm(17, 0)]
    );
}

#[tokio::test]
async fn block_now_removes_focus_blocks_from_a_light_day() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    calendar.add("Standup", at(today(), 9, 0), 30, false);
    calendar.add("focus", at(today(), 10, 0), 30, true);
    let ctx = context(&calendar, &dir, ONE_DAY);

    let summary = block_now(&ctx, &CancellationToken::new()).await.completed().unwrap();

    assert_eq!(summary.deleted(), 1);
    assert_eq!(summary.created(), 0);
    assert!(calendar.starts_of("focus").is_empty());
    assert_eq!(calendar.starts_of("Standup"), vec![hm(9, 0)]);
}

#[tokio::test]
async fn block_now_walks_the_configured_lookahead() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    let ctx = context(&calendar, &dir, "[focus]\nlookahead_days = 3\n");

    let summary = block_now(&ctx, &CancellationToken::new()).await.completed().unwrap();

    assert_eq!(summary.first_day, today());
    assert_eq!(summary.days.len(), 3);
    assert_eq!(calendar.listing_count(), 3);
}

#[tokio::test]
async fn empty_now_declines_invitations_and_cancels_own_meetings() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    calendar.add("Review", at(day(2), 10, 0), 60, false);
    calendar.add("1:1", at(day(3), 11, 0), 30, true);
    calendar.add("Offsite", at(day(4), 9, 0), 480, false);
    let ctx = context(&calendar, &dir, ONE_DAY);

    let summary = assert_ok!(
        empty_now(&ctx, day(2), day(4), "out sick", &CancellationToken::new()).await
    )
    .completed()
    .unwrap();

    assert_eq!(summary.declined, 1);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(*calendar.declined.lock(), vec!["Review".to_string()]);
    assert_eq!(*calendar.cancelled.lock(), vec!["1:1".to_string()]);
}

#[tokio::test]
async fn empty_now_with_an_inverted_range_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    let ctx = context(&calendar, &dir, ONE_DAY);
    let from = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

    let summary = assert_ok!(empty_now(&ctx, from, to, "", &CancellationToken::new()).await)
        .completed()
        .unwrap();

    assert_eq!(summary.declined + summary.cancelled, 0);
    assert_eq!(calendar.listing_count(), 0);
}

#[tokio::test]
async fn pass_lock_is_released_after_each_command() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    let ctx = context(&calendar, &dir, ONE_DAY);
    let pass_lock = FilePassLock::new(dir.path()).pid_file();
    let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

    block_now(&ctx, &CancellationToken::new()).await.completed().unwrap();
    assert!(!pass_lock.exists());

    assert_ok!(empty_now(&ctx, day, day.succ_opt().unwrap(), "", &CancellationToken::new()).await);
    assert!(!pass_lock.exists());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn commands_skip_while_another_process_runs_a_pass() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    calendar.add("Planning", at(today(), 8, 30), 7 * 60, false);
    let ctx = context(&calendar, &dir, ONE_DAY);
    // pid 1 always exists on linux
    std::fs::write(FilePassLock::new(dir.path()).pid_file(), "1").unwrap();
    let from = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

    let blocked = block_now(&ctx, &CancellationToken::new()).await;
    let cleared = assert_ok!(
        empty_now(&ctx, from, from.succ_opt().unwrap(), "", &CancellationToken::new()).await
    );

    assert_eq!(blocked, RunOutcome::Skipped);
    assert_eq!(cleared, RunOutcome::Skipped);
    assert_eq!(calendar.listing_count(), 0);
    assert!(calendar.starts_of("focus").is_empty());
}

#[test]
fn set_setting_saves_and_returns_the_new_policy() {
    let dir = TempDir::new().unwrap();
    let mut loaded = load_config(dir.path(), ONE_DAY);

    let policy = assert_ok!(set_setting(&mut loaded, SettingKey::FreeSlots, "4"));

    assert_eq!(policy.thresholds.max_occupied_slots, 14);
    let reread = config::load(Some(loaded.path.clone())).unwrap();
    assert_eq!(reread.config.focus.free_slots, 4);
    assert_eq!(reread.config.focus.lookahead_days, 1);
    assert!(show_settings(&reread).contains("free_slots      4"));
}

#[test]
fn rejected_value_leaves_config_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let mut loaded = load_config(dir.path(), ONE_DAY);
    let before = std::fs::read_to_string(&loaded.path).unwrap();

    let err = assert_err!(set_setting(&mut loaded, SettingKey::StartOfDay, "25:99"));
    assert!(matches!(err, FocusError::InvalidInput(_)));

    let err = assert_err!(set_setting(&mut loaded, SettingKey::TimeZone, "Mars/Olympus"));
    assert!(matches!(err, FocusError::Config(_)));

    assert_eq!(loaded.config.focus.time_zone, "UTC");
    assert_eq!(std::fs::read_to_string(&loaded.path).unwrap(), before);
}

#[test]
fn reload_applies_the_saved_settings_to_runner_and_hourly_trigger() {
    let dir = TempDir::new().unwrap();
    let calendar = MemoryCalendar::new();
    let ctx = context(&calendar, &dir, ONE_DAY);
    assert!(!ctx.hourly.is_enabled());

    let mut edited = config::load(Some(ctx.config_path())).unwrap();
    edited.config.focus.each_hour = true;
    edited.config.focus.free_slots = 2;
    save_to_file(&edited.config, &ctx.config_path()).unwrap();

    let policy = ctx.reload_settings().unwrap();

    assert_eq!(policy.thresholds.max_occupied_slots, 16);
    assert_eq!(ctx.runner.policy(), policy);
    assert!(ctx.hourly.is_enabled());
    assert!(ctx.settings().each_hour);
}

#[test]
fn context_without_a_token_cannot_reach_outlook() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path(), ONE_DAY);

    let result = AppContext::new(loaded, dir.path());

    assert!(matches!(result, Err(FocusError::Auth(_))));
}
