//! Plain-text rendering of command results for the terminal

use std::fmt::Write as _;

use focusguard_core::{ClearSummary, RunSummary};
use focusguard_domain::{FocusPolicy, FocusSettings, SettingKey};

pub fn run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    for day in &summary.days {
        let state = if day.overbooked { "overbooked" } else { "ok" };
        let _ = writeln!(
            out,
            "{}  {state:<10}  occupied {:>2}  +{} -{}",
            day.date, day.occupied, day.created, day.deleted
        );
    }
    for failure in &summary.failures {
        let _ = writeln!(out, "{}  failed: {}", failure.date, failure.error);
    }
    if let Some(err) = &summary.aborted {
        let _ = writeln!(out, "aborted: {err}");
    }
    if summary.cancelled {
        out.push_str("cancelled before the last day\n");
    }
    let _ = write!(
        out,
        "{} day(s) checked, {} focus block(s) created, {} deleted",
        summary.days.len(),
        summary.created(),
        summary.deleted()
    );
    out
}

pub fn clear_summary(summary: &ClearSummary) -> String {
    let mut out = String::new();
    for failure in &summary.failures {
        let _ = writeln!(out, "'{}' failed: {}", failure.subject, failure.error);
    }
    if let Some(err) = &summary.aborted {
        let _ = writeln!(out, "aborted: {err}");
    }
    if summary.interrupted {
        out.push_str("interrupted before every meeting was handled\n");
    }
    let _ = write!(out, "{} declined, {} cancelled", summary.declined, summary.cancelled);
    out
}

pub fn settings(settings: &FocusSettings) -> String {
    SettingKey::ALL
        .iter()
        .map(|key| format!("{:<15} {}", key.to_string(), settings.get(*key)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn policy(policy: &FocusPolicy) -> String {
    format!(
        "work window slots {}..{}, overbooked above {} occupied slot(s), {} day(s) ahead",
        policy.window.start_slot,
        policy.window.end_slot,
        policy.thresholds.max_occupied_slots,
        policy.lookahead_days
    )
}
