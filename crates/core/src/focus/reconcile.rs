//! Reconciliation engine - decides whether a day is overbooked and brings the
//! calendar in line with that decision
//!
//! The decision is binary per day:
//! - overbooked: every free slot of the work window gets a 30-minute focus
//!   block;
//! - not overbooked: every focus block of the whole day is deleted.
//!
//! [`plan_day`] is pure and computes the operations; [`FocusReconciler`]
//! fetches the day from the store and applies them, each exactly once.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use focusguard_domain::constants::{DEFAULT_STORE_TIMEOUT_SECS, SLOT_MINUTES};
use focusguard_domain::{CalendarEntry, FocusPolicy, NewEntry, Result, SlotIndex};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::grid::DayOccupationGrid;
use super::timed;
use crate::calendar_ports::CalendarStore;

/// Operations required to reconcile one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayAction {
    /// Overbooked: create a focus block in each of these slots.
    Block { create: Vec<SlotIndex> },
    /// Not overbooked: delete these focus blocks.
    Unblock { delete: Vec<CalendarEntry> },
}

/// Outcome of [`plan_day`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Occupied slots inside the work window.
    pub occupied: usize,
    pub action: DayAction,
}

impl DayPlan {
    pub fn is_overbooked(&self) -> bool {
        matches!(self.action, DayAction::Block { .. })
    }
}

/// Decide what to do with one day.
///
/// `entries` is the live snapshot the grid was built from; the unblocking
/// branch selects focus blocks from it by subject, across the whole day and
/// independently of the grid.
pub fn plan_day(
    grid: &DayOccupationGrid,
    entries: &[CalendarEntry],
    policy: &FocusPolicy,
) -> DayPlan {
    let occupied = grid.occupied_in(&policy.window);

    let action = if policy.thresholds.is_overbooked(occupied) {
        DayAction::Block { create: grid.free_in(&policy.window).collect() }
    } else {
        DayAction::Unblock {
            delete: entries
                .iter()
                .filter(|entry| entry.is_focus_marker(&policy.focus_string))
                .cloned()
                .collect(),
        }
    };

    DayPlan { date: grid.date(), occupied, action }
}

/// What happened to one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub overbooked: bool,
    pub occupied: usize,
    pub created: usize,
    pub deleted: usize,
}

/// Applies day plans against a calendar store.
#[derive(Clone)]
pub struct FocusReconciler {
    store: Arc<dyn CalendarStore>,
    store_timeout: Duration,
}

impl FocusReconciler {
    pub fn new(store: Arc<dyn CalendarStore>) -> Self {
        Self { store, store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS) }
    }

    /// Limit applied to every single store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn CalendarStore> {
        &self.store
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Reconcile the focus blocks of `date` with its meeting load.
    ///
    /// # Errors
    /// Returns the first store error; operations applied before it stay
    /// applied.
    #[instrument(skip(self, policy))]
    pub async fn fix_day(&self, date: NaiveDate, policy: &FocusPolicy) -> Result<DayReport> {
        let (day_start, day_end) = day_bounds(date);
        let entries = timed(
            self.store_timeout,
            "list_entries",
            self.store.list_entries(day_start, day_end),
        )
        .await?;
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| entry.start >= day_start && entry.start < day_end)
            .collect();

        let grid = DayOccupationGrid::build(date, &entries, &policy.focus_string);
        let plan = plan_day(&grid, &entries, policy);
        debug!(
            grid = %grid,
            entries = entries.len(),
            occupied = plan.occupied,
            max_occupied = policy.thresholds.max_occupied_slots,
            "day evaluated"
        );

        let mut report = DayReport {
            date,
            overbooked: plan.is_overbooked(),
            occupied: plan.occupied,
            created: 0,
            deleted: 0,
        };

        match plan.action {
            DayAction::Block { create } => {
                info!("{date} is overbooked. Start blocking");
                for slot in create {
                    let start = slot.start_on(date);
                    info!("blocking {start} to focus");
                    let entry = NewEntry {
                        subject: policy.focus_string.clone(),
                        start,
                        duration_minutes: SLOT_MINUTES,
                    };
                    timed(self.store_timeout, "create_entry", self.store.create_entry(entry))
                        .await?;
                    report.created += 1;
                }
            }
            DayAction::Unblock { delete } => {
                info!("{date} is not overbooked.");
                for entry in delete {
                    info!("unblocking {}", entry.start);
                    timed(
                        self.store_timeout,
                        "delete_entry",
                        self.store.delete_entry(&entry.handle),
                    )
                    .await?;
                    report.deleted += 1;
                }
            }
        }

        Ok(report)
    }
}

/// `[date 00:00, next day 00:00)`.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date.checked_add_days(Days::new(1)).map_or(NaiveDateTime::MAX, |next| {
        next.and_time(NaiveTime::MIN)
    });
    (start, end)
}

#[cfg(test)]
mod tests {
    use focusguard_domain::{EntryHandle, FocusSettings, Thresholds, WorkWindow};

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    fn entry(subject: &str, slot: usize, slots: i64) -> CalendarEntry {
        CalendarEntry {
            handle: EntryHandle::new(format!("{subject}-{slot}")),
            subject: subject.into(),
            start: SlotIndex::new(slot).unwrap().start_on(day()),
            duration_minutes: slots * SLOT_MINUTES,
            is_organizer: false,
        }
    }

    fn plan(entries: &[CalendarEntry], policy: &FocusPolicy) -> DayPlan {
        let grid = DayOccupationGrid::build(day(), entries, &policy.focus_string);
        plan_day(&grid, entries, policy)
    }

    #[test]
    fn threshold_equality_unblocks() {
        let policy = FocusPolicy::default();
        // 12 occupied slots inside [17, 35)
        let entries = [entry("workshop", 17, 12), entry("focus", 30, 1)];
        let plan = plan(&entries, &policy);

        assert_eq!(plan.occupied, 12);
        assert!(!plan.is_overbooked());
        assert_eq!(plan.action, DayAction::Unblock { delete: vec![entries[1].clone()] });
    }

    #[test]
    fn overbooked_day_blocks_only_free_window_slots() {
        let policy = FocusPolicy::default();
        let entries = [entry("offsite", 17, 13), entry("focus", 31, 1)];
        let plan = plan(&entries, &policy);

        let expected: Vec<SlotIndex> =
            [30, 32, 33, 34].into_iter().map(|i| SlotIndex::new(i).unwrap()).collect();
        assert_eq!(plan.action, DayAction::Block { create: expected });
    }

    #[test]
    fn unblocking_reaches_focus_blocks_outside_the_window() {
        let policy = FocusPolicy::default();
        let entries = [entry("focus", 2, 1), entry("focus", 40, 1), entry("lunch", 24, 2)];
        let plan = plan(&entries, &policy);

        match plan.action {
            DayAction::Unblock { delete } => {
                assert_eq!(delete.len(), 2);
                assert!(delete.iter().all(|e| e.subject == "focus"));
            }
            other => panic!("expected unblock, got {other:?}"),
        }
    }

    #[test]
    fn negative_threshold_is_always_overbooked() {
        let mut settings = FocusSettings::default();
        settings.free_slots = 40;
        let policy = FocusPolicy::from_settings(&settings);
        assert!(policy.thresholds.max_occupied_slots < 0);

        let plan = plan(&[], &policy);
        match plan.action {
            DayAction::Block { create } => assert_eq!(create.len(), 18),
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn full_window_blocks_nothing() {
        let policy = FocusPolicy {
            window: WorkWindow { start_slot: 17, end_slot: 35 },
            thresholds: Thresholds { max_occupied_slots: 0 },
            focus_string: "focus".into(),
            lookahead_days: 1,
        };
        let entries = [entry("meeting", 17, 4), entry("focus", 21, 14)];
        let plan = plan(&entries, &policy);
        assert_eq!(plan.action, DayAction::Block { create: Vec::new() });
    }

    #[test]
    fn day_bounds_cover_one_calendar_day() {
        let (start, end) = day_bounds(day());
        assert_eq!(start, day().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap().and_hms_opt(0, 0, 0).unwrap());
    }
}
