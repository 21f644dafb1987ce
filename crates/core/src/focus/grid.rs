//! Slot grid builder - turns a day's calendar entries into 48 occupation
//! states

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use focusguard_domain::constants::SLOT_MINUTES;
use focusguard_domain::{CalendarEntry, OccupationState, SlotIndex, WorkWindow};

/// Occupation of every half-hour slot of one day.
///
/// Built fresh for each reconciliation pass and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOccupationGrid {
    date: NaiveDate,
    slots: [OccupationState; SlotIndex::COUNT],
}

impl DayOccupationGrid {
    /// A grid with every slot free.
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, slots: [OccupationState::Free; SlotIndex::COUNT] }
    }

    /// Build the grid for `date` from `entries`, in the order given.
    ///
    /// Each entry covers `floor(offset / 30min)` up to
    /// `ceil(duration / 30min)` slots, clipped to the day. Entries whose
    /// subject equals `focus_string` mark their slots
    /// [`OccupationState::FocusBlocked`], every other entry marks them
    /// [`OccupationState::Occupied`]. Overlaps are not merged: the entry
    /// that comes later in `entries` wins.
    pub fn build(date: NaiveDate, entries: &[CalendarEntry], focus_string: &str) -> Self {
        let mut grid = Self::empty(date);
        for entry in entries {
            grid.mark(entry, focus_string);
        }
        grid
    }

    fn mark(&mut self, entry: &CalendarEntry, focus_string: &str) {
        if entry.duration_minutes <= 0 {
            return;
        }

        let day_start = self.date.and_time(NaiveTime::MIN);
        let offset_minutes = (entry.start - day_start).num_seconds().div_euclid(60);
        let start_slot = offset_minutes.div_euclid(SLOT_MINUTES);
        let duration_slots =
            entry.duration_minutes.saturating_add(SLOT_MINUTES - 1) / SLOT_MINUTES;

        let first = start_slot.clamp(0, SlotIndex::COUNT as i64) as usize;
        let last = start_slot.saturating_add(duration_slots).clamp(0, SlotIndex::COUNT as i64)
            as usize;

        let state = if entry.is_focus_marker(focus_string) {
            OccupationState::FocusBlocked
        } else {
            OccupationState::Occupied
        };

        for slot in &mut self.slots[first..last.max(first)] {
            *slot = state;
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn state(&self, slot: SlotIndex) -> OccupationState {
        self.slots[slot.get()]
    }

    pub fn states(&self) -> &[OccupationState] {
        &self.slots
    }

    /// Number of [`OccupationState::Occupied`] slots inside `window`.
    /// Focus blocks never count.
    pub fn occupied_in(&self, window: &WorkWindow) -> usize {
        window_slots(window)
            .filter(|slot| self.state(*slot) == OccupationState::Occupied)
            .count()
    }

    /// Free slots inside `window`, ascending.
    pub fn free_in<'a>(&'a self, window: &WorkWindow) -> impl Iterator<Item = SlotIndex> + 'a {
        window_slots(window).filter(move |slot| self.state(*slot) == OccupationState::Free)
    }
}

fn window_slots(window: &WorkWindow) -> impl Iterator<Item = SlotIndex> {
    window.slots().filter_map(SlotIndex::new)
}

/// One character per slot: `.` free, `#` occupied, `f` focus.
impl fmt::Display for DayOccupationGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.slots {
            let symbol = match state {
                OccupationState::Free => '.',
                OccupationState::Occupied => '#',
                OccupationState::FocusBlocked => 'f',
            };
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
