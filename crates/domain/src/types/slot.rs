//! Half-hour slot model
//!
//! A day is cut into 48 half-hour slots, index 0 covering 00:00–00:30. The
//! work window and the overbooking threshold are both expressed in slots.

use std::ops::Range;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::constants::{SLOTS_PER_DAY, SLOT_MINUTES};
use crate::impl_domain_keyword_conversions;

/// Index of a half-hour bucket of a day, always in `[0, 47]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Number of slots in a day.
    pub const COUNT: usize = SLOTS_PER_DAY;

    /// Returns `None` when `index` is not a valid slot.
    pub fn new(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Iterate over every slot of a day.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }

    /// Wall-clock time at which the slot begins.
    pub fn time_of_day(self) -> NaiveTime {
        NaiveTime::MIN + Duration::minutes(self.0 as i64 * SLOT_MINUTES)
    }

    /// Local start of the slot on `date`.
    pub fn start_on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time_of_day())
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("slot index {value} out of range"))
    }
}

impl From<SlotIndex> for usize {
    fn from(value: SlotIndex) -> Self {
        value.0
    }
}

/// Slot boundary for a start-of-day / end-of-day setting.
///
/// The minute part is rounded up in two steps: one slot for any minute past
/// the hour and one more for any minute past the half hour. 08:30 maps to
/// 17 and 08:45 maps to 18, but 08:31 also maps to 18, so some boundaries
/// land one slot later than a plain ceiling would. The result is an
/// exclusive bound in `[0, 48]`.
pub fn slot_bound_for(time: NaiveTime) -> usize {
    let mut slot = time.hour() as usize * 2;
    if time.minute() > 0 {
        slot += 1;
    }
    if time.minute() > 30 {
        slot += 1;
    }
    slot.min(SLOTS_PER_DAY)
}

/// Occupation of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationState {
    #[default]
    Free = 0,
    /// Covered by a real meeting.
    Occupied = 1,
    /// Covered by a focus block this tool created.
    FocusBlocked = 2,
}

impl_domain_keyword_conversions!(OccupationState {
    Free => "free",
    Occupied => "occupied",
    FocusBlocked => "focus_blocked",
});

/// Sub-range of the day counted toward overbooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub start_slot: usize,
    /// Exclusive.
    pub end_slot: usize,
}

impl WorkWindow {
    pub fn new(start_of_day: NaiveTime, end_of_day: NaiveTime) -> Self {
        Self { start_slot: slot_bound_for(start_of_day), end_slot: slot_bound_for(end_of_day) }
    }

    /// Slots inside the window. Empty when end precedes start.
    pub fn slots(&self) -> Range<usize> {
        self.start_slot..self.end_slot
    }

    pub fn contains(&self, slot: SlotIndex) -> bool {
        self.slots().contains(&slot.get())
    }

    /// Signed size; negative for an inverted window.
    pub fn len(&self) -> i64 {
        self.end_slot as i64 - self.start_slot as i64
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// Overbooking threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// A day is overbooked when strictly more slots than this are occupied.
    /// Negative when more free slots are wanted than the window holds.
    pub max_occupied_slots: i64,
}

impl Thresholds {
    pub fn compute(window: &WorkWindow, free_slots_wanted: i64) -> Self {
        Self { max_occupied_slots: window.len() - free_slots_wanted }
    }

    pub fn is_overbooked(&self, occupied: usize) -> bool {
        occupied as i64 > self.max_occupied_slots
    }
}
