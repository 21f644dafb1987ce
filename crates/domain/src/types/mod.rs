//! Domain data types

pub mod calendar;
pub mod settings;
pub mod slot;

pub use calendar::{CalendarEntry, DeclineOutcome, EntryHandle, NewEntry};
pub use settings::{FocusPolicy, FocusSettings, SettingKey, WindowPosition, WindowSize};
pub use slot::{slot_bound_for, OccupationState, SlotIndex, Thresholds, WorkWindow};
