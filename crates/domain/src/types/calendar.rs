//! Calendar entry types exchanged with the calendar store

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Opaque store identifier of a calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryHandle(String);

impl EntryHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one calendar entry (recurring series already expanded).
///
/// Times are local wall-clock times in the calendar's configured zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub handle: EntryHandle,
    pub subject: String,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    /// True when the local user organizes the meeting, which rules out a
    /// decline on their behalf.
    #[serde(default)]
    pub is_organizer: bool,
}

impl CalendarEntry {
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.duration_minutes)
    }

    /// True when this entry is a focus block owned by this tool.
    pub fn is_focus_marker(&self, focus_string: &str) -> bool {
        self.subject == focus_string
    }
}

/// Entry to be created in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub subject: String,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}

/// Result of asking the store to decline a meeting on the user's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineOutcome {
    /// The decline was sent to the organizer.
    Declined,
    /// The store refused; typically the user organizes the meeting.
    NotDeclinable,
}
