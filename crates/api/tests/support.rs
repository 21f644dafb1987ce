#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use focusguard_core::CalendarStore;
use focusguard_domain::{CalendarEntry, DeclineOutcome, EntryHandle, FocusError, NewEntry, Result};
use focusguard_infra::config::{self, today_in};
use focusguard_infra::LoadedConfig;
use parking_lot::Mutex;

/// Calendar kept in memory; counts the writes made against it.
#[derive(Default)]
pub struct MemoryCalendar {
    entries: Mutex<Vec<CalendarEntry>>,
    next_id: Mutex<usize>,
    pub listings: Mutex<usize>,
    pub declined: Mutex<Vec<String>>,
    pub cancelled: Mutex<Vec<String>>,
}

impl MemoryCalendar {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(
        &self,
        subject: &str,
        start: NaiveDateTime,
        minutes: i64,
        is_organizer: bool,
    ) -> EntryHandle {
        let handle = {
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            EntryHandle::new(format!("evt-{}", *next_id))
        };
        self.entries.lock().push(CalendarEntry {
            handle: handle.clone(),
            subject: subject.to_string(),
            start,
            duration_minutes: minutes,
            is_organizer,
        });
        handle
    }

    pub fn starts_of(&self, subject: &str) -> Vec<NaiveTime> {
        let mut times: Vec<_> = self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.subject == subject)
            .map(|entry| entry.start.time())
            .collect();
        times.sort();
        times
    }

    pub fn listing_count(&self) -> usize {
        *self.listings.lock()
    }
}

#[async_trait]
impl CalendarStore for MemoryCalendar {
    async fn list_entries(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEntry>> {
        *self.listings.lock() += 1;
        let mut found: Vec<_> = self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.start >= start && entry.start < end)
            .cloned()
            .collect();
        found.sort_by_key(|entry| entry.start);
        Ok(found)
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<EntryHandle> {
        Ok(self.add(&entry.subject, entry.start, entry.duration_minutes, true))
    }

    async fn delete_entry(&self, handle: &EntryHandle) -> Result<()> {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| &entry.handle != handle);
        if entries.len() == before {
            return Err(FocusError::NotFound(handle.to_string()));
        }
        Ok(())
    }

    async fn respond_decline(
        &self,
        entry: &CalendarEntry,
        _message: &str,
    ) -> Result<DeclineOutcome> {
        if entry.is_organizer {
            return Ok(DeclineOutcome::NotDeclinable);
        }
        self.declined.lock().push(entry.subject.clone());
        Ok(DeclineOutcome::Declined)
    }

    async fn cancel_and_notify(&self, entry: &CalendarEntry, _message: &str) -> Result<()> {
        self.cancelled.lock().push(entry.subject.clone());
        Ok(())
    }
}

pub fn today() -> NaiveDate {
    today_in(chrono_tz::Tz::UTC)
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

/// Write `toml` as the settings file in `dir` and load it.
pub fn load_config(dir: &Path, toml: &str) -> LoadedConfig {
    let path = dir.join("focusguard.toml");
    std::fs::write(&path, toml).unwrap();
    config::load(Some(path)).unwrap()
}
