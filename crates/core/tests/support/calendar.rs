use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use focusguard_core::CalendarStore;
use focusguard_domain::{
    CalendarEntry, DeclineOutcome, EntryHandle, FocusError, NewEntry, Result as DomainResult,
};

/// Store call recorded by [`MockCalendarStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    List { start: NaiveDateTime, end: NaiveDateTime },
    Create(NewEntry),
    Delete(EntryHandle),
    Decline(EntryHandle),
    Cancel(EntryHandle),
}

#[derive(Default)]
struct State {
    entries: Vec<CalendarEntry>,
    next_id: usize,
    ops: Vec<StoreOp>,
    list_failures: HashMap<NaiveDate, FocusError>,
    create_failure: Option<FocusError>,
    decline_failures: HashMap<String, FocusError>,
    list_delay: Option<Duration>,
}

/// In-memory mock for `CalendarStore`.
///
/// Keeps entries in insertion order, lists them sorted by start (stable, so
/// equal starts keep insertion order) and records every call. Entries with
/// `is_organizer` set cannot be declined.
#[derive(Default, Clone)]
pub struct MockCalendarStore {
    state: Arc<Mutex<State>>,
}

impl MockCalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry the user was invited to.
    pub fn with_entry(self, subject: &str, start: NaiveDateTime, minutes: i64) -> Self {
        self.insert(subject, start, minutes, false);
        self
    }

    /// Seed an entry the user organizes.
    pub fn with_organized_entry(self, subject: &str, start: NaiveDateTime, minutes: i64) -> Self {
        self.insert(subject, start, minutes, true);
        self
    }

    pub fn fail_listing_on(self, date: NaiveDate, error: FocusError) -> Self {
        self.state.lock().unwrap().list_failures.insert(date, error);
        self
    }

    pub fn fail_creates_with(self, error: FocusError) -> Self {
        self.state.lock().unwrap().create_failure = Some(error);
        self
    }

    /// Make declining the entry called `subject` fail with `error`.
    pub fn fail_declining(self, subject: &str, error: FocusError) -> Self {
        self.state.lock().unwrap().decline_failures.insert(subject.to_string(), error);
        self
    }

    pub fn with_list_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().list_delay = Some(delay);
        self
    }

    pub fn insert(&self, subject: &str, start: NaiveDateTime, minutes: i64, organizer: bool) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let handle = EntryHandle::new(format!("mock-{}", state.next_id));
        state.entries.push(CalendarEntry {
            handle,
            subject: subject.to_string(),
            start,
            duration_minutes: minutes,
            is_organizer: organizer,
        });
    }

    pub fn entries(&self) -> Vec<CalendarEntry> {
        self.state.lock().unwrap().entries.clone()
    }

    pub fn entries_with_subject(&self, subject: &str) -> Vec<CalendarEntry> {
        self.entries().into_iter().filter(|e| e.subject == subject).collect()
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn created(&self) -> Vec<NewEntry> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Create(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<EntryHandle> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Delete(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }

    pub fn clear_ops(&self) {
        self.state.lock().unwrap().ops.clear();
    }

    fn remove(&self, handle: &EntryHandle) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.entries.len();
        state.entries.retain(|e| &e.handle != handle);
        if state.entries.len() == before {
            return Err(FocusError::NotFound(format!("entry {handle}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarStore for MockCalendarStore {
    async fn list_entries(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> DomainResult<Vec<CalendarEntry>> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.ops.push(StoreOp::List { start, end });
            if let Some(error) = state.list_failures.get(&start.date()) {
                return Err(error.clone());
            }
            state.list_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut entries: Vec<CalendarEntry> = self
            .state
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|e| e.start >= start && e.start < end)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.start);
        Ok(entries)
    }

    async fn create_entry(&self, entry: NewEntry) -> DomainResult<EntryHandle> {
        {
            let mut state = self.state.lock().unwrap();
            state.ops.push(StoreOp::Create(entry.clone()));
            if let Some(error) = &state.create_failure {
                return Err(error.clone());
            }
        }
        self.insert(&entry.subject, entry.start, entry.duration_minutes, true);
        let state = self.state.lock().unwrap();
        Ok(EntryHandle::new(format!("mock-{}", state.next_id)))
    }

    async fn delete_entry(&self, handle: &EntryHandle) -> DomainResult<()> {
        self.state.lock().unwrap().ops.push(StoreOp::Delete(handle.clone()));
        self.remove(handle)
    }

    async fn respond_decline(
        &self,
        entry: &CalendarEntry,
        _message: &str,
    ) -> DomainResult<DeclineOutcome> {
        {
            let mut state = self.state.lock().unwrap();
            state.ops.push(StoreOp::Decline(entry.handle.clone()));
            if let Some(error) = state.decline_failures.get(&entry.subject) {
                return Err(error.clone());
            }
        }
        if entry.is_organizer {
            return Ok(DeclineOutcome::NotDeclinable);
        }
        self.remove(&entry.handle)?;
        Ok(DeclineOutcome::Declined)
    }

    async fn cancel_and_notify(&self, entry: &CalendarEntry, _message: &str) -> DomainResult<()> {
        self.state.lock().unwrap().ops.push(StoreOp::Cancel(entry.handle.clone()));
        self.remove(&entry.handle)
    }
}
