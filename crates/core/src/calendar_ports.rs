//! Calendar store port interface
//!
//! The calendar store is the single mutable resource FocusGuard works
//! against. Infrastructure adapters (Microsoft Graph, in-memory mocks)
//! implement this trait; the reconciliation engine only sees the trait.
//! [`PassLock`] keeps passes from different processes off the calendar at
//! the same time.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use focusguard_domain::{CalendarEntry, DeclineOutcome, EntryHandle, NewEntry, Result};

/// Trait for calendar store operations
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// List entries whose start lies in `[start, end)`.
    ///
    /// Recurring series must be expanded into concrete occurrences. Entries
    /// are returned in ascending start order; entries with equal start keep
    /// the store's own order. The slot grid relies on this order for its
    /// last-write-wins tie-break.
    async fn list_entries(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEntry>>;

    /// Create an entry and return its handle.
    async fn create_entry(&self, entry: NewEntry) -> Result<EntryHandle>;

    /// Delete an entry outright.
    async fn delete_entry(&self, handle: &EntryHandle) -> Result<()>;

    /// Decline a meeting on the user's behalf, sending `message` to the
    /// organizer. Returns [`DeclineOutcome::NotDeclinable`] when the store
    /// cannot decline it, e.g. because the user organizes it.
    async fn respond_decline(&self, entry: &CalendarEntry, message: &str)
        -> Result<DeclineOutcome>;

    /// Cancel a meeting the user organizes and notify its attendees.
    async fn cancel_and_notify(&self, entry: &CalendarEntry, message: &str) -> Result<()>;
}

/// Held while a pass runs; dropping it releases the lock.
pub type PassGuard = Box<dyn Send>;

/// Exclusion shared by every process working on the same calendar.
pub trait PassLock: Send + Sync {
    /// Take the lock without waiting.
    ///
    /// Returns `Ok(None)` when another process holds it.
    fn try_acquire(&self) -> Result<Option<PassGuard>>;
}
