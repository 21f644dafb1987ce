//! Outlook calendar integration
//!
//! [`GraphCalendarStore`] implements the `CalendarStore` port against the
//! Microsoft Graph REST API.

pub mod graph;

pub use graph::GraphCalendarStore;
