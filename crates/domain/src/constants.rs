//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Slot grid
pub const SLOT_MINUTES: i64 = 30;
pub const SLOTS_PER_DAY: usize = 48;

// Settings defaults
pub const DEFAULT_START_OF_DAY: (u32, u32) = (8, 30);
pub const DEFAULT_END_OF_DAY: (u32, u32) = (17, 30);
pub const DEFAULT_FREE_SLOTS: i64 = 6;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;
pub const DEFAULT_FOCUS_STRING: &str = "focus";
pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (480, 600);

// Store access
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

pub const PROGRAM_NAME: &str = "focusguard";
