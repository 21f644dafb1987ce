//! Shared test helpers for `focusguard-core` integration tests.
//!
//! Provides an in-memory calendar store so reconciliation tests can focus on
//! behaviour instead of wiring, and a pass lock with a fixed state.

pub mod calendar;
pub mod pass_lock;
