//! Shared test helpers for `calcache-core` integration tests.
//!
//! These helpers provide lightweight in-memory ports so service tests can
//! focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod cache;
pub mod flags;
pub mod provider;

use chrono::{DateTime, TimeZone, Utc};

/// Fixed "now" used across service tests: 2024-03-15 10:00 UTC.
pub fn march_15() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}
