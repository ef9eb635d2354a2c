//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Feature flags
pub const CALENDAR_CACHE_FLAG: &str = "calendar-cache";

// Integrations
pub const GOOGLE_CALENDAR_INTEGRATION: &str = "google_calendar";
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

// Cache lifetimes
pub const CACHE_INITIAL_TTL_SECS: i64 = 30 * 24 * 60 * 60; // one "month"
pub const CACHE_REFRESH_TTL_SECS: i64 = 60;

// Push channels live as long as a freshly inserted cache row
pub const WATCH_CHANNEL_TTL_SECS: i64 = CACHE_INITIAL_TTL_SECS;

// Window expansion offsets (months ahead of the current month)
pub const BROWSE_AHEAD_MONTHS: i32 = 1;
pub const RANGE_AHEAD_MONTHS: i32 = 2;

// Database defaults
pub const DEFAULT_DB_PATH: &str = "calcache.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;

// HTTP defaults
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;
