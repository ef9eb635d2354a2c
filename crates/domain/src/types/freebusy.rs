//! Free/busy query and response types
//!
//! [`FreeBusyRequest`] and [`FreeBusyResponse`] mirror the provider's JSON
//! shape (`timeMin`, `timeMax`, `items`, `calendars`). The request doubles as
//! the cache key material, so its field order is part of the key format.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::CalendarId;
use crate::errors::{CalCacheError, Result};

/// Half-open time window `[start, end)`.
///
/// `start <= end` is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Window from `start` up to, not including, `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse an RFC 3339 pair such as the `dateFrom`/`dateTo` strings a
    /// booking page sends.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self { start: parse_timestamp(start)?, end: parse_timestamp(end)? })
    }
}

/// A free/busy lookup as the caller asked for it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeBusyQuery {
    pub window: TimeRange,
    pub calendar_ids: Vec<CalendarId>,
}

impl FreeBusyQuery {
    pub fn new(window: TimeRange, calendar_ids: Vec<CalendarId>) -> Self {
        Self { window, calendar_ids }
    }
}

/// Calendar reference inside a [`FreeBusyRequest`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: CalendarId,
}

/// Free/busy request body.
///
/// Serialized field order is `timeMin`, `timeMax`, `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyRequest {
    pub time_min: String,
    pub time_max: String,
    pub items: Vec<CalendarItem>,
}

impl FreeBusyRequest {
    /// Request for exactly the window and calendars given, in caller order.
    pub fn from_parts(window: TimeRange, calendar_ids: &[CalendarId]) -> Self {
        Self {
            time_min: format_timestamp(window.start),
            time_max: format_timestamp(window.end),
            items: calendar_ids.iter().cloned().map(|id| CalendarItem { id }).collect(),
        }
    }

    /// Ids of the requested calendars.
    pub fn calendar_ids(&self) -> impl Iterator<Item = &CalendarId> {
        self.items.iter().map(|item| &item.id)
    }
}

impl From<&FreeBusyQuery> for FreeBusyRequest {
    fn from(query: &FreeBusyQuery) -> Self {
        Self::from_parts(query.window, &query.calendar_ids)
    }
}

/// Free/busy response as returned by the provider.
///
/// `calendars` is optional on purpose: a response without it is malformed
/// and must be told apart from one with zero calendars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendars: Option<BTreeMap<String, FreeBusyCalendar>>,
}

/// Busy blocks reported for one calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusyCalendar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy: Option<Vec<TimePeriod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FreeBusyError>>,
}

/// Provider-side error for a single calendar (e.g. `notFound`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusyError {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Upstream busy block; either bound may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Flattened busy block handed back to callers.
///
/// Missing upstream bounds are kept as empty strings ("unspecified").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: String,
    pub end: String,
}

impl From<TimePeriod> for BusyInterval {
    fn from(period: TimePeriod) -> Self {
        Self { start: period.start.unwrap_or_default(), end: period.end.unwrap_or_default() }
    }
}

/// Render a timestamp as `2024-03-01T00:00:00.000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CalCacheError::InvalidInput(format!("invalid timestamp '{value}': {e}")))
}
