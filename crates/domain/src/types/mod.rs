//! Domain types and models

pub mod cache;
pub mod calendar;
pub mod freebusy;

pub use cache::{CacheEntry, CacheKey, CredentialId};
pub use calendar::{
    CalendarId, IntegrationCalendar, SelectedCalendar, WatchChannel, WebhookTarget,
};
pub use freebusy::{
    format_timestamp, parse_timestamp, BusyInterval, CalendarItem, FreeBusyCalendar,
    FreeBusyError, FreeBusyQuery, FreeBusyRequest, FreeBusyResponse, TimePeriod, TimeRange,
};
