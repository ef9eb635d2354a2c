//! Port interfaces for availability lookups
//!
//! These traits define the boundaries between the availability use case and
//! infrastructure implementations (calendar APIs, cache tables).

use async_trait::async_trait;
use calcache_domain::{
    CacheEntry, CacheKey, CalendarId, CredentialId, FreeBusyRequest, FreeBusyResponse,
    IntegrationCalendar, Result, WatchChannel, WebhookTarget,
};
use chrono::{DateTime, Utc};

/// Third-party calendar API client
#[async_trait]
pub trait FreeBusyProvider: Send + Sync {
    /// Integration name used to match selected calendars
    /// (e.g. `google_calendar`).
    fn integration(&self) -> &str;

    /// Query busy blocks for the request's window and calendars.
    ///
    /// Transport and auth failures surface as errors; nothing is retried or
    /// cached here.
    async fn query_free_busy(&self, request: &FreeBusyRequest) -> Result<FreeBusyResponse>;

    /// List the calendars visible to the connected account.
    async fn list_calendars(&self) -> Result<Vec<IntegrationCalendar>>;

    /// Open a push channel that notifies `target` when events on
    /// `calendar_id` change.
    async fn watch_calendar(
        &self,
        calendar_id: &CalendarId,
        target: &WebhookTarget,
    ) -> Result<WatchChannel>;

    /// Stop a channel previously returned by `watch_calendar`.
    async fn unwatch_calendar(&self, channel: &WatchChannel) -> Result<()>;
}

/// Persistent free/busy cache, partitioned by credential.
#[async_trait]
pub trait AvailabilityCache: Send + Sync {
    /// Return the entry for `(credential_id, key)` if it is still fresh at
    /// `now`. Absent and expired entries are both `None`.
    async fn get(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>>;

    /// Insert or replace the value for `(credential_id, key)` in one atomic
    /// step.
    ///
    /// New rows expire after the long TTL, replaced rows after the short one
    /// (see [`FreshnessPolicy`](super::policy::FreshnessPolicy)). Returns the
    /// stored entry.
    async fn upsert(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        value: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<CacheEntry>;
}
