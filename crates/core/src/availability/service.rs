//! Availability use case: flag check, key build, cache lookup, fetch on miss,
//! store, aggregate.

use std::sync::Arc;

use calcache_domain::constants::CALENDAR_CACHE_FLAG;
use calcache_domain::{
    BusyInterval, CacheConfig, CacheKey, CalCacheError, CalendarId, CredentialId,
    FreeBusyQuery, FreeBusyRequest, FreeBusyResponse, IntegrationCalendar, Result,
    SelectedCalendar, TimeRange, WatchChannel, WebhookTarget,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::aggregate::flatten_busy;
use super::key::{normalize_query, request_key};
use super::policy::is_hit;
use super::ports::{AvailabilityCache, FreeBusyProvider};
use super::window::warmup_window;
use crate::clock::{Clock, SystemClock};
use crate::feature_flags_ports::FeatureFlagsPort;

/// Free/busy lookups for one credential, cached per month bucket.
///
/// Concurrent misses for the same key may both hit the provider; the store's
/// upsert keeps the last write.
pub struct AvailabilityService {
    credential_id: CredentialId,
    provider: Arc<dyn FreeBusyProvider>,
    cache: Arc<dyn AvailabilityCache>,
    flags: Arc<dyn FeatureFlagsPort>,
    clock: Arc<dyn Clock>,
    expand_window: bool,
    flag_name: String,
}

impl AvailabilityService {
    /// Create a service with window expansion on and the system clock.
    pub fn new(
        credential_id: CredentialId,
        provider: Arc<dyn FreeBusyProvider>,
        cache: Arc<dyn AvailabilityCache>,
        flags: Arc<dyn FeatureFlagsPort>,
    ) -> Self {
        Self {
            credential_id,
            provider,
            cache,
            flags,
            clock: Arc::new(SystemClock),
            expand_window: true,
            flag_name: CALENDAR_CACHE_FLAG.to_string(),
        }
    }

    /// Replace the clock (tests pin "now" with a `MockClock`).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Apply the `[cache]` configuration section.
    pub fn with_cache_config(mut self, config: &CacheConfig) -> Self {
        self.expand_window = config.expand_window;
        self.flag_name = config.flag_name.clone();
        self
    }

    /// Credential whose cache partition this service reads and writes.
    pub fn credential_id(&self) -> CredentialId {
        self.credential_id
    }

    /// Busy blocks across the selected calendars of this provider.
    ///
    /// Calendars of other integrations are ignored; if only those were
    /// selected the result is empty and the provider is not called. With no
    /// selection at all, every calendar the account can see is queried.
    pub async fn get_availability(
        &self,
        window: TimeRange,
        selected: &[SelectedCalendar],
    ) -> Result<Vec<BusyInterval>> {
        let integration = self.provider.integration();
        let calendar_ids: Vec<CalendarId> = selected
            .iter()
            .filter(|calendar| calendar.integration == integration)
            .map(|calendar| calendar.external_id.clone())
            .collect();

        if calendar_ids.is_empty() && !selected.is_empty() {
            debug!(integration, "only calendars of other integrations selected");
            return Ok(Vec::new());
        }

        let result = self.lookup_busy(window, calendar_ids).await;
        if let Err(err) = &result {
            error!(
                credential_id = %self.credential_id,
                integration,
                error = %err,
                "there was an error contacting the calendar provider"
            );
        }
        result
    }

    async fn lookup_busy(
        &self,
        window: TimeRange,
        calendar_ids: Vec<CalendarId>,
    ) -> Result<Vec<BusyInterval>> {
        let calendar_ids = if calendar_ids.is_empty() {
            self.provider
                .list_calendars()
                .await?
                .into_iter()
                .map(|calendar| calendar.external_id)
                .collect()
        } else {
            calendar_ids
        };

        let response = self.get_cache_or_fetch(&FreeBusyQuery::new(window, calendar_ids)).await?;
        flatten_busy(response, self.provider.integration())
    }

    /// Provider payload for `query`, served from cache when the flag allows.
    ///
    /// With the flag off the raw query goes straight to the provider and
    /// nothing is stored. With it on, the normalized request only names the
    /// cache entry; a miss fetches the caller's own window and stores that
    /// payload under the normalized key.
    pub async fn get_cache_or_fetch(&self, query: &FreeBusyQuery) -> Result<FreeBusyResponse> {
        if !self.flags.is_enabled(&self.flag_name, false).await? {
            warn!(flag = %self.flag_name, "calendar cache is disabled - skipping");
            return self.provider.query_free_busy(&FreeBusyRequest::from(query)).await;
        }

        let now = self.clock.now();
        let key = request_key(&normalize_query(query, now, self.expand_window))?;

        if let Some(entry) = self
            .cache
            .get(self.credential_id, &key, now)
            .await?
            .filter(|entry| is_hit(entry, now))
        {
            debug!(credential_id = %self.credential_id, %key, "availability cache hit");
            return serde_json::from_value(entry.value).map_err(|e| {
                CalCacheError::MalformedResponse(format!("cached free/busy payload: {e}"))
            });
        }

        debug!(credential_id = %self.credential_id, %key, "availability cache miss");
        self.fetch_and_store(&FreeBusyRequest::from(query), &key, now).await
    }

    /// Pre-fill the cache for "now until the end of next month" over the
    /// given calendars, regardless of the feature flag.
    ///
    /// The normalized request is what gets fetched here: it spans the first
    /// of this month to the first of the month after next, which contains
    /// the warm-up window.
    pub async fn fetch_availability_and_set_cache(
        &self,
        selected: &[SelectedCalendar],
    ) -> Result<()> {
        let now = self.clock.now();
        let query = FreeBusyQuery::new(
            warmup_window(now),
            selected.iter().map(|calendar| calendar.external_id.clone()).collect(),
        );
        let request = normalize_query(&query, now, self.expand_window);
        let key = request_key(&request)?;

        self.fetch_and_store(&request, &key, now).await?;
        debug!(
            credential_id = %self.credential_id,
            calendars = request.items.len(),
            "availability cache warmed"
        );
        Ok(())
    }

    /// Calendars visible to the connected account.
    pub async fn list_calendars(&self) -> Result<Vec<IntegrationCalendar>> {
        self.provider.list_calendars().await
    }

    /// Register a change-notification channel for `calendar`.
    ///
    /// Any channel already recorded on the calendar is stopped first. The
    /// returned channel is the metadata the caller keeps on the selected
    /// calendar; notifications arriving on it should trigger
    /// [`fetch_availability_and_set_cache`](Self::fetch_availability_and_set_cache).
    pub async fn watch_calendar(
        &self,
        calendar: &SelectedCalendar,
        target: &WebhookTarget,
    ) -> Result<WatchChannel> {
        self.unwatch_calendar(calendar).await;

        let channel = self.provider.watch_calendar(&calendar.external_id, target).await?;
        info!(
            credential_id = %self.credential_id,
            calendar = %calendar.external_id,
            channel_id = %channel.id,
            "calendar watch registered"
        );
        Ok(channel)
    }

    /// Stop the channel recorded on `calendar`, if any.
    ///
    /// A calendar without channel metadata is skipped. Provider failures are
    /// logged and swallowed; the channel expires on its own.
    pub async fn unwatch_calendar(&self, calendar: &SelectedCalendar) {
        let Some(channel) = &calendar.watch_channel else {
            info!(calendar = %calendar.external_id, "skipped unwatch: no channel metadata");
            return;
        };

        match self.provider.unwatch_calendar(channel).await {
            Ok(()) => debug!(
                credential_id = %self.credential_id,
                calendar = %calendar.external_id,
                channel_id = %channel.id,
                "calendar watch stopped"
            ),
            Err(err) => warn!(
                credential_id = %self.credential_id,
                calendar = %calendar.external_id,
                channel_id = %channel.id,
                error = %err,
                "failed to stop calendar watch"
            ),
        }
    }

    async fn fetch_and_store(
        &self,
        request: &FreeBusyRequest,
        key: &CacheKey,
        now: DateTime<Utc>,
    ) -> Result<FreeBusyResponse> {
        let response = self.provider.query_free_busy(request).await?;

        let value = serde_json::to_value(&response).map_err(|e| {
            CalCacheError::Internal(format!("failed to encode free/busy payload: {e}"))
        })?;
        let entry = self.cache.upsert(self.credential_id, key, value, now).await?;
        debug!(
            credential_id = %self.credential_id,
            %key,
            expires_at = %entry.expires_at,
            "availability cached"
        );

        Ok(response)
    }
}
