//! Google Calendar free/busy provider

use async_trait::async_trait;
use calcache_core::FreeBusyProvider;
use calcache_domain::constants::{GOOGLE_CALENDAR_INTEGRATION, WATCH_CHANNEL_TTL_SECS};
use calcache_domain::{
    CalCacheError, CalendarApiConfig, CalendarId, FreeBusyRequest, FreeBusyResponse,
    IntegrationCalendar, Result, WatchChannel, WebhookTarget,
};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::http::HttpClient;

const CALENDAR_LIST_FIELDS: &str = "items(id,summary,primary,accessRole)";
const WEB_HOOK_CHANNEL: &str = "web_hook";

/// Google Calendar v3 API client for free/busy queries.
pub struct GoogleCalendarProvider {
    http: HttpClient,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarProvider {
    pub fn new(http: HttpClient, base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, access_token: access_token.into() }
    }

    pub fn from_config(config: &CalendarApiConfig, access_token: impl Into<String>) -> Result<Self> {
        Ok(Self::new(HttpClient::from_config(config)?, &config.api_base_url, access_token))
    }

    /// `{base}/calendars/{calendar_id}/events/watch`, with the id
    /// percent-encoded as one path segment.
    fn events_watch_url(&self, calendar_id: &CalendarId) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalCacheError::Config(format!("invalid calendar API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| CalCacheError::Config(format!("calendar API base URL {} has no path", self.base_url)))?
            .extend(["calendars", calendar_id.as_str(), "events", "watch"]);
        Ok(url)
    }
}

#[async_trait]
impl FreeBusyProvider for GoogleCalendarProvider {
    fn integration(&self) -> &str {
        GOOGLE_CALENDAR_INTEGRATION
    }

    async fn query_free_busy(&self, request: &FreeBusyRequest) -> Result<FreeBusyResponse> {
        debug!(
            time_min = %request.time_min,
            time_max = %request.time_max,
            calendars = request.items.len(),
            "querying google free/busy"
        );

        let builder = self
            .http
            .request(Method::POST, format!("{}/freeBusy", self.base_url))
            .bearer_auth(&self.access_token)
            .json(request);

        self.http.send_json(builder).await
    }

    async fn list_calendars(&self) -> Result<Vec<IntegrationCalendar>> {
        let builder = self
            .http
            .request(Method::GET, format!("{}/users/me/calendarList", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("fields", CALENDAR_LIST_FIELDS)]);

        let list: GoogleCalendarList = self.http.send_json(builder).await?;
        let calendars: Vec<_> =
            list.items.unwrap_or_default().into_iter().map(GoogleCalendarListEntry::into_calendar).collect();

        debug!(calendars = calendars.len(), "listed google calendars");
        Ok(calendars)
    }

    async fn watch_calendar(
        &self,
        calendar_id: &CalendarId,
        target: &WebhookTarget,
    ) -> Result<WatchChannel> {
        let body = GoogleWatchRequest {
            id: Uuid::new_v4().to_string(),
            kind: WEB_HOOK_CHANNEL,
            address: &target.address,
            token: target.token.as_deref(),
            params: GoogleWatchParams { ttl: WATCH_CHANNEL_TTL_SECS.to_string() },
        };
        debug!(calendar = %calendar_id, channel_id = %body.id, "opening google watch channel");

        let builder = self
            .http
            .request(Method::POST, self.events_watch_url(calendar_id)?)
            .bearer_auth(&self.access_token)
            .json(&body);

        self.http.send_json(builder).await
    }

    async fn unwatch_calendar(&self, channel: &WatchChannel) -> Result<()> {
        debug!(channel_id = %channel.id, "stopping google watch channel");

        let builder = self
            .http
            .request(Method::POST, format!("{}/channels/stop", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&GoogleStopRequest { id: &channel.id, resource_id: &channel.resource_id });

        self.http.send_no_content(builder).await
    }
}

// Google API request types

#[derive(Debug, Serialize)]
struct GoogleWatchRequest<'a> {
    id: String,
    #[serde(rename = "type")]
    kind: &'a str,
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    params: GoogleWatchParams,
}

/// Channel lifetime in seconds, sent as a string.
#[derive(Debug, Serialize)]
struct GoogleWatchParams {
    ttl: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleStopRequest<'a> {
    id: &'a str,
    resource_id: &'a str,
}

// Google API response types

#[derive(Debug, Deserialize)]
struct GoogleCalendarList {
    items: Option<Vec<GoogleCalendarListEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCalendarListEntry {
    id: Option<String>,
    summary: Option<String>,
    primary: Option<bool>,
    access_role: Option<String>,
}

impl GoogleCalendarListEntry {
    fn into_calendar(self) -> IntegrationCalendar {
        let read_only = !matches!(self.access_role.as_deref(), Some("writer" | "owner"));
        IntegrationCalendar {
            external_id: CalendarId::new(self.id.clone().unwrap_or_else(|| "No id".to_string())),
            integration: GOOGLE_CALENDAR_INTEGRATION.to_string(),
            name: self.summary.unwrap_or_else(|| "No name".to_string()),
            primary: self.primary.unwrap_or(false),
            read_only,
            email: self.id.unwrap_or_default(),
        }
    }
}
