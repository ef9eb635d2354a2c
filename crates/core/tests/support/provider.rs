use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calcache_core::FreeBusyProvider;
use calcache_domain::{
    CalCacheError, CalendarId, FreeBusyCalendar, FreeBusyRequest, FreeBusyResponse,
    IntegrationCalendar, Result as DomainResult, TimePeriod, WatchChannel, WebhookTarget,
};

/// Scripted `FreeBusyProvider`.
///
/// Returns the same canned response for every query and records each request
/// it receives, so tests can assert on call counts and request shape.
#[derive(Clone)]
pub struct MockFreeBusyProvider {
    integration: String,
    response: Arc<Mutex<DomainResult<FreeBusyResponse>>>,
    calendars: Arc<Mutex<Vec<IntegrationCalendar>>>,
    requests: Arc<Mutex<Vec<FreeBusyRequest>>>,
    list_calls: Arc<Mutex<usize>>,
    watched: Arc<Mutex<Vec<(CalendarId, WebhookTarget)>>>,
    stopped: Arc<Mutex<Vec<WatchChannel>>>,
    stop_error: Arc<Mutex<Option<CalCacheError>>>,
}

impl MockFreeBusyProvider {
    pub fn new(integration: &str) -> Self {
        Self {
            integration: integration.to_string(),
            response: Arc::new(Mutex::new(Ok(FreeBusyResponse::default()))),
            calendars: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            list_calls: Arc::new(Mutex::new(0)),
            watched: Arc::new(Mutex::new(Vec::new())),
            stopped: Arc::new(Mutex::new(Vec::new())),
            stop_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Respond with one calendar holding a single busy block.
    pub fn with_busy(self, calendar: &str, start: &str, end: &str) -> Self {
        let mut calendars = std::collections::BTreeMap::new();
        calendars.insert(
            calendar.to_string(),
            FreeBusyCalendar {
                busy: Some(vec![TimePeriod {
                    start: Some(start.to_string()),
                    end: Some(end.to_string()),
                }]),
                errors: None,
            },
        );
        self.respond_with(Ok(FreeBusyResponse { calendars: Some(calendars), ..Default::default() }))
    }

    pub fn respond_with(self, response: DomainResult<FreeBusyResponse>) -> Self {
        *self.response.lock().unwrap() = response;
        self
    }

    pub fn fail_with(self, error: CalCacheError) -> Self {
        self.respond_with(Err(error))
    }

    pub fn with_calendar(self, calendar: IntegrationCalendar) -> Self {
        self.calendars.lock().unwrap().push(calendar);
        self
    }

    pub fn requests(&self) -> Vec<FreeBusyRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn list_count(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    /// Make every channel stop fail with `error`.
    pub fn fail_stop_with(self, error: CalCacheError) -> Self {
        *self.stop_error.lock().unwrap() = Some(error);
        self
    }

    pub fn watched(&self) -> Vec<(CalendarId, WebhookTarget)> {
        self.watched.lock().unwrap().clone()
    }

    pub fn stopped(&self) -> Vec<WatchChannel> {
        self.stopped.lock().unwrap().clone()
    }
}

/// Channel metadata in the shape the provider hands back.
pub fn channel(id: &str) -> WatchChannel {
    WatchChannel {
        id: id.to_string(),
        resource_id: format!("resource-{id}"),
        resource_uri: None,
        expiration: None,
    }
}

#[async_trait]
impl FreeBusyProvider for MockFreeBusyProvider {
    fn integration(&self) -> &str {
        &self.integration
    }

    async fn query_free_busy(&self, request: &FreeBusyRequest) -> DomainResult<FreeBusyResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.lock().unwrap().clone()
    }

    async fn list_calendars(&self) -> DomainResult<Vec<IntegrationCalendar>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self.calendars.lock().unwrap().clone())
    }

    async fn watch_calendar(
        &self,
        calendar_id: &CalendarId,
        target: &WebhookTarget,
    ) -> DomainResult<WatchChannel> {
        let mut watched = self.watched.lock().unwrap();
        watched.push((calendar_id.clone(), target.clone()));
        Ok(channel(&format!("channel-{}", watched.len())))
    }

    async fn unwatch_calendar(&self, channel: &WatchChannel) -> DomainResult<()> {
        self.stopped.lock().unwrap().push(channel.clone());
        match self.stop_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
