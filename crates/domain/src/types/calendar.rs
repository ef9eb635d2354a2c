//! Calendar identity types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque provider-side calendar identifier (e.g. `primary`, an email).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CalendarId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CalendarId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A calendar the user picked for conflict checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCalendar {
    pub external_id: CalendarId,
    /// Integration that owns the calendar (e.g. `google_calendar`).
    pub integration: String,
    /// Push channel currently registered for this calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_channel: Option<WatchChannel>,
}

impl SelectedCalendar {
    pub fn new(external_id: impl Into<CalendarId>, integration: impl Into<String>) -> Self {
        Self { external_id: external_id.into(), integration: integration.into(), watch_channel: None }
    }

    /// Attach the metadata of a registered push channel.
    #[must_use]
    pub fn with_watch_channel(mut self, channel: WatchChannel) -> Self {
        self.watch_channel = Some(channel);
        self
    }
}

/// Provider push channel that reports changes on one calendar.
///
/// `id` and `resource_id` together identify the channel when stopping it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchChannel {
    pub id: String,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_uri: Option<String>,
    /// Expiry in milliseconds since the epoch, as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

/// Endpoint that receives change notifications for watched calendars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTarget {
    pub address: String,
    /// Shared secret echoed back on every notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl WebhookTarget {
    /// Target without a verification token.
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), token: None }
    }

    /// Set the verification token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Calendar listed by a provider for the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationCalendar {
    pub external_id: CalendarId,
    pub integration: String,
    pub name: String,
    pub primary: bool,
    pub read_only: bool,
    pub email: String,
}
