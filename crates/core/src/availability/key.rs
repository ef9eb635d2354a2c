//! Canonical cache keys for free/busy queries.
//!
//! A key is the JSON encoding of the normalized [`FreeBusyRequest`]: calendar
//! ids sorted, window expanded. Field order comes from the struct
//! declaration, never from insertion order, so equal requests always encode
//! to the same string.

use calcache_domain::{CacheKey, CalCacheError, FreeBusyQuery, FreeBusyRequest, Result};
use chrono::{DateTime, Utc};

use super::window::expand_window;

/// Sort calendar ids and expand the window (when `expand` is set).
///
/// Ids sort by UTF-8 byte order. Duplicate ids are kept; only their order
/// is normalized.
pub fn normalize_query(query: &FreeBusyQuery, now: DateTime<Utc>, expand: bool) -> FreeBusyRequest {
    let mut calendar_ids = query.calendar_ids.clone();
    calendar_ids.sort();
    let window = expand_window(query.window, now, expand);
    FreeBusyRequest::from_parts(window, &calendar_ids)
}

/// Key of an already-normalized request.
pub fn request_key(request: &FreeBusyRequest) -> Result<CacheKey> {
    serde_json::to_string(request)
        .map(CacheKey::new)
        .map_err(|e| CalCacheError::Internal(format!("failed to encode cache key: {e}")))
}

/// Normalize `query` and derive its cache key.
pub fn build_key(query: &FreeBusyQuery, now: DateTime<Utc>, expand: bool) -> Result<CacheKey> {
    request_key(&normalize_query(query, now, expand))
}
