//! Availability cache held in a `DashMap`.
//!
//! Entries are lost on restart. Suitable for a single process and for tests
//! that want real TTL semantics without SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use calcache_core::availability::{is_hit, FreshnessPolicy};
use calcache_core::AvailabilityCache;
use calcache_domain::{CacheEntry, CacheKey, CredentialId, Result};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

type Slot = (CredentialId, CacheKey);

/// Thread-safe in-memory [`AvailabilityCache`]. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendarCache {
    entries: Arc<DashMap<Slot, CacheEntry>>,
}

impl InMemoryCalendarCache {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries that are no longer fresh at `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| is_hit(entry, now));
        before - self.entries.len()
    }
}

#[async_trait]
impl AvailabilityCache for InMemoryCalendarCache {
    async fn get(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>> {
        Ok(self
            .entries
            .get(&(credential_id, key.clone()))
            .filter(|entry| is_hit(entry, now))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        value: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<CacheEntry> {
        let slot = self.entries.entry((credential_id, key.clone()));
        let policy = FreshnessPolicy::for_existing(matches!(slot, Entry::Occupied(_)));
        let entry =
            CacheEntry { credential_id, key: key.clone(), value, expires_at: policy.expires_at(now) };

        slot.insert(entry.clone());
        Ok(entry)
    }
}
