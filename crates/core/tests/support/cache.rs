use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calcache_core::availability::FreshnessPolicy;
use calcache_core::AvailabilityCache;
use calcache_domain::{CacheEntry, CacheKey, CalCacheError, CredentialId, Result as DomainResult};
use chrono::{DateTime, Utc};

/// In-memory `AvailabilityCache` that applies the real freshness policy.
///
/// Can be switched into a failing mode to exercise store outages.
#[derive(Default, Clone)]
pub struct MockAvailabilityCache {
    entries: Arc<Mutex<HashMap<(CredentialId, CacheKey), CacheEntry>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockAvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `CalCacheError::CacheStore`.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Raw row regardless of expiry.
    pub fn entry(&self, credential_id: CredentialId, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(&(credential_id, key.clone())).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn check(&self) -> DomainResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(CalCacheError::CacheStore("store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AvailabilityCache for MockAvailabilityCache {
    async fn get(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<CacheEntry>> {
        self.check()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(credential_id, key.clone()))
            .filter(|entry| entry.is_fresh(now))
            .cloned())
    }

    async fn upsert(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        value: serde_json::Value,
        now: DateTime<Utc>,
    ) -> DomainResult<CacheEntry> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let slot = (credential_id, key.clone());
        let policy = FreshnessPolicy::for_existing(entries.contains_key(&slot));
        let entry = CacheEntry {
            credential_id,
            key: key.clone(),
            value,
            expires_at: policy.expires_at(now),
        };
        entries.insert(slot, entry.clone());
        Ok(entry)
    }
}
