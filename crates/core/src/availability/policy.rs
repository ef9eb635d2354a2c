//! Cache freshness policy.
//!
//! First write for a key is trusted for a month. A write over an existing key
//! means the caller had to refetch, so the refreshed value only lives for a
//! minute.

use calcache_domain::constants::{CACHE_INITIAL_TTL_SECS, CACHE_REFRESH_TTL_SECS};
use calcache_domain::CacheEntry;
use chrono::{DateTime, Duration, Utc};

/// TTL rule applied by a cache upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessPolicy {
    /// No entry existed: keep for [`CACHE_INITIAL_TTL_SECS`].
    LongIfAbsent,
    /// Entry existed (fresh or not): keep for [`CACHE_REFRESH_TTL_SECS`].
    ShortIfPresent,
}

impl FreshnessPolicy {
    /// Pick the rule from whether a row for the key already exists.
    pub fn for_existing(exists: bool) -> Self {
        if exists {
            Self::ShortIfPresent
        } else {
            Self::LongIfAbsent
        }
    }

    /// Lifetime granted by this rule.
    pub fn ttl(self) -> Duration {
        match self {
            Self::LongIfAbsent => Duration::seconds(CACHE_INITIAL_TTL_SECS),
            Self::ShortIfPresent => Duration::seconds(CACHE_REFRESH_TTL_SECS),
        }
    }

    /// Expiry for a row written at `now`.
    pub fn expires_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.ttl()
    }
}

/// Whether `entry` may be served at `now`.
pub fn is_hit(entry: &CacheEntry, now: DateTime<Utc>) -> bool {
    entry.is_fresh(now)
}
