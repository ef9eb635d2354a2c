//! SQLite-backed availability cache.
//!
//! Rows live in `calendar_cache`, keyed by `(credential_id, key)`. Expiry is
//! stored as Unix epoch milliseconds and checked in the query.

use std::sync::Arc;

use async_trait::async_trait;
use calcache_core::availability::FreshnessPolicy;
use calcache_core::AvailabilityCache;
use calcache_domain::{CacheEntry, CacheKey, CalCacheError, CredentialId, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::debug;

use super::manager::{DbManager, SqliteConnection};
use super::map_join_error;
use crate::errors::conversions::cache_store_error;

/// Free/busy cache persisted in SQLite.
pub struct SqliteCalendarCacheRepository {
    db: Arc<DbManager>,
}

impl SqliteCalendarCacheRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Delete every row that expired before `now`. Returns the number of
    /// rows removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self
            .run(move |conn| {
                conn.execute(
                    "DELETE FROM calendar_cache WHERE expires_at < ?1",
                    params![now.timestamp_millis()],
                )
            })
            .await?;
        debug!(removed, "purged expired availability rows");
        Ok(removed)
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConnection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<T> {
            let conn = db.get_connection().map_err(cache_store_error)?;
            op(&conn).map_err(cache_store_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl AvailabilityCache for SqliteCalendarCacheRepository {
    async fn get(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>> {
        let lookup_key = key.clone();
        let row = self.run(move |conn| select_fresh(conn, credential_id, &lookup_key, now)).await?;

        row.map(|(value, expires_at)| decode_entry(credential_id, key.clone(), &value, expires_at))
            .transpose()
    }

    async fn upsert(
        &self,
        credential_id: CredentialId,
        key: &CacheKey,
        value: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<CacheEntry> {
        let text = value.to_string();
        let stored_key = key.clone();
        let expires_at = self
            .run(move |conn| upsert_row(conn, credential_id, &stored_key, &text, now))
            .await?;

        Ok(CacheEntry { credential_id, key: key.clone(), value, expires_at: from_millis(expires_at)? })
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn select_fresh(
    conn: &SqliteConnection,
    credential_id: CredentialId,
    key: &CacheKey,
    now: DateTime<Utc>,
) -> rusqlite::Result<Option<(String, i64)>> {
    conn.query_row(
        "SELECT value, expires_at FROM calendar_cache
         WHERE credential_id = ?1 AND key = ?2 AND expires_at >= ?3",
        params![credential_id.0, key.as_str(), now.timestamp_millis()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

/// Insert with the long TTL, or overwrite with the short one, in a single
/// statement. Returns the stored expiry.
fn upsert_row(
    conn: &SqliteConnection,
    credential_id: CredentialId,
    key: &CacheKey,
    value: &str,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    let long = FreshnessPolicy::LongIfAbsent.expires_at(now).timestamp_millis();
    let short = FreshnessPolicy::ShortIfPresent.expires_at(now).timestamp_millis();

    conn.query_row(
        "INSERT INTO calendar_cache (credential_id, key, value, expires_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(credential_id, key) DO UPDATE SET
            value = excluded.value,
            expires_at = ?5
         RETURNING expires_at",
        params![credential_id.0, key.as_str(), value, long, short],
        |row| row.get(0),
    )
}

fn decode_entry(
    credential_id: CredentialId,
    key: CacheKey,
    value: &str,
    expires_at: i64,
) -> Result<CacheEntry> {
    let value = serde_json::from_str(value)
        .map_err(|e| CalCacheError::CacheStore(format!("corrupt cache row for {key}: {e}")))?;
    Ok(CacheEntry { credential_id, key, value, expires_at: from_millis(expires_at)? })
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CalCacheError::CacheStore(format!("expiry out of range: {millis}")))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqliteCalendarCacheRepository, Arc<DbManager>, TempDir) {
        let dir = TempDir::new().expect("temp dir created");
        let db = Arc::new(DbManager::new(dir.path().join("cache.db"), 2).expect("manager created"));
        db.run_migrations().expect("migrations run");
        (SqliteCalendarCacheRepository::new(Arc::clone(&db)), db, dir)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_then_overwrite_uses_asymmetric_ttl() {
        let (repo, _db, _dir) = setup();
        let key = CacheKey::new("k");

        let first = repo.upsert(CredentialId(1), &key, json!({"v": 1}), now()).await.unwrap();
        assert_eq!(first.expires_at, now() + Duration::days(30));

        let later = now() + Duration::hours(1);
        let second = repo.upsert(CredentialId(1), &key, json!({"v": 2}), later).await.unwrap();
        assert_eq!(second.expires_at, later + Duration::minutes(1));

        let stored = repo.get(CredentialId(1), &key, later).await.unwrap().unwrap();
        assert_eq!(stored.value, json!({"v": 2}));
        assert_eq!(stored.expires_at, later + Duration::minutes(1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn expired_rows_are_misses_and_purged() {
        let (repo, _db, _dir) = setup();
        let key = CacheKey::new("k");
        repo.upsert(CredentialId(1), &key, json!({}), now()).await.unwrap();

        let at_expiry = now() + Duration::days(30);
        assert!(repo.get(CredentialId(1), &key, at_expiry).await.unwrap().is_some());

        let after = at_expiry + Duration::milliseconds(1);
        assert!(repo.get(CredentialId(1), &key, after).await.unwrap().is_none());
        assert_eq!(repo.purge_expired(after).await.unwrap(), 1);
        assert_eq!(repo.purge_expired(after).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn credentials_do_not_share_rows() {
        let (repo, _db, _dir) = setup();
        let key = CacheKey::new("shared");

        repo.upsert(CredentialId(1), &key, json!("one"), now()).await.unwrap();
        assert!(repo.get(CredentialId(2), &key, now()).await.unwrap().is_none());

        let second = repo.upsert(CredentialId(2), &key, json!("two"), now()).await.unwrap();
        assert_eq!(second.expires_at, now() + Duration::days(30));

        let first = repo.get(CredentialId(1), &key, now()).await.unwrap().unwrap();
        assert_eq!(first.value, json!("one"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn corrupt_rows_surface_as_store_errors() {
        let (repo, db, _dir) = setup();
        let conn = db.get_connection().unwrap();
        conn.execute(
            "INSERT INTO calendar_cache (credential_id, key, value, expires_at) VALUES (1, 'k', '{', ?1)",
            params![(now() + Duration::days(1)).timestamp_millis()],
        )
        .unwrap();
        drop(conn);

        let err = repo.get(CredentialId(1), &CacheKey::new("k"), now()).await.unwrap_err();
        assert!(matches!(err, CalCacheError::CacheStore(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_table_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(DbManager::new(dir.path().join("bare.db"), 1).unwrap());
        let repo = SqliteCalendarCacheRepository::new(db);

        let err = repo.get(CredentialId(1), &CacheKey::new("k"), now()).await.unwrap_err();
        assert!(matches!(err, CalCacheError::CacheStore(_)));
    }
}
