//! SQLite-backed feature flags repository.
//!
//! Flags are read straight from the table on every call so a toggle takes
//! effect on the next request.

use std::sync::Arc;

use async_trait::async_trait;
use calcache_core::{FeatureFlag, FeatureFlagsPort};
use calcache_domain::{CalCacheError, Result};
use rusqlite::{params, OptionalExtension};
use tokio::task;

use super::manager::{DbManager, SqliteConnection};
use super::map_join_error;
use crate::errors::InfraError;

/// Feature flags stored in the `feature_flags` table.
pub struct SqliteFeatureFlagsRepository {
    db: Arc<DbManager>,
}

impl SqliteFeatureFlagsRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConnection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<T> {
            let conn = db.get_connection()?;
            op(&conn).map_err(|err| CalCacheError::from(InfraError::from(err)))
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl FeatureFlagsPort for SqliteFeatureFlagsRepository {
    async fn is_enabled(&self, flag_name: &str, default: bool) -> Result<bool> {
        let flag_name = flag_name.to_string();
        self.run(move |conn| query_flag_enabled(conn, &flag_name, default)).await
    }

    async fn set_enabled(&self, flag_name: &str, enabled: bool) -> Result<()> {
        let flag_name = flag_name.to_string();
        self.run(move |conn| update_flag_enabled(conn, &flag_name, enabled)).await
    }

    async fn list_all(&self) -> Result<Vec<FeatureFlag>> {
        self.run(query_all_flags).await
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn query_flag_enabled(
    conn: &SqliteConnection,
    flag_name: &str,
    default: bool,
) -> rusqlite::Result<bool> {
    let enabled = conn
        .query_row(
            "SELECT enabled FROM feature_flags WHERE flag_name = ?1",
            params![flag_name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(enabled.map_or(default, |value| value != 0))
}

fn update_flag_enabled(
    conn: &SqliteConnection,
    flag_name: &str,
    enabled: bool,
) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO feature_flags (flag_name, enabled, description, updated_at)
         VALUES (?1, ?2, NULL, ?3)
         ON CONFLICT(flag_name) DO UPDATE SET
            enabled = excluded.enabled,
            updated_at = excluded.updated_at",
        params![flag_name, i64::from(enabled), now],
    )?;
    Ok(())
}

fn query_all_flags(conn: &SqliteConnection) -> rusqlite::Result<Vec<FeatureFlag>> {
    let mut stmt = conn.prepare(
        "SELECT flag_name, enabled, description, updated_at
         FROM feature_flags
         ORDER BY flag_name",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(FeatureFlag {
            flag_name: row.get(0)?,
            enabled: row.get::<_, i64>(1)? != 0,
            description: row.get(2)?,
            updated_at: row.get(3)?,
        })
    })?;
    rows.collect()
}
