//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use calcache_infra::database::DbManager;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Migrated SQLite database in a temporary directory that lives as long as
/// the fixture.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager =
            DbManager::new(temp_dir.path().join("test.db"), 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn path(&self) -> String {
        self.manager.path().display().to_string()
    }

    /// Count rows in `calendar_cache`.
    pub fn cache_rows(&self) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row("SELECT COUNT(*) FROM calendar_cache", [], |row| row.get(0))
            .expect("count query should succeed")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Minimal Google free/busy payload with one busy block per calendar.
pub fn free_busy_body(calendars: &[(&str, &str, &str)]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (id, start, end) in calendars {
        map.insert(
            (*id).to_string(),
            serde_json::json!({ "busy": [{ "start": start, "end": end }] }),
        );
    }
    serde_json::json!({ "kind": "calendar#freeBusy", "calendars": map })
}
