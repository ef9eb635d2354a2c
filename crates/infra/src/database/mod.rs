//! SQLite-backed storage

pub mod calendar_cache_repository;
pub mod feature_flags_repository;
pub mod manager;

pub use calendar_cache_repository::SqliteCalendarCacheRepository;
pub use feature_flags_repository::SqliteFeatureFlagsRepository;
pub use manager::{DbManager, SqliteConnection};

use calcache_domain::CalCacheError;
use tokio::task;

/// Map a `JoinError` from `spawn_blocking` to a domain error.
pub(crate) fn map_join_error(err: task::JoinError) -> CalCacheError {
    if err.is_cancelled() {
        CalCacheError::Internal("blocking task cancelled".into())
    } else {
        CalCacheError::Internal(format!("blocking task failed: {err}"))
    }
}
