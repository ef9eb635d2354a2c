//! Dependency wiring for the availability service

use std::sync::Arc;

use calcache_core::{AvailabilityService, FeatureFlagsPort, FreeBusyProvider};
use calcache_domain::{Config, CredentialId, Result};
use tracing::info;

use crate::database::{DbManager, SqliteCalendarCacheRepository, SqliteFeatureFlagsRepository};
use crate::integrations::calendar::GoogleCalendarProvider;

/// Shared infrastructure for building per-credential availability services.
pub struct AvailabilityContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub cache: Arc<SqliteCalendarCacheRepository>,
    pub feature_flags: Arc<dyn FeatureFlagsPort>,
}

impl AvailabilityContext {
    /// Open the configured database, apply the schema and build the shared
    /// adapters.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let cache = Arc::new(SqliteCalendarCacheRepository::new(Arc::clone(&db)));
        let feature_flags: Arc<dyn FeatureFlagsPort> =
            Arc::new(SqliteFeatureFlagsRepository::new(Arc::clone(&db)));

        info!(
            db_path = %db.path().display(),
            flag = %config.cache.flag_name,
            "availability context ready"
        );

        Ok(Self { config, db, cache, feature_flags })
    }

    /// Service for `credential_id` backed by an arbitrary provider.
    pub fn service_for(
        &self,
        credential_id: CredentialId,
        provider: Arc<dyn FreeBusyProvider>,
    ) -> AvailabilityService {
        AvailabilityService::new(
            credential_id,
            provider,
            self.cache.clone(),
            Arc::clone(&self.feature_flags),
        )
        .with_cache_config(&self.config.cache)
    }

    /// Service for `credential_id` talking to Google Calendar with
    /// `access_token`.
    pub fn google_service(
        &self,
        credential_id: CredentialId,
        access_token: impl Into<String>,
    ) -> Result<AvailabilityService> {
        let provider = GoogleCalendarProvider::from_config(&self.config.calendar, access_token)?;
        Ok(self.service_for(credential_id, Arc::new(provider)))
    }
}
