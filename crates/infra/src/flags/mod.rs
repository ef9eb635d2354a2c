//! In-memory feature flag source
//!
//! For deployments that toggle the cache from configuration rather than the
//! `feature_flags` table, and for tests.

use std::sync::Arc;

use async_trait::async_trait;
use calcache_core::{FeatureFlag, FeatureFlagsPort};
use calcache_domain::Result;
use dashmap::DashMap;

/// Feature flags held in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureFlags {
    flags: Arc<DashMap<String, FeatureFlag>>,
}

impl StaticFeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single flag set.
    pub fn with_flag(flag_name: impl Into<String>, enabled: bool) -> Self {
        let flags = Self::new();
        flags.set(flag_name.into(), enabled);
        flags
    }

    fn set(&self, flag_name: String, enabled: bool) {
        let updated_at = chrono::Utc::now().timestamp();
        self.flags
            .entry(flag_name.clone())
            .and_modify(|flag| {
                flag.enabled = enabled;
                flag.updated_at = updated_at;
            })
            .or_insert(FeatureFlag { flag_name, enabled, description: None, updated_at });
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for StaticFeatureFlags {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let flags = Self::new();
        for (name, enabled) in iter {
            flags.set(name.into(), enabled);
        }
        flags
    }
}

#[async_trait]
impl FeatureFlagsPort for StaticFeatureFlags {
    async fn is_enabled(&self, flag_name: &str, default: bool) -> Result<bool> {
        Ok(self.flags.get(flag_name).map_or(default, |flag| flag.enabled))
    }

    async fn set_enabled(&self, flag_name: &str, enabled: bool) -> Result<()> {
        self.set(flag_name.to_string(), enabled);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<FeatureFlag>> {
        let mut flags: Vec<FeatureFlag> =
            self.flags.iter().map(|entry| entry.value().clone()).collect();
        flags.sort_by(|a, b| a.flag_name.cmp(&b.flag_name));
        Ok(flags)
    }
}
