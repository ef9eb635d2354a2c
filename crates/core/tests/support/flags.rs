use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calcache_core::{FeatureFlag, FeatureFlagsPort};
use calcache_domain::Result as DomainResult;

/// In-memory `FeatureFlagsPort` counting reads.
#[derive(Default, Clone)]
pub struct MockFeatureFlags {
    flags: Arc<Mutex<BTreeMap<String, bool>>>,
    reads: Arc<Mutex<usize>>,
}

impl MockFeatureFlags {
    pub fn with_flag(flag_name: &str, enabled: bool) -> Self {
        let flags = Self::default();
        flags.flags.lock().unwrap().insert(flag_name.to_string(), enabled);
        flags
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl FeatureFlagsPort for MockFeatureFlags {
    async fn is_enabled(&self, flag_name: &str, default: bool) -> DomainResult<bool> {
        *self.reads.lock().unwrap() += 1;
        Ok(self.flags.lock().unwrap().get(flag_name).copied().unwrap_or(default))
    }

    async fn set_enabled(&self, flag_name: &str, enabled: bool) -> DomainResult<()> {
        self.flags.lock().unwrap().insert(flag_name.to_string(), enabled);
        Ok(())
    }

    async fn list_all(&self) -> DomainResult<Vec<FeatureFlag>> {
        Ok(self
            .flags
            .lock()
            .unwrap()
            .iter()
            .map(|(name, enabled)| FeatureFlag {
                flag_name: name.clone(),
                enabled: *enabled,
                description: None,
                updated_at: 0,
            })
            .collect())
    }
}
