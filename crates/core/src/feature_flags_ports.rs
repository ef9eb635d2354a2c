//! Feature flags port for runtime toggles.
//!
//! The availability cache as a whole sits behind the `calendar-cache` flag.
//! Flags are read fresh on every top-level request; implementations should
//! not hold a stale value across calls.
//!
//! # Example
//!
//! ```no_run
//! use calcache_core::FeatureFlagsPort;
//!
//! async fn cache_enabled(flags: &impl FeatureFlagsPort) -> bool {
//!     flags.is_enabled("calendar-cache", false).await.unwrap_or(false)
//! }
//! ```

use async_trait::async_trait;
use calcache_domain::Result;

/// Feature flag data transfer object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlag {
    /// Unique flag identifier (e.g., "calendar-cache")
    pub flag_name: String,
    /// Whether the flag is currently enabled
    pub enabled: bool,
    /// Human-readable description of the flag's purpose
    pub description: Option<String>,
    /// Timestamp when the flag was last modified (Unix epoch seconds)
    pub updated_at: i64,
}

/// Port for querying and managing feature flags.
#[async_trait]
pub trait FeatureFlagsPort: Send + Sync {
    /// Check if a feature flag is enabled.
    ///
    /// Returns the `default` value if the flag doesn't exist.
    async fn is_enabled(&self, flag_name: &str, default: bool) -> Result<bool>;

    /// Set a feature flag's enabled status.
    ///
    /// Creates the flag if it doesn't exist (upsert semantics).
    async fn set_enabled(&self, flag_name: &str, enabled: bool) -> Result<()>;

    /// List all feature flags ordered by name.
    async fn list_all(&self) -> Result<Vec<FeatureFlag>>;
}
