//! Configuration structures
//!
//! Every section has serde defaults so that partial JSON/TOML files load.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CALENDAR_CACHE_FLAG, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_REQUEST_TIMEOUT_SECS, GOOGLE_CALENDAR_API_BASE,
};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub calendar: CalendarApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// SQLite database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path(), pool_size: default_pool_size() }
    }
}

/// Calendar provider HTTP settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarApiConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Total attempts per request. One means upstream failures surface
    /// immediately.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for CalendarApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Availability cache behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Round query windows to month boundaries before keying.
    #[serde(default = "default_true")]
    pub expand_window: bool,
    /// Feature flag that gates the cache as a whole.
    #[serde(default = "default_flag_name")]
    pub flag_name: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { expand_window: true, flag_name: default_flag_name() }
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_api_base_url() -> String {
    GOOGLE_CALENDAR_API_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_true() -> bool {
    true
}

fn default_flag_name() -> String {
    CALENDAR_CACHE_FLAG.to_string()
}
