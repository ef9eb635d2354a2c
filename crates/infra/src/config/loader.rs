//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Read a `.env` file if one exists (`dotenvy`)
//! 2. Load from `CALCACHE_*` environment variables when `CALCACHE_DB_PATH`
//!    is set
//! 3. Otherwise load the first config file found by [`probe_config_paths`]
//! 4. Otherwise use built-in defaults
//!
//! ## Environment Variables
//! - `CALCACHE_DB_PATH`: SQLite file path (required for env loading)
//! - `CALCACHE_DB_POOL_SIZE`: Connection pool size
//! - `CALCACHE_CALENDAR_API_BASE_URL`: Calendar API base URL
//! - `CALCACHE_CALENDAR_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `CALCACHE_CALENDAR_MAX_ATTEMPTS`: Attempts per provider request
//! - `CALCACHE_CACHE_EXPAND_WINDOW`: Month-align query windows (true/false)
//! - `CALCACHE_CACHE_FLAG_NAME`: Feature flag gating the cache

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calcache_domain::{CacheConfig, CalCacheError, CalendarApiConfig, Config, DatabaseConfig, Result};

const FILE_STEMS: [&str; 2] = ["config", "calcache"];

/// Load configuration with automatic fallback strategy.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            return Ok(config);
        }
        Err(e) => tracing::debug!(error = %e, "environment incomplete, trying file"),
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("no configuration found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from `CALCACHE_*` environment variables.
///
/// `CALCACHE_DB_PATH` is required; every other variable falls back to its
/// default.
pub fn load_from_env() -> Result<Config> {
    let database = DatabaseConfig::default();
    let calendar = CalendarApiConfig::default();
    let cache = CacheConfig::default();

    Ok(Config {
        database: DatabaseConfig {
            path: env_var("CALCACHE_DB_PATH")?,
            pool_size: env_parse("CALCACHE_DB_POOL_SIZE", database.pool_size)?,
        },
        calendar: CalendarApiConfig {
            api_base_url: std::env::var("CALCACHE_CALENDAR_API_BASE_URL")
                .unwrap_or(calendar.api_base_url),
            request_timeout_secs: env_parse(
                "CALCACHE_CALENDAR_TIMEOUT_SECS",
                calendar.request_timeout_secs,
            )?,
            max_attempts: env_parse("CALCACHE_CALENDAR_MAX_ATTEMPTS", calendar.max_attempts)?,
        },
        cache: CacheConfig {
            expand_window: env_bool("CALCACHE_CACHE_EXPAND_WINDOW", cache.expand_window),
            flag_name: std::env::var("CALCACHE_CACHE_FLAG_NAME").unwrap_or(cache.flag_name),
        },
    })
}

/// Load configuration from a JSON or TOML file.
///
/// If `path` is `None`, probes the standard locations.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) if !p.exists() => {
            return Err(CalCacheError::Config(format!("Config file not found: {}", p.display())));
        }
        Some(p) => p,
        None => probe_config_paths().ok_or_else(|| {
            CalCacheError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalCacheError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, choosing the format by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalCacheError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalCacheError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CalCacheError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing `config.{json,toml}` or `calcache.{json,toml}` in the
/// working directory, then next to the executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| {
            FILE_STEMS.iter().flat_map(move |stem| {
                ["json", "toml"].into_iter().map(move |ext| dir.join(format!("{stem}.{ext}")))
            })
        })
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| CalCacheError::Config(format!("Missing required environment variable: {key}")))
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CalCacheError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
