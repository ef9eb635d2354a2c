//! # Calcache Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite implementations of the availability cache and feature flags
//! - An in-process cache store for single-node deployments and tests
//! - The Google Calendar free/busy provider over HTTP
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `calcache-core`
//! - Contains all "impure" code (I/O, HTTP, SQLite)

pub mod cache;
pub mod config;
pub mod context;
pub mod database;
pub mod errors;
pub mod flags;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use cache::InMemoryCalendarCache;
pub use context::AvailabilityContext;
pub use database::{DbManager, SqliteCalendarCacheRepository, SqliteFeatureFlagsRepository};
pub use errors::InfraError;
pub use flags::StaticFeatureFlags;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::calendar::GoogleCalendarProvider;

