//! # Calcache Domain
//!
//! Business domain types and models for the availability cache.
//!
//! This crate contains:
//! - Free/busy query, response and busy-interval types
//! - Cache entry and key types
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other calcache crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
