//! # Calcache Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Free/busy window expansion and cache key normalization
//! - Cache freshness policy and busy-time aggregation
//! - Port/adapter interfaces (traits)
//! - The availability use case ([`AvailabilityService`])
//!
//! ## Architecture Principles
//! - Only depends on `calcache-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod clock;

// Infrastructure ports
pub mod feature_flags_ports;

pub use availability::ports::{AvailabilityCache, FreeBusyProvider};
pub use availability::AvailabilityService;
pub use clock::{Clock, MockClock, SystemClock};
pub use feature_flags_ports::{FeatureFlag, FeatureFlagsPort};
