//! Free/busy availability with a month-bucketed cache in front of the
//! provider.
//!
//! Leaves first: [`window`] expands query bounds to month starts, [`key`]
//! turns a query into a canonical [`CacheKey`](calcache_domain::CacheKey),
//! [`policy`] decides expiry, [`aggregate`] flattens provider payloads, and
//! [`service`] wires them to the ports in [`ports`].

pub mod aggregate;
pub mod key;
pub mod policy;
pub mod ports;
pub mod service;
pub mod window;

pub use aggregate::flatten_busy;
pub use key::{build_key, normalize_query, request_key};
pub use policy::{is_hit, FreshnessPolicy};
pub use service::AvailabilityService;
pub use window::{expand_end, expand_start, expand_window, warmup_window};
