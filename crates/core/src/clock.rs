//! Wall-clock abstraction
//!
//! Window expansion and cache expiry both depend on "now"; services take a
//! [`Clock`] so tests can pin it.
//!
//! ```
//! use calcache_core::{Clock, MockClock};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let clock = MockClock::new(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
//! clock.advance(Duration::minutes(2));
//! assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 3, 15, 0, 2, 0).unwrap());
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current UTC time
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests
///
/// Clones share the same instant.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Clock frozen at `start` until moved.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Move the clock forward (or backward, with a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to `to`.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
