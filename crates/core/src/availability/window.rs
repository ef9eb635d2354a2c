//! Month-aligned expansion of free/busy query windows.
//!
//! Booking pages ask for "this month" or "the next two months" and the exact
//! bounds drift by a few days while the user browses. Rounding both bounds to
//! the first instant of a month (biased towards the current month) lets those
//! drifting requests land on the same cache key.
//!
//! All arithmetic is in UTC. Month offsets carry into the next year.

use calcache_domain::constants::{BROWSE_AHEAD_MONTHS, RANGE_AHEAD_MONTHS};
use calcache_domain::TimeRange;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Expand a window start.
///
/// Browsing into next month (same year, exactly one month after `now`)
/// snaps back to the start of the current month. Anything else snaps to the
/// start of its own month.
pub fn expand_start(requested: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if requested.year() == now.year() && month_delta(requested, now) == BROWSE_AHEAD_MONTHS {
        return month_start_or(now.year(), month0(now), requested);
    }
    month_start_or(requested.year(), month0(requested), requested)
}

/// Expand a window end.
///
/// Ends falling one or two months after `now` (same year) all map to the
/// start of the month two months after `now`. Anything else snaps to the
/// start of its own month.
pub fn expand_end(requested: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let delta = month_delta(requested, now);
    if requested.year() == now.year() && (delta == BROWSE_AHEAD_MONTHS || delta == RANGE_AHEAD_MONTHS)
    {
        return month_start_or(now.year(), month0(now) + RANGE_AHEAD_MONTHS, requested);
    }
    month_start_or(requested.year(), month0(requested), requested)
}

/// Expand both bounds, or pass the window through untouched when expansion
/// is off.
pub fn expand_window(window: TimeRange, now: DateTime<Utc>, expand: bool) -> TimeRange {
    if !expand {
        return window;
    }
    TimeRange::new(expand_start(window.start, now), expand_end(window.end, now))
}

/// Window used to pre-warm the cache: from `now` to midnight of the last day
/// of next month.
pub fn warmup_window(now: DateTime<Utc>) -> TimeRange {
    let end = first_of_month(now.year(), month0(now) + RANGE_AHEAD_MONTHS)
        .map_or(now, |start| start - Duration::days(1));
    TimeRange::new(now, end)
}

/// First instant of a month; `month0` may fall outside `0..12` and carries
/// into neighbouring years.
pub(crate) fn first_of_month(year: i32, month0: i32) -> Option<DateTime<Utc>> {
    let total = i64::from(year) * 12 + i64::from(month0);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

// Unrepresentable month starts only occur at the edges of chrono's range;
// the requested bound is kept as-is there.
fn month_start_or(year: i32, month0: i32, fallback: DateTime<Utc>) -> DateTime<Utc> {
    first_of_month(year, month0).unwrap_or(fallback)
}

fn month0(ts: DateTime<Utc>) -> i32 {
    ts.month0() as i32
}

// Month-of-year difference only; the year check is done by the callers.
fn month_delta(requested: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    month0(requested) - month0(now)
}
