//! Flattening of per-calendar free/busy payloads.

use calcache_domain::{BusyInterval, CalCacheError, FreeBusyResponse, Result};

/// Collect every busy block of every calendar into one list.
///
/// Order follows the response's calendar map and is not meaningful to
/// callers. A response without `calendars` is an error, while an empty map
/// is a valid "nothing busy".
pub fn flatten_busy(response: FreeBusyResponse, provider: &str) -> Result<Vec<BusyInterval>> {
    let calendars = response.calendars.ok_or_else(|| CalCacheError::no_response(provider))?;

    Ok(calendars
        .into_values()
        .flat_map(|calendar| calendar.busy.unwrap_or_default())
        .map(BusyInterval::from)
        .collect())
}
