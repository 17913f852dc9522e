use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::normalize::timestamps::parse_timestamp;

fn non_negative_ms(d: Duration) -> i64 {
    i64::try_from(d.whole_milliseconds().max(0)).unwrap_or(i64::MAX)
}

/// Elapsed handling time in milliseconds; `None` is the explicit "unknown" result.
///
/// - Closed incidents stop at `updated_at` when it is present and parses; every other case
///   measures up to the caller-supplied `now`.
/// - Unparseable or missing `created_at` yields `None`.
/// - The result is clamped at zero, so timestamps in the future never produce a negative span.
pub fn elapsed_ms(
    created_at: Option<&str>,
    updated_at: Option<&str>,
    is_closed: bool,
    now: OffsetDateTime,
) -> Option<i64> {
    let Some(start) = created_at.and_then(parse_timestamp) else {
        debug!(created_at = ?created_at, "createdAt missing or unparseable; elapsed is unknown");
        return None;
    };

    let end = if is_closed {
        match updated_at.and_then(parse_timestamp) {
            Some(end) => end,
            None => {
                // Closed incidents should carry updatedAt; see VALIDATION_CLOSED_WITHOUT_UPDATED_AT.
                debug!(updated_at = ?updated_at, "closed incident without usable updatedAt; measuring to now");
                now
            }
        }
    } else {
        now
    };

    Some(non_negative_ms(end - start))
}
