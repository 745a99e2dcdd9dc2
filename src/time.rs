//! Sentinel timestamps and second-precision truncation.
//!
//! Memento-datetime comparisons must be deterministic at whole-second
//! resolution, so every timestamp that enters or leaves the store passes
//! through [`truncate_to_seconds`] first.

use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Sentinel for "still active" rows. Exported so callers can compare against
/// it directly rather than guessing at the far-future instant.
pub fn no_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Sentinel used when a caller asks to delete everything after the
/// beginning of time.
pub fn no_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Truncate a timestamp to whole seconds, zeroing nanoseconds.
///
/// This is a compatibility requirement, not an optimisation: row comparisons
/// and the identity-key uniqueness constraint depend on bitwise equality of
/// truncated timestamps.
pub fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_nanosecond(0)
        .unwrap_or(instant)
        .with_timezone(&Utc)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn truncates_nanoseconds() {
        let with_nanos = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::nanoseconds(123_456_789);
        let truncated = truncate_to_seconds(with_nanos);
        assert_eq!(truncated.nanosecond(), 0);
        assert_eq!(truncated.second(), with_nanos.second());
    }

    #[test]
    fn sentinels_are_stable() {
        assert_eq!(no_end(), no_end());
        assert_eq!(no_start(), no_start());
        assert!(no_start() < no_end());
    }
}
