//! Timestamp source for record stamping.
//!
//! Records carry ISO-8601 UTC strings with microsecond precision and a trailing `Z`, for example
//! `2026-10-18T09:15:02.123456Z`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current instant.
///
/// The store only ever asks for "now"; tests inject a deterministic implementation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats an instant the way records store it.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current timestamp string from the given clock.
pub fn timestamp_now(clock: &dyn Clock) -> String {
    format_timestamp(clock.now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_uses_z_suffix_and_micros() {
        let instant = Utc
            .with_ymd_and_hms(2026, 10, 18, 9, 15, 2)
            .single()
            .expect("valid instant");
        assert_eq!(format_timestamp(instant), "2026-10-18T09:15:02.000000Z");
    }

    #[test]
    fn test_system_clock_output_parses_back() {
        let stamp = timestamp_now(&SystemClock);
        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
