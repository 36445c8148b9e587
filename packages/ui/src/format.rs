//! Display formatting for backend nanosecond timestamps, in the viewer's
//! local time zone.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use store::models::nanos_to_datetime;

/// Date and time, e.g. `Mar 2, 2026, 7:45 AM`.
pub fn format_schedule(nanos: u64) -> String {
    render_in(nanos, &Local, "%b %-d, %Y, %-I:%M %p")
}

/// Time of day, e.g. `7:45:03 AM`.
pub fn format_timestamp(nanos: u64) -> String {
    render_in(nanos, &Local, "%-I:%M:%S %p")
}

fn render_in<Tz>(nanos: u64, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match nanos_to_datetime(nanos) {
        Some(utc) => utc.with_timezone(tz).format(pattern).to_string(),
        None => "Invalid date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const MARCH_2_0745_UTC_MS: u64 = 1_772_437_500_000;

    #[test]
    fn test_render_schedule_in_utc() {
        let nanos = MARCH_2_0745_UTC_MS * 1_000_000;
        assert_eq!(
            render_in(nanos, &Utc, "%b %-d, %Y, %-I:%M %p"),
            "Mar 2, 2026, 7:45 AM"
        );
        assert_eq!(render_in(nanos, &Utc, "%-I:%M:%S %p"), "7:45:00 AM");
    }

    #[test]
    fn test_sub_millisecond_precision_is_dropped() {
        let nanos = MARCH_2_0745_UTC_MS * 1_000_000 + 999_999;
        assert_eq!(render_in(nanos, &Utc, "%H:%M:%S%.3f"), "07:45:00.000");
    }
}
